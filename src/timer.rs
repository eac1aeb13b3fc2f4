use std::io::{self, Write};

use chrono::Local;
use crossterm::{
    cursor::MoveToColumn,
    queue,
    style::Print,
    terminal::{Clear, ClearType},
};

use crate::history::SessionLog;
use crate::notify::Notifier;
use crate::render;
use crate::runtime::{Clock, Runner, SessionEvent, SessionEventSource, Ticker};
use crate::session::{
    CompletionKind, DingKind, SessionConfig, SessionState, SessionSummary, MILESTONES,
};
use crate::style::Style;

/// Result of advancing the timer by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still running; carries the ding fired on this tick, if any.
    Running(Option<DingKind>),
    Completed(CompletionKind),
}

/// represents one timing session: its settings and everything that changes per tick
#[derive(Debug)]
pub struct Timer {
    pub config: SessionConfig,
    pub state: SessionState,
    style: &'static Style,
}

impl Timer {
    pub fn new(config: SessionConfig) -> Self {
        let style = Style::from_name(config.style);
        Self {
            config,
            state: SessionState::default(),
            style,
        }
    }

    pub fn style(&self) -> &'static Style {
        self.style
    }

    pub fn has_finished(&self) -> bool {
        self.state.completion.is_some()
    }

    /// Advance to `elapsed` seconds since start.
    ///
    /// Auto-stop checks run before the ding check, so the tick after the last
    /// allowed ding is the one that completes the session.
    pub fn on_tick(&mut self, elapsed: f64) -> TickOutcome {
        if let Some(kind) = self.state.completion {
            return TickOutcome::Completed(kind);
        }

        self.state.elapsed = self.state.elapsed.max(elapsed);
        let elapsed = self.state.elapsed;

        if self
            .config
            .target_duration
            .is_some_and(|target| elapsed >= target)
        {
            return self.complete(CompletionKind::DurationReached);
        }

        if self
            .config
            .max_dings
            .is_some_and(|max| self.state.ding_count >= max)
        {
            return self.complete(CompletionKind::MaxDingsReached);
        }

        let boundary = (elapsed / self.config.interval).floor() as u64;
        if boundary <= self.state.ding_count {
            return TickOutcome::Running(None);
        }

        let previous = self.state.ding_count;
        self.state.ding_count = boundary;

        let kind = self.classify(previous, boundary);
        self.state.last_ding = Some(kind);
        self.state.flash_until = Some(elapsed + self.config.flash.as_secs_f64());

        TickOutcome::Running(Some(kind))
    }

    /// A threshold counts as reached the first time the ding count passes it,
    /// even when a slow tick jumps over it.
    fn classify(&mut self, previous: u64, current: u64) -> DingKind {
        if !self.config.milestones {
            return DingKind::Regular;
        }

        let reached: Vec<u64> = MILESTONES
            .iter()
            .copied()
            .filter(|m| previous < *m && *m <= current)
            .filter(|m| !self.state.milestones_fired.contains(m))
            .collect();

        match reached.last() {
            Some(&highest) => {
                self.state.milestones_fired.extend(reached.iter().copied());
                DingKind::Milestone(highest)
            }
            None => DingKind::Regular,
        }
    }

    fn complete(&mut self, kind: CompletionKind) -> TickOutcome {
        self.state.completion = Some(kind);
        TickOutcome::Completed(kind)
    }

    /// Stop on user interrupt. Records the time of cancellation but fires nothing.
    ///
    /// `ding_count` keeps the dings actually fired: a boundary crossed after the
    /// last tick is not counted, so the summary may sit one below
    /// `floor(elapsed / interval)`.
    pub fn cancel(&mut self, elapsed: f64) {
        if self.state.completion.is_none() {
            self.state.elapsed = self.state.elapsed.max(elapsed);
            self.state.completion = Some(CompletionKind::UserCancelled);
        }
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        self.state
            .completion
            .map(|kind| SessionSummary::new(&self.config, &self.state, kind))
    }

    pub fn status_line(&self, wall_clock: &str) -> String {
        render::status_line(&self.config, self.style, &self.state, wall_clock)
    }
}

/// Drives a [`Timer`] from start to summary.
pub struct SessionLoop<'a, E: SessionEventSource, T: Ticker> {
    pub runner: Runner<E, T>,
    pub clock: &'a dyn Clock,
    pub notifier: &'a dyn Notifier,
    pub log: &'a dyn SessionLog,
    pub term_width: usize,
}

impl<E: SessionEventSource, T: Ticker> SessionLoop<'_, E, T> {
    /// Print the header, tick until the session completes or is cancelled,
    /// then print the summary and hand it to the log.
    pub fn run<W: Write>(&self, timer: &mut Timer, out: &mut W) -> io::Result<SessionSummary> {
        writeln!(
            out,
            "{}",
            render::header(&timer.config, timer.style(), self.term_width)
        )?;
        tracing::debug!(interval = timer.config.interval, "session started");

        let completion = loop {
            match timer.on_tick(self.clock.elapsed()) {
                TickOutcome::Completed(kind) => {
                    self.notifier.notify(DingKind::SessionComplete);
                    break kind;
                }
                TickOutcome::Running(Some(kind)) => self.notifier.notify(kind),
                TickOutcome::Running(None) => {}
            }

            draw(out, &timer.status_line(&wall_clock()))?;

            if let SessionEvent::Cancel = self.runner.step() {
                timer.cancel(self.clock.elapsed());
                break CompletionKind::UserCancelled;
            }
        };

        draw(out, &timer.status_line(&wall_clock()))?;
        writeln!(out)?;

        let summary = SessionSummary::new(&timer.config, &timer.state, completion);
        tracing::debug!(
            completion = %summary.completion,
            dings = summary.ding_count,
            elapsed = summary.elapsed,
            "session finished"
        );
        writeln!(
            out,
            "{}",
            render::summary(&summary, timer.style(), self.term_width)
        )?;
        out.flush()?;

        self.log.record(&summary);
        Ok(summary)
    }
}

fn wall_clock() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Overwrite the current terminal line.
fn draw<W: Write>(out: &mut W, line: &str) -> io::Result<()> {
    queue!(
        out,
        MoveToColumn(0),
        Print(line),
        Clear(ClearType::UntilNewLine)
    )?;
    out.flush()
}
