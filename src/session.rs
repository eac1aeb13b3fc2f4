use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::duration::{parse_duration, DurationError};
use crate::style::StyleName;

/// Ding counts that get their own notification when milestone tracking is on.
pub const MILESTONES: [u64; 4] = [10, 50, 100, 500];

pub const DEFAULT_FLASH: Duration = Duration::from_millis(500);
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("interval must be a positive number of seconds (got {0})")]
    InvalidInterval(f64),
    #[error(transparent)]
    InvalidDuration(#[from] DurationError),
    #[error("duration must be positive (got {0})")]
    NonPositiveDuration(String),
    #[error("count must be at least 1")]
    InvalidCount,
}

/// Validated, immutable settings for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub interval: f64,
    pub task: Option<String>,
    pub style: Option<StyleName>,
    pub quiet: bool,
    pub milestones: bool,
    pub target_duration: Option<f64>,
    pub max_dings: Option<u64>,
    pub reverse: bool,
    pub flash: Duration,
    pub tick: Duration,
    pub log_path: Option<PathBuf>,
}

impl SessionConfig {
    pub fn new(interval: f64) -> Result<Self, ConfigError> {
        if !(interval.is_finite() && interval > 0.0) {
            return Err(ConfigError::InvalidInterval(interval));
        }
        Ok(Self {
            interval,
            task: None,
            style: None,
            quiet: false,
            milestones: false,
            target_duration: None,
            max_dings: None,
            reverse: false,
            flash: DEFAULT_FLASH,
            tick: DEFAULT_TICK,
            log_path: None,
        })
    }

    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task = Some(task.into());
        self
    }

    pub fn with_style(mut self, style: Option<StyleName>) -> Self {
        self.style = style;
        self
    }

    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn with_milestones(mut self, enabled: bool) -> Self {
        self.milestones = enabled;
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Switch to countdown mode. Accepts anything [`parse_duration`] does.
    pub fn with_duration(mut self, duration: &str) -> Result<Self, ConfigError> {
        let secs = parse_duration(duration)?;
        if secs <= 0.0 {
            return Err(ConfigError::NonPositiveDuration(duration.to_string()));
        }
        self.target_duration = Some(secs);
        Ok(self)
    }

    pub fn with_max_dings(mut self, count: u64) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::InvalidCount);
        }
        self.max_dings = Some(count);
        Ok(self)
    }

    pub fn with_flash(mut self, flash: Duration) -> Self {
        self.flash = flash;
        self
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn with_log_path(mut self, path: Option<PathBuf>) -> Self {
        self.log_path = path;
        self
    }

    pub fn is_countdown(&self) -> bool {
        self.target_duration.is_some()
    }

    /// Countdowns always drain the bar; there is no way back to forward.
    pub fn reverse_bar(&self) -> bool {
        self.reverse || self.is_countdown()
    }
}

/// How a ding is announced.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DingKind {
    Regular,
    Milestone(u64),
    SessionComplete,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum_macros::Display)]
pub enum CompletionKind {
    #[strum(serialize = "cancelled")]
    UserCancelled,
    #[strum(serialize = "duration reached")]
    DurationReached,
    #[strum(serialize = "count reached")]
    MaxDingsReached,
}

impl CompletionKind {
    /// Whether the session stopped on its own rather than by interrupt.
    pub fn is_auto_stop(&self) -> bool {
        !matches!(self, CompletionKind::UserCancelled)
    }
}

/// Mutable state of a running session. Times are seconds since start.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub started_at: DateTime<Local>,
    pub elapsed: f64,
    pub ding_count: u64,
    pub flash_until: Option<f64>,
    pub last_ding: Option<DingKind>,
    pub milestones_fired: Vec<u64>,
    pub completion: Option<CompletionKind>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            started_at: Local::now(),
            elapsed: 0.0,
            ding_count: 0,
            flash_until: None,
            last_ding: None,
            milestones_fired: Vec::new(),
            completion: None,
        }
    }
}

impl SessionState {
    pub fn is_flashing(&self) -> bool {
        self.flash_until.is_some_and(|until| self.elapsed < until)
    }
}

/// What is left of a session once the loop has exited.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub task: Option<String>,
    pub elapsed: f64,
    pub ding_count: u64,
    pub interval: f64,
    pub completion: CompletionKind,
    /// Reached thresholds, highest first. Empty unless tracking was on.
    pub milestones: Vec<u64>,
    pub average_interval: Option<f64>,
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
}

impl SessionSummary {
    pub fn new(config: &SessionConfig, state: &SessionState, completion: CompletionKind) -> Self {
        let milestones = if config.milestones {
            MILESTONES
                .iter()
                .rev()
                .copied()
                .filter(|m| *m <= state.ding_count)
                .collect()
        } else {
            Vec::new()
        };

        let average_interval =
            (state.ding_count > 0).then(|| state.elapsed / state.ding_count as f64);

        Self {
            task: config.task.clone(),
            elapsed: state.elapsed,
            ding_count: state.ding_count,
            interval: config.interval,
            completion,
            milestones,
            average_interval,
            started_at: state.started_at,
            ended_at: Local::now(),
        }
    }
}
