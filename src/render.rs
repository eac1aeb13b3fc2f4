//! Text for the header, the live status line and the summary.
//!
//! Everything here is pure: the caller supplies the wall-clock readout and the
//! terminal width, and writes the returned strings wherever it likes.

use unicode_width::UnicodeWidthStr;

use crate::bar::build_bar;
use crate::format::{format_compact, format_elapsed, format_remaining};
use crate::session::{DingKind, SessionConfig, SessionState, SessionSummary};
use crate::style::{Frame, Style};

const MAX_WIDTH: usize = 60;

fn center(text: &str, width: usize) -> String {
    let pad = width.saturating_sub(text.width());
    let left = pad / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(pad - left))
        .trim_end()
        .to_string()
}

/// Frame `lines` in a box. Widths are measured in terminal columns.
fn boxed(style: &Style, lines: &[String]) -> Vec<String> {
    let inner = lines.iter().map(|l| l.width()).max().unwrap_or(0) + 2;
    let rule = "─".repeat(inner);
    let mut out = vec![style.dimmed(&format!("┌{rule}┐"))];
    for line in lines {
        let pad = inner - 1 - line.width();
        out.push(format!(
            "{} {}{}{}",
            style.dimmed("│"),
            line,
            " ".repeat(pad),
            style.dimmed("│")
        ));
    }
    out.push(style.dimmed(&format!("└{rule}┘")));
    out
}

fn title(config: &SessionConfig) -> &'static str {
    if config.is_countdown() {
        "⏳ COUNTDOWN"
    } else {
        "⏱️  STOPWATCH"
    }
}

/// Lines describing the session, shared by every frame.
fn details(config: &SessionConfig) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(target) = config.target_duration {
        lines.push(format!("Duration: {}", format_remaining(target)));
    }
    if let Some(max) = config.max_dings {
        lines.push(format!("Stops after {max} dings"));
    }
    if config.milestones {
        lines.push("Milestones: on".to_string());
    }
    if let Some(task) = &config.task {
        lines.push(format!("Task: {task}"));
    }
    lines
}

/// Banner printed once before the loop starts.
pub fn header(config: &SessionConfig, style: &Style, term_width: usize) -> String {
    let width = term_width.clamp(20, MAX_WIDTH);
    let interval = format_compact(config.interval);
    let mut out = Vec::new();

    match style.frame {
        Frame::Banner => {
            let rule = style.dimmed(&"═".repeat(width));
            out.push(String::new());
            out.push(rule.clone());
            out.push(style.accent(&center(title(config), width)));
            out.push(center(&format!("Ding every {interval}s"), width));
            for line in details(config) {
                out.push(center(&line, width));
            }
            out.push(rule);
            out.push(String::new());
            out.push(style.dimmed(&center("Press Ctrl+C to stop", width)));
            out.push(String::new());
        }
        Frame::Compact => {
            let mut first = vec![style.accent(title(config)), format!("Interval: {interval}s")];
            first.extend(details(config));
            out.push(String::new());
            out.push(first.join(" · "));
            out.push(style.dimmed("Press Ctrl+C to stop"));
            out.push(String::new());
        }
        Frame::Boxed => {
            let mut lines = vec![title(config).to_string(), format!("Interval: {interval}s")];
            lines.extend(details(config));
            out.push(String::new());
            out.extend(boxed(style, &lines));
            out.push(style.dimmed("  Press Ctrl+C to stop"));
            out.push(String::new());
        }
    }

    out.join("\n")
}

fn flash_label(kind: Option<DingKind>) -> String {
    match kind {
        Some(DingKind::Milestone(n)) => format!("🏆 {n} DINGS! 🏆"),
        Some(DingKind::SessionComplete) => "✅ DONE! ✅".to_string(),
        _ => "🔔 DING! 🔔".to_string(),
    }
}

/// The in-place status line for the current tick, without any cursor control.
pub fn status_line(
    config: &SessionConfig,
    style: &Style,
    state: &SessionState,
    wall_clock: &str,
) -> String {
    let elapsed = state.elapsed;

    let time = match config.target_duration {
        Some(target) => format!("{} left", format_remaining(target - elapsed)),
        None => format_elapsed(elapsed),
    };

    let progress = (elapsed % config.interval) / config.interval;
    let bar = build_bar(style, progress, config.reverse_bar());

    let indicator = if state.is_flashing() {
        style.accent(&flash_label(state.last_ding))
    } else {
        let next = ((state.ding_count as f64 + 1.0) * config.interval - elapsed)
            .ceil()
            .max(0.0);
        format!("Next: {}s", next as u64)
    };

    let count = match config.max_dings {
        Some(max) => format!("[{}/{}]", state.ding_count, max),
        None => format!("🔔 {}", state.ding_count),
    };

    format!(
        "  {} ┃ {} ┃ [{}]  {}  {}",
        style.dimmed(&format!("[{wall_clock}]")),
        time,
        bar,
        indicator,
        style.dimmed(&count)
    )
}

/// Closing report printed after the loop.
pub fn summary(summary: &SessionSummary, style: &Style, term_width: usize) -> String {
    let width = term_width.clamp(20, MAX_WIDTH);
    let verdict = if summary.completion.is_auto_stop() {
        "✅ Session complete"
    } else {
        "⏹️  STOPPED"
    };
    let time = format_elapsed(summary.elapsed);
    let average = summary
        .average_interval
        .map_or_else(|| "—".to_string(), |avg| format!("{avg:.1}s"));
    let milestones = (!summary.milestones.is_empty()).then(|| {
        summary
            .milestones
            .iter()
            .map(|m| m.to_string())
            .collect::<Vec<_>>()
            .join(" · ")
    });

    let mut out = Vec::new();
    match style.frame {
        Frame::Banner => {
            let rule = style.dimmed(&"─".repeat(width));
            out.push(String::new());
            out.push(rule.clone());
            out.push(style.accent(&center(verdict, width)));
            out.push(rule);
            out.push(String::new());
            if let Some(task) = &summary.task {
                out.push(format!("  Task: {task}"));
            }
            out.push(format!("  Final time: {time}"));
            out.push(format!("  Total dings: {}", summary.ding_count));
            out.push(format!("  Average interval: {average}"));
            if let Some(m) = milestones {
                out.push(format!("  Milestones: 🏆 {m}"));
            }
            out.push(String::new());
        }
        Frame::Compact => {
            let mut parts = vec![
                style.accent(verdict),
                format!("Final: {time}"),
                format!("{} dings", summary.ding_count),
                format!("avg {average}"),
            ];
            if let Some(m) = milestones {
                parts.push(format!("🏆 {m}"));
            }
            out.push(String::new());
            out.push(parts.join(" · "));
            out.push(String::new());
        }
        Frame::Boxed => {
            let mut lines = vec![verdict.to_string()];
            if let Some(task) = &summary.task {
                lines.push(format!("Task: {task}"));
            }
            lines.push(format!("Time: {time}"));
            lines.push(format!("Dings: {}", summary.ding_count));
            lines.push(format!("Average: {average}"));
            if let Some(m) = milestones {
                lines.push(format!("Milestones: {m}"));
            }
            out.push(String::new());
            out.extend(boxed(style, &lines));
            out.push(String::new());
        }
    }

    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::CompletionKind;

    fn stopwatch(interval: f64) -> SessionConfig {
        SessionConfig::new(interval).unwrap()
    }

    fn state(elapsed: f64, dings: u64) -> SessionState {
        SessionState {
            elapsed,
            ding_count: dings,
            ..SessionState::default()
        }
    }

    #[test]
    fn stopwatch_header_names_interval() {
        let text = header(&stopwatch(5.0), &Style::DEFAULT, 80);
        assert!(text.contains("STOPWATCH"));
        assert!(text.contains("Ding every 5s"));
        assert!(text.contains("Ctrl+C to stop"));
    }

    #[test]
    fn countdown_header_shows_duration() {
        let config = stopwatch(5.0).with_duration("30s").unwrap();
        let text = header(&config, &Style::DEFAULT, 80);
        assert!(text.contains("COUNTDOWN"));
        assert!(text.contains("Duration: 00:30"));
    }

    #[test]
    fn fractional_interval_is_compact() {
        let text = header(&stopwatch(1.5), &Style::DEFAULT, 80);
        assert!(text.contains("Ding every 1.5s"));
        assert!(!header(&stopwatch(30.0), &Style::DEFAULT, 80).contains("30.0s"));
    }

    #[test]
    fn compact_and_boxed_headers() {
        let b = header(&stopwatch(5.0), &Style::B, 80);
        assert!(b.contains("Interval: 5s"));
        assert!(b.contains("Ctrl+C to stop"));

        let c = header(&stopwatch(5.0).with_task("Deep work"), &Style::C, 80);
        assert!(c.contains('┌'));
        assert!(c.contains('┘'));
        assert!(c.contains("Interval: 5s"));
        assert!(c.contains("Task: Deep work"));
    }

    #[test]
    fn boxed_lines_share_a_width() {
        let lines = boxed(
            &Style::DEFAULT,
            &["⏱️  STOPWATCH".to_string(), "Interval: 5s".to_string()],
        );
        let widths: Vec<usize> = lines.iter().map(|l| l.width()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
    }

    #[test]
    fn status_line_counts_down_to_next_ding() {
        let line = status_line(&stopwatch(5.0), &Style::DEFAULT, &state(1.5, 0), "09:41");
        assert!(line.contains("[09:41]"));
        assert!(line.contains("00:01.5"));
        assert!(line.contains("Next: 4s"));
        assert!(line.contains('█'));
        assert!(!line.contains('\x1b'));
    }

    #[test]
    fn status_line_flashes_after_a_ding() {
        let mut s = state(5.1, 1);
        s.flash_until = Some(5.5);
        s.last_ding = Some(DingKind::Regular);
        let line = status_line(&stopwatch(5.0), &Style::DEFAULT, &s, "09:41");
        assert!(line.contains("DING!"));
        assert!(!line.contains("Next:"));

        s.last_ding = Some(DingKind::Milestone(10));
        let line = status_line(&stopwatch(5.0), &Style::DEFAULT, &s, "09:41");
        assert!(line.contains("10 DINGS!"));
    }

    #[test]
    fn saturated_ding_count_renders() {
        let config = stopwatch(1e-30);
        let mut s = state(2.0, u64::MAX);
        s.flash_until = Some(1.0);
        s.last_ding = Some(DingKind::Regular);
        let line = status_line(&config, &Style::DEFAULT, &s, "12:00");
        assert!(line.contains("Next: 0s"));
        assert!(line.contains(&format!("🔔 {}", u64::MAX)));
    }

    #[test]
    fn countdown_line_shows_time_left_and_count() {
        let config = stopwatch(5.0)
            .with_duration("30s")
            .unwrap()
            .with_max_dings(3)
            .unwrap();
        let line = status_line(&config, &Style::DEFAULT, &state(0.4, 0), "09:41");
        assert!(line.contains("00:29 left"));
        assert!(line.contains("[0/3]"));
        // drained bar starts full
        assert!(line.contains(&"█".repeat(22)));
    }

    fn finished(completion: CompletionKind, elapsed: f64, dings: u64) -> SessionSummary {
        let config = stopwatch(1.0).with_milestones(true);
        SessionSummary::new(&config, &state(elapsed, dings), completion)
    }

    #[test]
    fn banner_summary() {
        let text = summary(&finished(CompletionKind::MaxDingsReached, 3.0, 2), &Style::DEFAULT, 80);
        assert!(text.contains("Session complete"));
        assert!(text.contains("Final time: 00:03.0"));
        assert!(text.contains("Total dings: 2"));
        assert!(text.contains("Average interval: 1.5s"));
    }

    #[test]
    fn cancelled_summary_without_dings() {
        let text = summary(&finished(CompletionKind::UserCancelled, 0.5, 0), &Style::DEFAULT, 80);
        assert!(text.contains("STOPPED"));
        assert!(!text.contains("Session complete"));
        assert!(text.contains("Average interval: —"));
    }

    #[test]
    fn summary_lists_milestones() {
        let text = summary(&finished(CompletionKind::UserCancelled, 55.0, 55), &Style::DEFAULT, 80);
        assert!(text.contains("Milestones: 🏆 50 · 10"));
    }

    #[test]
    fn compact_and_boxed_summaries() {
        let done = finished(CompletionKind::UserCancelled, 3.0, 3);
        let b = summary(&done, &Style::B, 80);
        assert!(b.contains("Final:"));
        assert!(b.contains("3 dings"));

        let c = summary(&done, &Style::C, 80);
        assert!(c.contains('┌'));
        assert!(c.contains("Time:"));
        assert!(c.contains("Dings: 3"));
    }
}
