use crate::style::Style;

/// Render the interval progress bar.
///
/// `progress` is clamped to `[0, 1]`. With `reverse` the bar drains instead of
/// filling. Colored styles wrap the filled run and always end with a reset.
pub fn build_bar(style: &Style, progress: f64, reverse: bool) -> String {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let display = if reverse { 1.0 - progress } else { progress };
    let filled = ((style.bar_width as f64 * display).floor() as usize).min(style.bar_width);

    let filled_run = style.filled.repeat(filled);
    let empty_run = style.empty.repeat(style.bar_width - filled);

    if !style.is_colored() {
        return filled_run + &empty_run;
    }

    let color = if !style.gradient {
        style.flat
    } else if display > 0.3 {
        style.primary
    } else if display > 0.1 {
        style.warning
    } else {
        style.urgent
    };

    format!("{color}{filled_run}{}{empty_run}", style.reset)
}
