use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DurationError {
    #[error("invalid duration '{0}' (expected e.g. 90s, 25m, 1h or plain seconds)")]
    InvalidFormat(String),
}

/// Parse a human-friendly duration ("25m", "90s", "1h", "1500") into seconds.
///
/// The unit suffix is case-insensitive. Sign is not checked here; callers
/// reject zero and negative results.
pub fn parse_duration(input: &str) -> Result<f64, DurationError> {
    let s = input.trim().to_lowercase();

    let (number, multiplier) = match s.chars().last() {
        Some('h') => (&s[..s.len() - 1], 3600.0),
        Some('m') => (&s[..s.len() - 1], 60.0),
        Some('s') => (&s[..s.len() - 1], 1.0),
        _ => (s.as_str(), 1.0),
    };

    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .map(|v| v * multiplier)
        .ok_or_else(|| DurationError::InvalidFormat(input.to_string()))
}
