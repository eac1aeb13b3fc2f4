//! Named render styles.
//!
//! Every style is a static record; selecting one is a table lookup done once
//! when the session is configured.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Names accepted by `--color`. No name means [`Style::DEFAULT`].
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StyleName {
    A,
    B,
    C,
}

/// How the header and summary are framed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Centered title between rule lines.
    Banner,
    /// One or two terse lines.
    Compact,
    /// Box-drawing frame.
    Boxed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub bar_width: usize,
    pub filled: &'static str,
    pub empty: &'static str,
    pub frame: Frame,
    /// Color the filled run by remaining fraction instead of `flat`.
    pub gradient: bool,
    pub primary: &'static str,
    pub warning: &'static str,
    pub urgent: &'static str,
    pub flat: &'static str,
    pub dim: &'static str,
    pub reset: &'static str,
}

impl Style {
    pub const DEFAULT: Style = Style {
        bar_width: 24,
        filled: "█",
        empty: "░",
        frame: Frame::Banner,
        gradient: false,
        primary: "",
        warning: "",
        urgent: "",
        flat: "",
        dim: "",
        reset: "",
    };

    pub const A: Style = Style {
        bar_width: 24,
        filled: "█",
        empty: "░",
        frame: Frame::Banner,
        gradient: true,
        primary: "\x1b[92m",
        warning: "\x1b[93m",
        urgent: "\x1b[38;5;210m",
        flat: "\x1b[92m",
        dim: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const B: Style = Style {
        bar_width: 30,
        filled: "━",
        empty: "─",
        frame: Frame::Compact,
        gradient: false,
        primary: "\x1b[96m",
        warning: "\x1b[96m",
        urgent: "\x1b[96m",
        flat: "\x1b[96m",
        dim: "\x1b[90m",
        reset: "\x1b[0m",
    };

    pub const C: Style = Style {
        bar_width: 20,
        filled: "▰",
        empty: "▱",
        frame: Frame::Boxed,
        gradient: true,
        primary: "\x1b[38;5;114m",
        warning: "\x1b[38;5;221m",
        urgent: "\x1b[38;5;203m",
        flat: "\x1b[38;5;117m",
        dim: "\x1b[38;5;244m",
        reset: "\x1b[0m",
    };

    pub fn from_name(name: Option<StyleName>) -> &'static Style {
        match name {
            None => &Self::DEFAULT,
            Some(StyleName::A) => &Self::A,
            Some(StyleName::B) => &Self::B,
            Some(StyleName::C) => &Self::C,
        }
    }

    pub fn is_colored(&self) -> bool {
        !self.reset.is_empty()
    }

    /// Wrap `text` in the dim code, or return it unchanged for plain styles.
    pub fn dimmed(&self, text: &str) -> String {
        if self.is_colored() {
            format!("{}{}{}", self.dim, text, self.reset)
        } else {
            text.to_string()
        }
    }

    /// Wrap `text` in the accent (flat) color.
    pub fn accent(&self, text: &str) -> String {
        if self.is_colored() {
            format!("{}{}{}", self.flat, text, self.reset)
        } else {
            text.to_string()
        }
    }
}
