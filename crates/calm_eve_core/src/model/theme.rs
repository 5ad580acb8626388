//! Theme preference and the resolved light/dark theme.

use serde::{Deserialize, Serialize};

/// User-selected theme. Persisted as its lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    /// Follow the OS colour scheme, re-read on every resolution.
    #[default]
    Auto,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Reads a stored value; absent or unrecognized values mean `Auto`.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("light") => Self::Light,
            Some("dark") => Self::Dark,
            _ => Self::Auto,
        }
    }

    /// Pinned theme, or `None` while following the OS.
    pub fn pinned(self) -> Option<EffectiveTheme> {
        match self {
            Self::Auto => None,
            Self::Light => Some(EffectiveTheme::Light),
            Self::Dark => Some(EffectiveTheme::Dark),
        }
    }
}

/// Theme actually used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveTheme {
    Light,
    Dark,
}

impl EffectiveTheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}
