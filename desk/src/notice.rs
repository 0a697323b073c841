//! Transient user-facing notices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Display time of a success notice
pub const SUCCESS_DURATION: Duration = Duration::from_secs(4);
/// Display time of an error notice
pub const ERROR_DURATION: Duration = Duration::from_secs(6);
/// Display time of a warning notice; swaps must be noticed
pub const WARNING_DURATION: Duration = Duration::from_secs(10);

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Operation succeeded
    Success,
    /// Operation succeeded with a side effect worth attention
    Warning,
    /// Operation failed
    Error,
}

impl NoticeLevel {
    /// Default display time for this level
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::Success => SUCCESS_DURATION,
            Self::Warning => WARNING_DURATION,
            Self::Error => ERROR_DURATION,
        }
    }
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// A message shown to the operator for a limited time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown to the operator
    pub message: String,
    /// How long the notice stays visible
    pub duration: Duration,
    /// When the notice was raised
    pub raised_at: DateTime<Utc>,
}

impl Notice {
    /// Success notice
    #[must_use]
    pub fn success(message: impl Into<String>, raised_at: DateTime<Utc>) -> Self {
        Self::with_level(NoticeLevel::Success, message, raised_at)
    }

    /// Warning notice
    #[must_use]
    pub fn warning(message: impl Into<String>, raised_at: DateTime<Utc>) -> Self {
        Self::with_level(NoticeLevel::Warning, message, raised_at)
    }

    /// Error notice
    #[must_use]
    pub fn error(message: impl Into<String>, raised_at: DateTime<Utc>) -> Self {
        Self::with_level(NoticeLevel::Error, message, raised_at)
    }

    fn with_level(level: NoticeLevel, message: impl Into<String>, raised_at: DateTime<Utc>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: level.duration(),
            raised_at,
        }
    }

    /// Whether the notice is still visible at `now`
    #[must_use]
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        chrono::Duration::from_std(self.duration)
            .map(|duration| now < self.raised_at + duration)
            .unwrap_or(true)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}
