//! Error types for the timetable engine.
//!
//! Only malformed inputs are errors. "No conflicts" and "no free slot"
//! are ordinary outcomes represented by empty collections.

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Error type for engine operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// A query parameter is out of range (duration, granularity, window).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A weekday name or number could not be recognised.
    #[error("Unknown weekday: {0:?}")]
    UnknownWeekday(String),

    /// A time-of-day string could not be parsed.
    #[error("Invalid time of day: {0:?}")]
    InvalidTime(String),

    /// A week expression contained no week numbers.
    #[error("Invalid week expression: {0:?}")]
    InvalidWeeks(String),

    /// The event store failed to produce events.
    #[error("Repository error: {0}")]
    Repository(String),

    /// A configuration document could not be read.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScheduleError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ScheduleError::InvalidArgument(message.into())
    }
}

impl From<toml::de::Error> for ScheduleError {
    fn from(e: toml::de::Error) -> Self {
        ScheduleError::Config(e.to_string())
    }
}
