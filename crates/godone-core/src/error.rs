use thiserror::Error;

/// Contract violations raised by the engine.
///
/// Dirty task data never ends up here: a bad deadline, priority or status
/// degrades to a default instead. These variants mean the calling layer
/// handed the engine something it must not.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("month out of range: {0} (expected 1-12)")]
    MonthOutOfRange(u32),

    #[error("invalid calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("task payload must be a JSON array, got {0}")]
    NotATaskArray(&'static str),

    #[error("failed to parse task payload: {0}")]
    Payload(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
