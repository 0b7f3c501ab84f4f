use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported timeframe type: {0}")]
    UnsupportedTimeframeType(String),

    #[error("unknown availability value: {0}")]
    UnknownAvailability(String),

    #[error("unknown event status: {0}")]
    UnknownEventStatus(String),

    #[error("event end date must be after start date")]
    InvalidDateRange,

    #[error("invalid share code: {0}")]
    InvalidShareCode(String),

    #[error("failed to allocate a unique share code after {0} attempts")]
    ShareCodeExhausted(u32),

    #[error("event not found: {0}")]
    EventNotFound(String),

    #[error("respondent not found: {0}")]
    RespondentNotFound(String),

    #[error("event {0} is no longer accepting responses")]
    EventClosed(String),

    #[error("invalid vote '{0}': expected <timeframe-id>=<availability>")]
    InvalidVoteSpec(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse timestamp: {0}")]
    Timestamp(#[from] chrono::ParseError),
}
