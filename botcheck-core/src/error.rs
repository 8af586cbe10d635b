use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    /// No qualifying reply arrived before the deadline. `preview` holds the normalized text of
    /// the most recent candidate that was seen but did not match, if any.
    #[error(
        "No matching reply within {}s ({criteria}); last candidate: {}",
        .timeout.as_secs_f64(),
        .preview.as_deref().map(|p| format!("{:?}", p)).unwrap_or_else(|| "<none>".to_string())
    )]
    ResponseTimeout {
        timeout: Duration,
        criteria: String,
        preview: Option<String>,
    },

    #[error(
        "Affordance not found (label={}, token={}); available: {available:?}",
        .label.as_deref().unwrap_or("<any>"),
        .token.as_deref().unwrap_or("<any>")
    )]
    AffordanceNotFound {
        label: Option<String>,
        token: Option<String>,
        available: Vec<String>,
    },

    /// The transport refused the request and asked to wait before retrying.
    #[error("Throttled by transport, retry after {}s", .retry_after.as_secs_f64())]
    Throttled { retry_after: Duration },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Unknown actor: {0}")]
    UnknownActor(String),

    #[error("Invalid reply pattern: {0}")]
    InvalidPattern(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl HarnessError {
    /// Returns the required wait when this is a transport throttle.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            HarnessError::Throttled { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
