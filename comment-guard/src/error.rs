use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Pattern store error: {0}")]
    Store(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GuardError>;

/// Why the classifier could not produce a verdict.
///
/// Every variant means "classifier unavailable" to the detector, which then
/// falls back to the pattern score.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("classifier disabled")]
    Disabled,
}

impl ClassifierError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ClassifierError::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            ClassifierError::Status { status, .. } => *status == 429 || *status >= 500,
            ClassifierError::Timeout(_) => true,
            ClassifierError::MalformedResponse(_) | ClassifierError::Disabled => false,
        }
    }
}
