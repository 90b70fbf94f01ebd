/// A form submission that failed local checks before any request was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty name: You must set a non-empty name first")]
    EmptyName,

    #[error("Empty description: You must set a non-empty description first")]
    EmptyDescription,

    #[error("Non-valid date: You must set a valid date first")]
    InvalidDate,
}

impl ValidationError {
    /// Short heading used for notifications.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "Empty name",
            ValidationError::EmptyDescription => "Empty description",
            ValidationError::InvalidDate => "Non-valid date",
        }
    }
}

/// Errors raised at the boundary between the app and the remote API.
///
/// The store never produces these; they stop at the call site that issued the
/// request.
#[derive(Debug, thiserror::Error)]
pub enum DeadlineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with anything other than 200.
    #[error("{operation} rejected by server (status {status})")]
    Status {
        operation: &'static str,
        status: u16,
    },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DeadlineError>;
