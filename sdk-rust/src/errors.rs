use thiserror::Error;

/// Errors returned by the Companion API client.
/// `Clone` so a cached failure can be handed to every caller waiting on the
/// same request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request could not be sent, or the response body could not be
    /// read.
    #[error("Transport error: {0}")]
    Transport(String),
    /// The backend returned a non-2xx status. The message comes from the
    /// `detail` field of the response when present.
    #[error("Status error: {1} (Status {0})")]
    StatusCode(u16, String),
    /// The response body was not valid JSON or did not match the expected
    /// shape.
    #[error("Decode error: {0}")]
    Decode(String),
    /// The request was rejected before it reached the network.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// Short machine-friendly label, used as the `error.type` span attribute.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::StatusCode(..) => "status",
            Self::Decode(_) => "decode",
            Self::InvalidInput(_) => "invalid_input",
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
