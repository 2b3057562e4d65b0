use thiserror::Error;

/// Failures reaching or understanding the team service.
///
/// Application-level rejections of the GET endpoints are not errors; they
/// come back as an `ApiResponse` with `success: false`.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("invalid service url: {0}")]
    InvalidUrl(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("request rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}
