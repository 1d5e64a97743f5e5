use thiserror::Error;

/// Failure to get any HTTP response at all
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// Errors from the Trello API client.
///
/// Callers can tell an empty search (`Ok(vec![])`) from a failed one, and an
/// authentication problem from everything else.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Trello rejected the credentials: {0}")]
    Auth(String),
    #[error("Trello returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected response from Trello: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}

/// Error text Trello uses when the key or token is not accepted
pub(crate) fn looks_like_auth_failure(status: u16, body: &str) -> bool {
    if status == 401 {
        return true;
    }
    let body = body.to_ascii_lowercase();
    body.contains("invalid token") || body.contains("invalid key")
}
