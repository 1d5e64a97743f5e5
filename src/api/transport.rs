use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::error::TransportError;

/// Production API host
pub const DEFAULT_BASE_URL: &str = "https://api.trello.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status code and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP GET requests (allows mocking in tests)
pub trait Transport {
    /// Issue `GET {base}{path}` with the given query parameters.
    ///
    /// Any HTTP status is a successful transport result; only failures to get
    /// a response are errors.
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<HttpResponse, TransportError>;
}

/// Real transport backed by a blocking reqwest client
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("trello-radar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { client, base_url: base_url.into().trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for ReqwestTransport {
    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<HttpResponse, TransportError> {
        // Credentials travel in the query string, so errors carry the bare URL only
        let url = format!("{}{}", self.base_url, path);
        let request_error = |e: reqwest::Error| TransportError::Request {
            url: url.clone(),
            message: e.without_url().to_string(),
        };

        let response = self.client.get(&url).query(query).send().map_err(request_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(request_error)?;

        debug!(path, status, bytes = body.len(), "Trello API response");
        Ok(HttpResponse { status, body })
    }
}
