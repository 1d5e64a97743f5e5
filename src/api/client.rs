use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::error::{ApiError, looks_like_auth_failure};
use super::transport::{HttpResponse, Transport};
use crate::models::{Board, Card, Credentials};

/// Maximum number of cards requested per search
pub const DEFAULT_CARDS_LIMIT: u32 = 1000;

const SEARCH_PATH: &str = "/1/search";
const MEMBER_PATH: &str = "/1/members/me/";

/// Outcome of checking the stored credentials against Trello
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// The key looks right but the token was refused; only the token needs renewing
    InvalidToken,
    /// Start over: both key and token are needed
    InvalidKey,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    cards: Vec<Card>,
}

/// Client for the handful of Trello endpoints the radar needs.
///
/// Credentials travel as `key`/`token` query parameters on every request.
pub struct TrelloClient<T: Transport> {
    transport: T,
    credentials: Credentials,
}

impl<T: Transport> TrelloClient<T> {
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self { transport, credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    fn auth_query(&self) -> Vec<(&'static str, String)> {
        vec![("key", self.credentials.api_key.clone()), ("token", self.credentials.token.clone())]
    }

    /// Search cards matching `query`, asking for list and board details inline
    pub fn search(&self, query: &str, limit: u32) -> Result<Vec<Card>, ApiError> {
        let mut params = self.auth_query();
        params.extend([
            ("query", query.to_string()),
            ("modelTypes", "cards".to_string()),
            ("card_list", "true".to_string()),
            ("card_board", "true".to_string()),
            ("board_fields", "name,url".to_string()),
            ("cards_limit", limit.to_string()),
        ]);

        let response = self.transport.get(SEARCH_PATH, &params)?;
        let body = check_status(response)?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;

        info!(query, cards = parsed.cards.len(), "Search completed");
        Ok(parsed.cards)
    }

    /// Look up a board's name and URL by id
    pub fn resolve_board(&self, id: &str) -> Result<Board, ApiError> {
        let mut params = self.auth_query();
        params.push(("fields", "name,url".to_string()));

        let path = format!("/1/boards/{}", utf8_percent_encode(id, NON_ALPHANUMERIC));
        let response = self.transport.get(&path, &params)?;
        let body = check_status(response)?;
        let mut board: Board = serde_json::from_str(&body)?;
        if board.id.is_empty() {
            board.id = id.to_string();
        }

        debug!(board_id = id, name = %board.name, "Resolved board");
        Ok(board)
    }

    /// Ask `members/me` to decide whether the stored credentials still work
    pub fn validate_credentials(&self) -> Result<Validation, ApiError> {
        let response = self.transport.get(MEMBER_PATH, &self.auth_query())?;
        if response.is_success() {
            return Ok(Validation::Valid);
        }
        if !looks_like_auth_failure(response.status, &response.body) {
            return Err(ApiError::Status { status: response.status, body: response.body.trim().to_string() });
        }

        let validation = if self.credentials.has_plausible_key()
            && response.body.to_ascii_lowercase().contains("invalid token")
        {
            Validation::InvalidToken
        } else {
            Validation::InvalidKey
        };
        warn!(status = response.status, ?validation, "Stored credentials were rejected");
        Ok(validation)
    }
}

fn check_status(response: HttpResponse) -> Result<String, ApiError> {
    if response.is_success() {
        return Ok(response.body);
    }
    let body = response.body.trim().to_string();
    if looks_like_auth_failure(response.status, &body) {
        Err(ApiError::Auth(body))
    } else {
        Err(ApiError::Status { status: response.status, body })
    }
}
