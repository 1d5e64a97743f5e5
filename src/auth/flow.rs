//! Authorization page flow as an explicit state machine.
//!
//! The flow never drives a browser itself: [`transition`] takes the current
//! state and the page that just finished loading and returns the next state
//! plus an optional URL to navigate to. The driver in `dialog` feeds it
//! page loads until it reaches [`AuthState::Done`].

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

use super::scrape::{find_api_key, find_token};
use crate::models::Credentials;

pub const LOGIN_URL: &str = "https://trello.com/login";
/// Where Trello lands after a successful login
pub const LOGIN_REDIRECT_URL: &str = "https://trello.com/";
pub const API_KEY_URL: &str = "https://trello.com/app-key";
const AUTHORIZE_URL: &str = "https://trello.com/1/authorize";

pub const APP_NAME: &str = "TrelloRadar";
pub const TOKEN_EXPIRATION: &str = "never";
pub const TOKEN_SCOPE: &str = "read,write";

/// A page that finished loading: where the browser ended up and what it shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLoad {
    pub location: String,
    pub html: String,
}

impl PageLoad {
    pub fn new(location: impl Into<String>, html: impl Into<String>) -> Self {
        Self { location: location.into(), html: html.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Waiting for the user to log in (only when no API key is known)
    AwaitingLogin,
    /// Waiting for the developer key page to show the key
    AwaitingApiKey,
    /// Waiting for the user to grant access so the token page shows a token
    AwaitingToken { api_key: String },
    Done(Credentials),
}

impl AuthState {
    /// Short name for logs; never includes the key
    pub fn label(&self) -> &'static str {
        match self {
            AuthState::AwaitingLogin => "awaiting_login",
            AuthState::AwaitingApiKey => "awaiting_api_key",
            AuthState::AwaitingToken { .. } => "awaiting_token",
            AuthState::Done(_) => "done",
        }
    }
}

/// Result of feeding one page load to the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: AuthState,
    pub navigate: Option<String>,
}

impl Step {
    fn stay(state: AuthState) -> Self {
        Self { next: state, navigate: None }
    }
}

/// Token grant page for `api_key`
pub fn token_url(api_key: &str) -> String {
    let encode = |value: &str| utf8_percent_encode(value, NON_ALPHANUMERIC).to_string();
    format!(
        "{}?key={}&name={}&expiration={}&response_type=token&scope={}",
        AUTHORIZE_URL,
        encode(api_key),
        encode(APP_NAME),
        encode(TOKEN_EXPIRATION),
        encode(TOKEN_SCOPE)
    )
}

fn same_location(a: &str, b: &str) -> bool {
    a.trim().trim_end_matches('/') == b.trim().trim_end_matches('/')
}

/// Entry state and first page for a run of the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFlow {
    pub state: AuthState,
}

impl AuthFlow {
    /// With a known key only a new token is requested; otherwise start at login
    pub fn new(known_key: Option<&str>) -> Self {
        let state = match known_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => AuthState::AwaitingToken { api_key: key.to_string() },
            None => AuthState::AwaitingLogin,
        };
        Self { state }
    }

    pub fn start_url(&self) -> String {
        match &self.state {
            AuthState::AwaitingLogin => LOGIN_URL.to_string(),
            AuthState::AwaitingApiKey => API_KEY_URL.to_string(),
            AuthState::AwaitingToken { api_key } => token_url(api_key),
            AuthState::Done(_) => String::new(),
        }
    }

    /// Advance with a page load, returning the URL to open next if any
    pub fn observe(&mut self, page: &PageLoad) -> Option<String> {
        let step = transition(&self.state, page);
        self.state = step.next;
        step.navigate
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        match &self.state {
            AuthState::Done(credentials) => Some(credentials),
            _ => None,
        }
    }
}

/// Pure transition function: (state, observed page) -> (next state, navigation)
pub fn transition(state: &AuthState, page: &PageLoad) -> Step {
    match state {
        AuthState::AwaitingLogin => {
            if same_location(&page.location, LOGIN_REDIRECT_URL) {
                return Step { next: AuthState::AwaitingApiKey, navigate: Some(API_KEY_URL.into()) };
            }
            // Already logged in: the key page may show up directly
            match find_api_key(&page.html) {
                Some(api_key) => key_found(api_key),
                None => Step::stay(state.clone()),
            }
        }
        AuthState::AwaitingApiKey => match find_api_key(&page.html) {
            Some(api_key) => key_found(api_key),
            None => Step::stay(state.clone()),
        },
        AuthState::AwaitingToken { api_key } => match find_token(&page.html) {
            Some(token) => Step::stay(AuthState::Done(Credentials::new(api_key.clone(), token))),
            None => Step::stay(state.clone()),
        },
        AuthState::Done(_) => Step::stay(state.clone()),
    }
}

fn key_found(api_key: String) -> Step {
    let navigate = Some(token_url(&api_key));
    Step { next: AuthState::AwaitingToken { api_key }, navigate }
}
