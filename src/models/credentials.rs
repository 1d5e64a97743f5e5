use std::fmt;

use serde::{Deserialize, Serialize};

/// Length of a Trello API key; used to tell a bad token from a bad key
pub const API_KEY_LEN: usize = 32;

/// API key and access token pair.
///
/// Replaced wholesale whenever the authorization flow runs again.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub api_key: String,
    pub token: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), token: token.into() }
    }

    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.token.is_empty()
    }

    /// Cheap format check; a key of the right length is kept when only the token fails
    pub fn has_plausible_key(&self) -> bool {
        self.api_key.len() == API_KEY_LEN
    }
}

/// Shows at most the first four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}

// Never print full secrets, not even in debug logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &mask_secret(&self.api_key))
            .field("token", &mask_secret(&self.token))
            .finish()
    }
}
