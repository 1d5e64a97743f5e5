//! TrelloRadar - search Trello cards and browse them as a grouped tree
//!
//! The crate covers the whole path from credentials to display:
//!
//! - Acquiring an API key and token through Trello's authorization pages
//! - Searching cards through the Trello REST API with a cached board lookup
//! - Sorting and grouping results by board and list, with due-date status
//! - Persisting credentials, search history, sort order and window geometry
//!
//! # Example
//!
//! ```no_run
//! use trello_radar::api::{ReqwestTransport, TrelloClient};
//! use trello_radar::models::Credentials;
//! use trello_radar::results::ResultTree;
//! use trello_radar::session::Session;
//! use trello_radar::store::{SearchHistory, SortPreference};
//!
//! let transport = ReqwestTransport::new("https://api.trello.com")?;
//! let client = TrelloClient::new(transport, Credentials::new("key", "token"));
//! let mut session = Session::new(SearchHistory::new());
//! let cards = session.search(&client, "@me", 100)?;
//! let tree = ResultTree::build(cards, SortPreference::BoardThenList);
//! println!("{} cards", tree.cards().len());
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod clipboard;
pub mod links;
pub mod logging;
pub mod models;
pub mod results;
pub mod session;
pub mod store;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use api::{ApiError, TrelloClient};
pub use models::{Card, Credentials};
pub use results::{DueStatus, ResultTree};
pub use session::Session;
pub use store::{PersistedState, SearchHistory, SortPreference, load_state, save_state};
