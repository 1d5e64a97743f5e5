//! Trello REST API access: search, board lookup and credential validation

pub mod client;
pub mod error;
pub mod transport;

pub use client::{DEFAULT_CARDS_LIMIT, TrelloClient, Validation};
pub use error::{ApiError, TransportError};
pub use transport::{DEFAULT_BASE_URL, HttpResponse, ReqwestTransport, Transport};
