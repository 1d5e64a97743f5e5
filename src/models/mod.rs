//! Data models for Trello search results and credentials.
//!
//! - [`Card`] - A card returned by the search endpoint
//! - [`Board`] - The board a card lives on (inline or resolved separately)
//! - [`CardList`] - The list (column) a card sits in
//! - [`Label`] - A coloured label attached to a card
//! - [`Credentials`] - API key and token pair used for every request
//!
//! Cards are deserialized straight from the Trello JSON payload; the custom
//! due-date deserializer lives in `deserializers`.

pub mod card;
pub mod credentials;
pub mod deserializers;

pub use card::{Badges, Board, Card, CardList, Label};
pub use credentials::Credentials;
