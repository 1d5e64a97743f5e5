//! Settings file holding credentials, search history, sort order and window geometry
//!
//! The file is TOML with one table per concern:
//! - `[auth]`: `api_key`, `token`
//! - `[search]`: `search_strings`, semicolon joined, most recent first
//! - `[sort]`: `order`, one of `""`, `board`, `list`, `board list`, `list board`
//! - `[window]`: `x`, `y`, `width`, `height`
//!
//! Default location: `<config dir>/trello-radar/settings.toml`
//! - macOS: `~/Library/Application Support/trello-radar/`
//! - Linux: `~/.config/trello-radar/`
//! - Windows: `%APPDATA%\trello-radar\`
//!
//! The file is read once at startup and rewritten wholesale on exit.

pub mod persistence;
pub mod settings;

pub use persistence::{load_state, save_state};
pub use settings::{
    DEFAULT_QUERY, GroupLevel, PersistedState, SearchHistory, SortPreference, WindowGeometry,
};
