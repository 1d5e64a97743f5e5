//! Turning a flat list of cards into the grouped, tagged results tree.
//!
//! - [`sorting`] - composite-key sort and boundary-based grouping
//! - [`status`] - due-date classification and the fully-checked marker
//! - [`tree`] - visible rows and collapsed-category memory
//!
//! Nothing in here touches the terminal or the network, so the interactive
//! UI and the plain `search` command render the same structure.

pub mod sorting;
pub mod status;
pub mod tree;

pub use sorting::{Node, group_cards, sort_cards};
pub use status::{DueStatus, fully_checked};
pub use tree::{ExpansionState, ResultTree, Row, RowKind};
