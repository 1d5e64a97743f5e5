//! Command-line entry point: argument parsing, startup flow and one-shot commands
pub mod commands;
pub mod output;

pub use commands::{Cli, Commands, run};
pub use output::render_tree_text;
