//! Interactive results browser
mod app;
mod dates;
mod events;
mod layout;
mod rendering;
mod terminal;

use anyhow::Result;
pub use app::{App, ExitReason};
pub use dates::format_due;
pub use terminal::TerminalManager;
use tracing::info;

use crate::api::Transport;
use crate::store::WindowGeometry;

/// How an interactive session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveOutcome {
    pub reason: ExitReason,
    /// Terminal size at exit, to be stored for the next start
    pub geometry: Option<WindowGeometry>,
}

/// Run the interactive TUI, starting with a search for the current input
pub fn run_interactive<T: Transport>(
    app: &mut App<T>,
    geometry: Option<&WindowGeometry>,
) -> Result<InteractiveOutcome> {
    let mut manager = TerminalManager::new(geometry)?;

    let query = app.input().to_string();
    app.search(&query);

    let res = app.run(manager.terminal_mut());
    let geometry = manager.geometry(geometry).or_else(|| geometry.copied());
    manager.restore()?;

    let reason = res?;
    info!(reason = ?reason, "Interactive session ended");
    Ok(InteractiveOutcome { reason, geometry })
}
