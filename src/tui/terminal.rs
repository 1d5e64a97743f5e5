use std::io;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, SetSize, disable_raw_mode, enable_raw_mode, size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::debug;

use crate::store::WindowGeometry;

/// Smallest size worth restoring; anything below is treated as a glitch
const MIN_WIDTH: u16 = 20;
const MIN_HEIGHT: u16 = 8;

/// Manages terminal setup and cleanup
pub struct TerminalManager {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalManager {
    /// Set up terminal for TUI mode, resizing it to a saved geometry if any
    pub fn new(geometry: Option<&WindowGeometry>) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        if let Some(geometry) = geometry.filter(|g| is_usable(g)) {
            // Terminals that ignore the request keep their size
            if let Err(e) = execute!(stdout, SetSize(geometry.width, geometry.height)) {
                debug!(error = %e, "Terminal refused resize");
            }
        }
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }

    /// Current size as a geometry, keeping the position from `previous`
    pub fn geometry(&self, previous: Option<&WindowGeometry>) -> Option<WindowGeometry> {
        let (width, height) = size().ok()?;
        let (x, y) = previous.map(|g| (g.x, g.y)).unwrap_or((0, 0));
        Some(WindowGeometry { x, y, width, height })
    }

    /// Restore terminal to normal mode
    pub fn restore(mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

// Ensure cleanup happens even if dropped (panic, early return, etc.)
impl Drop for TerminalManager {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

pub(crate) fn is_usable(geometry: &WindowGeometry) -> bool {
    geometry.width >= MIN_WIDTH && geometry.height >= MIN_HEIGHT
}
