//! Page sources for the authorization flow.
//!
//! A [`Browser`] navigates to URLs and reports each page that finishes
//! loading. The terminal build uses [`ConsoleBrowser`], which opens pages in
//! the system browser and reads back what the user pastes.

use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Stdin, Stdout, Write};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use super::flow::PageLoad;

/// Line that ends a pasted page source
const END_OF_PAGE: &str = ".";
const CANCEL: &str = "q";

pub trait Browser: Send {
    fn navigate(&mut self, url: &str) -> Result<()>;

    /// Block until the next page finishes loading.
    ///
    /// `Ok(None)` means the user closed the browser.
    fn next_page(&mut self) -> Result<Option<PageLoad>>;
}

/// Opens pages with the desktop browser and reads the rendered source from a terminal
pub struct ConsoleBrowser<R, W> {
    reader: R,
    writer: W,
    location: String,
    launch_pages: bool,
}

impl ConsoleBrowser<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout(), true)
    }
}

impl<R: BufRead, W: Write> ConsoleBrowser<R, W> {
    /// `launch_pages` controls whether `navigate` opens the system browser
    pub fn new(reader: R, writer: W, launch_pages: bool) -> Self {
        Self { reader, writer, location: String::new(), launch_pages }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).context("Failed to read from terminal")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl<R: BufRead + Send, W: Write + Send> Browser for ConsoleBrowser<R, W> {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.location = url.to_string();
        writeln!(self.writer, "\nOpen this page in your browser:\n  {}", url)?;
        if self.launch_pages
            && let Err(e) = open::that(url)
        {
            warn!(error = %e, "Failed to launch system browser");
        }
        self.writer.flush()?;
        Ok(())
    }

    fn next_page(&mut self) -> Result<Option<PageLoad>> {
        writeln!(
            self.writer,
            "Paste the page source and finish with a line containing only '{}',\n\
             or type the address the browser shows now ('{}' cancels):",
            END_OF_PAGE, CANCEL
        )?;
        self.writer.flush()?;

        let Some(first) = self.read_line()? else {
            return Ok(None);
        };
        let trimmed = first.trim();

        if trimmed == CANCEL {
            return Ok(None);
        }
        if (trimmed.starts_with("https://") || trimmed.starts_with("http://"))
            && !trimmed.contains(char::is_whitespace)
        {
            debug!(location = trimmed, "Browser location changed");
            self.location = trimmed.to_string();
            return Ok(Some(PageLoad::new(trimmed, "")));
        }
        if trimmed == END_OF_PAGE || trimmed.is_empty() {
            return Ok(Some(PageLoad::new(self.location.clone(), "")));
        }

        let mut html = first;
        html.push('\n');
        while let Some(line) = self.read_line()? {
            if line.trim() == END_OF_PAGE {
                break;
            }
            html.push_str(&line);
            html.push('\n');
        }

        debug!(location = %self.location, bytes = html.len(), "Page source received");
        Ok(Some(PageLoad::new(self.location.clone(), html)))
    }
}

/// Replays a fixed sequence of page loads; used by tests and demos.
///
/// Once the script runs out the browser reports that it was closed, unless
/// built with [`ScriptedBrowser::stall_when_done`], in which case it never
/// returns again (an unresponsive vendor page).
pub struct ScriptedBrowser {
    pages: VecDeque<PageLoad>,
    navigations: Arc<Mutex<Vec<String>>>,
    stall: bool,
}

impl ScriptedBrowser {
    pub fn new(pages: impl IntoIterator<Item = PageLoad>) -> Self {
        Self { pages: pages.into_iter().collect(), navigations: Arc::default(), stall: false }
    }

    pub fn stall_when_done(mut self) -> Self {
        self.stall = true;
        self
    }

    /// Shared log of every URL the flow navigated to
    pub fn navigations(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.navigations)
    }
}

impl Browser for ScriptedBrowser {
    fn navigate(&mut self, url: &str) -> Result<()> {
        if let Ok(mut log) = self.navigations.lock() {
            log.push(url.to_string());
        }
        Ok(())
    }

    fn next_page(&mut self) -> Result<Option<PageLoad>> {
        if let Some(page) = self.pages.pop_front() {
            return Ok(Some(page));
        }
        if self.stall {
            loop {
                std::thread::park();
            }
        }
        Ok(None)
    }
}
