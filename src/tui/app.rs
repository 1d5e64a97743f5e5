//! TUI application state and event handling.
//!
//! The `App` owns the Trello client, the session (search history and board
//! cache) and everything on screen:
//!
//! - **Results tree**: cards grouped by the current sort preference, with
//!   collapsible categories whose state survives refreshes
//! - **Search input**: query entry with recall of previous queries
//! - **Status bar**: transient feedback and search errors
//!
//! Searches run synchronously on the UI thread; the screen simply does not
//! update while a request is in flight.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut app = App::new(client, session, SortPreference::default(), Box::new(SystemOpener));
//! app.search("@me");
//! let reason = app.run(&mut terminal)?;
//! ```

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, NaiveDate};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{info, warn};

use super::events::{Action, Focus, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::api::{ApiError, DEFAULT_CARDS_LIMIT, Transport, TrelloClient};
use crate::clipboard::copy_url_to_clipboard;
use crate::links::UrlOpener;
use crate::models::Card;
use crate::results::{ExpansionState, ResultTree, Row, RowKind};
use crate::session::Session;
use crate::store::SortPreference;

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;
/// Rows moved by PageUp/PageDown
const PAGE_SIZE: isize = 10;
const MAX_QUERY_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

/// Why the event loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Quit,
    /// Trello rejected the credentials; authorize again and restart
    Reauthenticate,
}

/// Identity of the selected row, used to keep the selection across rebuilds
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    Category(String),
    Card(String),
}

pub struct App<T: Transport> {
    client: TrelloClient<T>,
    session: Session,
    sort: SortPreference,
    limit: u32,
    today: NaiveDate,
    tree: ResultTree,
    expansion: ExpansionState,
    rows: Vec<Row>,
    selected_idx: usize,
    focus: Focus,
    input: String,
    history_cursor: Option<usize>,
    current_query: Option<String>,
    search_error: Option<String>,
    exit: Option<ExitReason>,
    status_message: Option<StatusMessage>,
    opener: Box<dyn UrlOpener>,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl<T: Transport> App<T> {
    pub fn new(
        client: TrelloClient<T>,
        session: Session,
        sort: SortPreference,
        opener: Box<dyn UrlOpener>,
    ) -> Self {
        let input = session.history.latest().to_string();
        Self {
            client,
            session,
            sort,
            limit: DEFAULT_CARDS_LIMIT,
            today: Local::now().date_naive(),
            tree: ResultTree::default(),
            expansion: ExpansionState::default(),
            rows: Vec::new(),
            selected_idx: 0,
            focus: Focus::Tree,
            input,
            history_cursor: None,
            current_query: None,
            search_error: None,
            exit: None,
            status_message: None,
            opener,
            needs_redraw: true,
            last_draw_time: Instant::now(),
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Fix the date used for due-date classification
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn sort(&self) -> SortPreference {
        self.sort
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tree(&self) -> &ResultTree {
        &self.tree
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn search_error(&self) -> Option<&str> {
        self.search_error.as_deref()
    }

    pub fn exit_reason(&self) -> Option<ExitReason> {
        self.exit
    }

    /// Give back the session, sort order and client once the UI is done
    pub fn into_parts(self) -> (Session, SortPreference, TrelloClient<T>) {
        (self.session, self.sort, self.client)
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    fn check_and_clear_expired_status(&mut self) {
        let expired =
            self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at);
        if expired {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    /// Run a search and show its results.
    ///
    /// A failed search keeps the previous results on screen and reports the
    /// error; rejected credentials end the event loop so the caller can
    /// authorize again.
    pub fn search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.current_query = Some(query.to_string());
        self.needs_redraw = true;

        match self.session.search(&self.client, query, self.limit) {
            Ok(cards) => {
                let count = cards.len();
                self.search_error = None;
                self.rebuild(cards);
                self.set_status(
                    format!("✓ {} card{}", count, if count == 1 { "" } else { "s" }),
                    MessageType::Success,
                    STATUS_SUCCESS_DURATION_MS,
                );
            }
            Err(ApiError::Auth(body)) => {
                warn!(body = %body, "Search rejected, re-authorization needed");
                self.search_error = Some("Trello rejected the stored credentials".to_string());
                self.exit = Some(ExitReason::Reauthenticate);
            }
            Err(e) => {
                warn!(error = %e, "Search failed");
                self.search_error = Some(format!("Search failed: {}", e));
            }
        }
    }

    fn rebuild(&mut self, cards: Vec<Card>) {
        let selection = self.selected_identity();
        self.tree = ResultTree::build(cards, self.sort);
        self.expansion.retain_existing(&self.tree);
        self.refresh_rows();
        self.restore_selection(selection);
    }

    fn refresh_rows(&mut self) {
        self.rows = self.tree.visible_rows(&self.expansion);
        if self.selected_idx >= self.rows.len() {
            self.selected_idx = self.rows.len().saturating_sub(1);
        }
        self.needs_redraw = true;
    }

    fn selected_identity(&self) -> Option<Selection> {
        match &self.rows.get(self.selected_idx)?.kind {
            RowKind::Category { key, .. } => Some(Selection::Category(key.clone())),
            RowKind::Card(i) => self.tree.card(*i).map(|c| Selection::Card(c.id.clone())),
        }
    }

    fn restore_selection(&mut self, selection: Option<Selection>) {
        let Some(selection) = selection else {
            self.selected_idx = 0;
            return;
        };
        let found = self.rows.iter().position(|row| match (&row.kind, &selection) {
            (RowKind::Category { key, .. }, Selection::Category(wanted)) => key == wanted,
            (RowKind::Card(i), Selection::Card(wanted)) => {
                self.tree.card(*i).is_some_and(|c| &c.id == wanted)
            }
            _ => false,
        });
        self.selected_idx = found.unwrap_or(0);
    }

    fn selected_row(&self) -> Option<&Row> {
        self.rows.get(self.selected_idx)
    }

    fn selected_card(&self) -> Option<&Card> {
        match self.selected_row()?.kind {
            RowKind::Card(i) => self.tree.card(i),
            RowKind::Category { .. } => None,
        }
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<ExitReason> {
        while self.exit.is_none() {
            self.check_and_clear_expired_status();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= Duration::from_millis(100)
            {
                terminal.draw(|f| render_ui(f, &self.render_state()))?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100), self.focus)?;
            self.handle_action(action);
        }

        Ok(self.exit.unwrap_or(ExitReason::Quit))
    }

    pub(crate) fn render_state(&self) -> RenderState<'_> {
        RenderState {
            tree: &self.tree,
            rows: &self.rows,
            selected_idx: self.selected_idx,
            focus: self.focus,
            input: &self.input,
            sort: self.sort,
            query: self.current_query.as_deref(),
            search_error: self.search_error.as_deref(),
            status_message: self.status_message.as_ref(),
            today: self.today,
        }
    }

    /// Handle a user action (extracted for testing)
    pub(crate) fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.exit = Some(ExitReason::Quit),
            Action::Back => match self.focus {
                Focus::Input => self.set_focus(Focus::Tree),
                Focus::Tree => self.exit = Some(ExitReason::Quit),
            },
            Action::ToggleFocus => {
                let next = if self.focus == Focus::Tree { Focus::Input } else { Focus::Tree };
                self.set_focus(next);
            }
            Action::FocusInput => self.set_focus(Focus::Input),
            Action::MoveUp => self.move_selection(-1),
            Action::MoveDown => self.move_selection(1),
            Action::PageUp => self.move_selection(-PAGE_SIZE),
            Action::PageDown => self.move_selection(PAGE_SIZE),
            Action::Home => self.move_selection(isize::MIN / 2),
            Action::End => self.move_selection(isize::MAX / 2),
            Action::Activate => self.activate(),
            Action::ToggleCategory => {
                if let Some(RowKind::Category { key, .. }) = self.selected_row().map(|r| r.kind.clone()) {
                    self.expansion.toggle(&key);
                    self.refresh_rows();
                }
            }
            Action::Collapse => self.collapse(),
            Action::Expand => {
                if let Some(RowKind::Category { key, expanded: false, .. }) =
                    self.selected_row().map(|r| r.kind.clone())
                {
                    self.expansion.set_expanded(&key, true);
                    self.refresh_rows();
                }
            }
            Action::Submit => {
                let query = self.input.trim().to_string();
                if !query.is_empty() {
                    self.history_cursor = None;
                    self.search(&query);
                    self.set_focus(Focus::Tree);
                }
            }
            Action::HistoryPrev => self.recall_history(1),
            Action::HistoryNext => self.recall_history(-1),
            Action::UpdateInput(c) => {
                if self.input.len() < MAX_QUERY_LEN {
                    self.input.push(c);
                    self.history_cursor = None;
                    self.needs_redraw = true;
                }
            }
            Action::DeleteChar => {
                if self.input.pop().is_some() {
                    self.history_cursor = None;
                    self.needs_redraw = true;
                }
            }
            Action::Refresh => {
                let query = self.current_query.clone().unwrap_or_else(|| self.input.clone());
                self.search(&query);
            }
            Action::CycleSort => {
                self.sort = self.sort.next();
                info!(sort = self.sort.token(), "Sort order changed");
                let cards = self.tree.cards().to_vec();
                self.rebuild(cards);
                let text = format!("Sort: {}", self.sort.label());
                self.set_status(text, MessageType::Success, STATUS_SUCCESS_DURATION_MS);
            }
            Action::ClearHistory => {
                self.session.history.clear();
                self.history_cursor = None;
                self.set_status("✓ Search history cleared", MessageType::Success, STATUS_SUCCESS_DURATION_MS);
            }
            Action::CopyUrl => self.copy_selected_url(),
            Action::None => {}
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        if self.focus != focus {
            self.focus = focus;
            self.needs_redraw = true;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.rows.is_empty() {
            self.selected_idx = 0;
            return;
        }

        let old_idx = self.selected_idx;
        let new_idx = (self.selected_idx as isize).saturating_add(delta).max(0) as usize;
        self.selected_idx = new_idx.min(self.rows.len() - 1);

        if old_idx != self.selected_idx {
            self.needs_redraw = true;
        }
    }

    /// Open the selected card in the browser; categories do nothing
    fn activate(&mut self) {
        let Some(url) = self.selected_card().map(|c| c.url.clone()) else {
            return;
        };
        match self.opener.open(&url) {
            Ok(()) => {
                info!(url = %url, "Opened card");
                self.set_status("✓ Opened in browser", MessageType::Success, STATUS_SUCCESS_DURATION_MS);
            }
            Err(e) => {
                self.set_status(format!("✗ {}", e), MessageType::Error, STATUS_ERROR_DURATION_MS)
            }
        }
    }

    /// Collapse an expanded category, otherwise jump to the parent category
    fn collapse(&mut self) {
        let Some(row) = self.selected_row().cloned() else {
            return;
        };
        if let RowKind::Category { key, expanded: true, .. } = &row.kind {
            self.expansion.set_expanded(key, false);
            self.refresh_rows();
            return;
        }
        if let Some(parent) =
            self.rows[..self.selected_idx].iter().rposition(|r| r.depth < row.depth)
        {
            self.selected_idx = parent;
            self.needs_redraw = true;
        }
    }

    /// Step through the history; `direction` 1 goes to older queries
    fn recall_history(&mut self, direction: isize) {
        let entries = self.session.history.entries();
        if entries.is_empty() {
            return;
        }
        let next = match (self.history_cursor, direction) {
            (None, d) if d > 0 => Some(0),
            (None, _) => None,
            (Some(i), d) if d > 0 => Some((i + 1).min(entries.len() - 1)),
            (Some(0), _) => None,
            (Some(i), _) => Some(i - 1),
        };
        if let Some(i) = next {
            self.input = entries[i].clone();
        }
        self.history_cursor = next;
        self.needs_redraw = true;
    }

    fn copy_selected_url(&mut self) {
        let Some(url) = self.selected_card().map(|c| c.url.clone()) else {
            self.set_status("✗ No card selected", MessageType::Error, STATUS_ERROR_DURATION_MS);
            return;
        };
        match copy_url_to_clipboard(&url) {
            Ok(()) => {
                self.set_status("✓ Copied to clipboard", MessageType::Success, STATUS_SUCCESS_DURATION_MS)
            }
            Err(e) => self.set_status(
                format!("✗ Clipboard error: {}", e),
                MessageType::Error,
                STATUS_ERROR_DURATION_MS,
            ),
        }
    }
}
