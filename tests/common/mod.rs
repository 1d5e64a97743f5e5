//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeZone, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;
use trello_radar::api::{HttpResponse, Transport, TransportError};

/// Builder for card objects as the Trello search endpoint returns them
pub struct CardBuilder {
    id: String,
    name: String,
    board: Option<(String, String)>,
    list: Option<String>,
    due: Option<String>,
    due_complete: bool,
    checklist: (u32, u32),
    labels: Vec<(String, String)>,
}

impl CardBuilder {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            board: None,
            list: None,
            due: None,
            due_complete: false,
            checklist: (0, 0),
            labels: Vec::new(),
        }
    }

    /// Inline board with a URL derived from its name
    pub fn on_board(mut self, name: &str) -> Self {
        self.board = Some((name.to_lowercase(), name.to_string()));
        self
    }

    pub fn in_list(mut self, name: &str) -> Self {
        self.list = Some(name.to_string());
        self
    }

    /// Due at local noon on `date`
    pub fn due_on(mut self, date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).expect("valid time");
        let local = Local.from_local_datetime(&noon).earliest().expect("local noon exists");
        self.due = Some(local.with_timezone(&Utc).to_rfc3339());
        self
    }

    pub fn complete(mut self) -> Self {
        self.due_complete = true;
        self
    }

    pub fn checklist(mut self, total: u32, checked: u32) -> Self {
        self.checklist = (total, checked);
        self
    }

    pub fn label(mut self, name: &str, color: &str) -> Self {
        self.labels.push((name.to_string(), color.to_string()));
        self
    }

    pub fn to_json(&self) -> Value {
        let board_id = self.board.as_ref().map(|(id, _)| id.clone()).unwrap_or_default();
        let board = self.board.as_ref().map(|(id, name)| {
            json!({ "id": id, "name": name, "url": format!("https://trello.com/b/{}", id) })
        });
        let list = self.list.as_ref().map(|name| json!({ "id": name.to_lowercase(), "name": name }));
        let labels: Vec<Value> =
            self.labels.iter().map(|(name, color)| json!({ "name": name, "color": color })).collect();

        json!({
            "id": self.id,
            "name": self.name,
            "url": format!("https://trello.com/c/{}", self.id),
            "due": self.due,
            "dueComplete": self.due_complete,
            "idBoard": board_id,
            "board": board,
            "list": list,
            "labels": labels,
            "badges": { "checkItems": self.checklist.0, "checkItemsChecked": self.checklist.1 },
        })
    }
}

/// Body of a `/1/search` response containing the given cards
pub fn search_body(cards: &[CardBuilder]) -> String {
    let cards: Vec<Value> = cards.iter().map(CardBuilder::to_json).collect();
    json!({ "cards": cards }).to_string()
}

/// Transport replaying canned responses in order and recording requested paths
#[derive(Default)]
pub struct StubTransport {
    responses: RefCell<VecDeque<HttpResponse>>,
    pub paths: RefCell<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.responses.borrow_mut().push_back(HttpResponse { status, body: body.into() });
        self
    }
}

impl Transport for StubTransport {
    fn get(&self, path: &str, _query: &[(&str, String)]) -> Result<HttpResponse, TransportError> {
        self.paths.borrow_mut().push(path.to_string());
        self.responses.borrow_mut().pop_front().ok_or_else(|| TransportError::Request {
            url: path.to_string(),
            message: "no canned response".to_string(),
        })
    }
}

/// Temporary directory holding a settings file
pub struct SettingsDir {
    temp_dir: TempDir,
}

impl SettingsDir {
    pub fn new() -> Self {
        Self { temp_dir: TempDir::new().expect("Failed to create temp dir") }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn settings_path(&self) -> PathBuf {
        self.temp_dir.path().join("settings.toml")
    }

    pub fn with_settings(self, content: &str) -> Self {
        fs::write(self.settings_path(), content).expect("Failed to write settings");
        self
    }

    pub fn read_settings(&self) -> String {
        fs::read_to_string(self.settings_path()).expect("Failed to read settings")
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
