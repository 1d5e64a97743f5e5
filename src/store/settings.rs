//! Persisted application state and its on-disk schema

use serde::{Deserialize, Serialize};

use crate::models::Credentials;

/// Query every fresh history starts with: cards assigned to the user
pub const DEFAULT_QUERY: &str = "@me";

const HISTORY_SEPARATOR: char = ';';

/// Previously submitted query strings, most recent first, without duplicates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self { entries: vec![DEFAULT_QUERY.to_string()] }
    }

    /// Parse the semicolon-joined form stored in the settings file
    pub fn from_joined(joined: &str) -> Self {
        let mut history = Self { entries: Vec::new() };
        for entry in joined.split(HISTORY_SEPARATOR) {
            let entry = entry.trim();
            if !entry.is_empty() && !history.contains(entry) {
                history.entries.push(entry.to_string());
            }
        }
        if history.entries.is_empty() { Self::new() } else { history }
    }

    pub fn joined(&self) -> String {
        self.entries.join(&HISTORY_SEPARATOR.to_string())
    }

    /// Record a submitted query. Already known queries keep their position.
    ///
    /// Returns true if the query was new.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() || self.contains(query) {
            return false;
        }
        // The separator cannot round-trip through the settings file
        if query.contains(HISTORY_SEPARATOR) {
            return false;
        }
        self.entries.insert(0, query.to_string());
        true
    }

    pub fn clear(&mut self) {
        self.entries = vec![DEFAULT_QUERY.to_string()];
    }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.iter().any(|e| e == query)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Most recently recorded query
    pub fn latest(&self) -> &str {
        self.entries.first().map(String::as_str).unwrap_or(DEFAULT_QUERY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// One level of grouping in the results tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupLevel {
    Board,
    List,
}

/// Grouping order for the results tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortPreference {
    None,
    Board,
    List,
    #[default]
    BoardThenList,
    ListThenBoard,
}

impl SortPreference {
    pub const ALL: [SortPreference; 5] = [
        SortPreference::BoardThenList,
        SortPreference::Board,
        SortPreference::ListThenBoard,
        SortPreference::List,
        SortPreference::None,
    ];

    /// Token written to the `[sort]` section
    pub fn token(self) -> &'static str {
        match self {
            SortPreference::None => "",
            SortPreference::Board => "board",
            SortPreference::List => "list",
            SortPreference::BoardThenList => "board list",
            SortPreference::ListThenBoard => "list board",
        }
    }

    /// Accepts the stored token; whitespace, `-`, `>` and `,` all separate levels
    pub fn from_token(token: &str) -> Option<Self> {
        let words: Vec<String> = token
            .split(|c: char| c.is_whitespace() || c == '-' || c == '>' || c == ',')
            .filter(|w| !w.is_empty())
            .map(|w| w.to_ascii_lowercase())
            .collect();
        let words: Vec<&str> = words.iter().map(String::as_str).collect();

        match words.as_slice() {
            [] | ["none"] => Some(SortPreference::None),
            ["board"] => Some(SortPreference::Board),
            ["list"] => Some(SortPreference::List),
            ["board", "list"] => Some(SortPreference::BoardThenList),
            ["list", "board"] => Some(SortPreference::ListThenBoard),
            _ => None,
        }
    }

    pub fn levels(self) -> &'static [GroupLevel] {
        match self {
            SortPreference::None => &[],
            SortPreference::Board => &[GroupLevel::Board],
            SortPreference::List => &[GroupLevel::List],
            SortPreference::BoardThenList => &[GroupLevel::Board, GroupLevel::List],
            SortPreference::ListThenBoard => &[GroupLevel::List, GroupLevel::Board],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortPreference::None => "None",
            SortPreference::Board => "Board",
            SortPreference::List => "List",
            SortPreference::BoardThenList => "Board > List",
            SortPreference::ListThenBoard => "List > Board",
        }
    }

    /// Next option in display order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Last known window position and size.
///
/// In a terminal only width and height (columns, rows) can be applied; x and y
/// are carried through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

/// Everything the settings file remembers between runs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedState {
    pub credentials: Option<Credentials>,
    pub history: SearchHistory,
    pub sort: SortPreference,
    pub geometry: Option<WindowGeometry>,
}

// On-disk schema. Every section is optional so partially written or older
// files still load.

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<WindowGeometry>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct AuthSection {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SearchSection {
    #[serde(default)]
    pub search_strings: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SortSection {
    #[serde(default)]
    pub order: Option<String>,
}
