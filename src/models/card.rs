use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Board a card belongs to.
///
/// Comes inline with search results when `card_board=true` is requested,
/// otherwise it is resolved through `GET /1/boards/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub id: String,
    #[serde(default, deserialize_with = "super::deserializers::deserialize_nullable_string")]
    pub name: String,
    #[serde(default, deserialize_with = "super::deserializers::deserialize_nullable_string")]
    pub url: String,
}

impl Board {
    /// Search responses occasionally carry only the board id
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.url.is_empty()
    }
}

/// A list (column) within a board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardList {
    #[serde(default)]
    pub id: String,
    #[serde(default, deserialize_with = "super::deserializers::deserialize_nullable_string")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default, deserialize_with = "super::deserializers::deserialize_nullable_string")]
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Checklist counters Trello reports on every card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badges {
    #[serde(rename = "checkItems", default)]
    pub check_items: u32,
    #[serde(rename = "checkItemsChecked", default)]
    pub check_items_checked: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, deserialize_with = "super::deserializers::deserialize_due")]
    pub due: Option<DateTime<Utc>>,
    #[serde(rename = "dueComplete", default)]
    pub due_complete: bool,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub badges: Badges,
    #[serde(rename = "idBoard", default)]
    pub board_id: String,
    #[serde(default)]
    pub board: Option<Board>,
    #[serde(default)]
    pub list: Option<CardList>,
}

impl Card {
    /// Due date in the user's local calendar
    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due.map(|due| due.with_timezone(&Local).date_naive())
    }

    pub fn checklist_total(&self) -> u32 {
        self.badges.check_items
    }

    pub fn checklist_completed(&self) -> u32 {
        self.badges.check_items_checked
    }

    pub fn board_name(&self) -> &str {
        self.board.as_ref().map(|b| b.name.as_str()).unwrap_or("")
    }

    pub fn board_url(&self) -> &str {
        self.board.as_ref().map(|b| b.url.as_str()).unwrap_or("")
    }

    pub fn list_name(&self) -> &str {
        self.list.as_ref().map(|l| l.name.as_str()).unwrap_or("")
    }

    /// Board id from the inline board, falling back to `idBoard`
    pub fn board_ref(&self) -> &str {
        match &self.board {
            Some(board) if !board.id.is_empty() => &board.id,
            _ => &self.board_id,
        }
    }

    /// Comma separated label names, as shown in the label column
    pub fn label_names(&self) -> String {
        self.labels
            .iter()
            .map(|l| l.name.as_str())
            .filter(|n| !n.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
