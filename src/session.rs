//! Per-run state shared by the search and presentation layers.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::api::{ApiError, Transport, TrelloClient};
use crate::models::{Board, Card};
use crate::store::SearchHistory;

/// Search history plus a board cache that lives for one run.
///
/// Boards are cached by id and by name. Entries are only ever added: a
/// board's name and URL do not change while the program runs.
#[derive(Debug, Default)]
pub struct Session {
    pub history: SearchHistory,
    boards_by_id: HashMap<String, Board>,
    boards_by_name: HashMap<String, Board>,
}

impl Session {
    pub fn new(history: SearchHistory) -> Self {
        Self { history, boards_by_id: HashMap::new(), boards_by_name: HashMap::new() }
    }

    /// Run a search, record the query and fill in any board details the
    /// response left out
    pub fn search<T: Transport>(
        &mut self,
        client: &TrelloClient<T>,
        query: &str,
        limit: u32,
    ) -> Result<Vec<Card>, ApiError> {
        let query = query.trim();
        self.history.record(query);

        let mut cards = client.search(query, limit)?;
        for card in &mut cards {
            self.remember_inline_board(card);
            self.complete_board(client, card);
        }
        Ok(cards)
    }

    fn remember_inline_board(&mut self, card: &Card) {
        if let Some(board) = &card.board
            && board.is_complete()
        {
            self.insert_board(board.clone());
        }
    }

    /// Lookup failures leave the card without board details rather than
    /// failing the whole search
    fn complete_board<T: Transport>(&mut self, client: &TrelloClient<T>, card: &mut Card) {
        if card.board.as_ref().is_some_and(Board::is_complete) {
            return;
        }
        let id = card.board_ref().to_string();
        if id.is_empty() {
            return;
        }

        if let Some(board) = self.boards_by_id.get(&id) {
            debug!(board_id = %id, "Board cache hit");
            card.board = Some(board.clone());
            return;
        }

        match client.resolve_board(&id) {
            Ok(board) => {
                self.insert_board(board.clone());
                card.board = Some(board);
            }
            Err(e) => warn!(board_id = %id, error = %e, "Failed to resolve board"),
        }
    }

    fn insert_board(&mut self, board: Board) {
        if self.boards_by_id.contains_key(&board.id) {
            return;
        }
        self.boards_by_name.entry(board.name.clone()).or_insert_with(|| board.clone());
        self.boards_by_id.insert(board.id.clone(), board);
    }

    pub fn board_by_id(&self, id: &str) -> Option<&Board> {
        self.boards_by_id.get(id)
    }

    pub fn board_by_name(&self, name: &str) -> Option<&Board> {
        self.boards_by_name.get(name)
    }

    pub fn cached_boards(&self) -> usize {
        self.boards_by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::tests::MockTransport;
    use crate::models::Credentials;

    fn client(transport: MockTransport) -> TrelloClient<MockTransport> {
        TrelloClient::new(transport, Credentials::new("k", "t"))
    }

    const PARTIAL_CARDS: &str = r#"{"cards":[
        {"id":"1","name":"A","url":"u1","idBoard":"b1"},
        {"id":"2","name":"B","url":"u2","idBoard":"b1"},
        {"id":"3","name":"C","url":"u3","idBoard":"b2","board":{"id":"b2","name":"Docs","url":"https://trello.com/b/b2"}}
    ]}"#;

    #[test]
    fn test_search_records_history() {
        let client = client(MockTransport::new().respond(200, r#"{"cards":[]}"#));
        let mut session = Session::new(SearchHistory::new());

        session.search(&client, " board:Ops ", 10).unwrap();

        assert_eq!(session.history.entries(), ["board:Ops", "@me"]);
    }

    #[test]
    fn test_search_records_history_even_on_failure() {
        let client = client(MockTransport::new().respond(500, "down"));
        let mut session = Session::new(SearchHistory::new());

        assert!(session.search(&client, "x", 10).is_err());
        assert!(session.history.contains("x"));
    }

    #[test]
    fn test_missing_boards_resolved_once() {
        let client = client(
            MockTransport::new()
                .respond(200, PARTIAL_CARDS)
                .respond(200, r#"{"id":"b1","name":"Ops","url":"https://trello.com/b/b1"}"#),
        );
        let mut session = Session::new(SearchHistory::new());

        let cards = session.search(&client, "@me", 10).unwrap();

        // One search plus a single lookup for b1; b2 came inline
        assert_eq!(client_requests(&client), vec!["/1/search", "/1/boards/b1"]);
        assert_eq!(cards[0].board_name(), "Ops");
        assert_eq!(cards[1].board_name(), "Ops");
        assert_eq!(cards[2].board_name(), "Docs");
        assert_eq!(session.cached_boards(), 2);
        assert_eq!(session.board_by_name("Docs").unwrap().id, "b2");
        assert_eq!(session.board_by_id("b1").unwrap().url, "https://trello.com/b/b1");
    }

    #[test]
    fn test_cache_survives_between_searches() {
        let client = client(
            MockTransport::new()
                .respond(200, r#"{"cards":[{"id":"1","name":"A","url":"u","idBoard":"b1"}]}"#)
                .respond(200, r#"{"id":"b1","name":"Ops","url":"https://trello.com/b/b1"}"#)
                .respond(200, r#"{"cards":[{"id":"2","name":"B","url":"v","idBoard":"b1"}]}"#),
        );
        let mut session = Session::new(SearchHistory::new());

        session.search(&client, "@me", 10).unwrap();
        let cards = session.search(&client, "@me", 10).unwrap();

        assert_eq!(cards[0].board_name(), "Ops");
        assert_eq!(client_requests(&client), vec!["/1/search", "/1/boards/b1", "/1/search"]);
    }

    #[test]
    fn test_failed_board_lookup_keeps_card() {
        let client = client(
            MockTransport::new()
                .respond(200, r#"{"cards":[{"id":"1","name":"A","url":"u","idBoard":"b1"}]}"#)
                .respond(404, "board not found"),
        );
        let mut session = Session::new(SearchHistory::new());

        let cards = session.search(&client, "@me", 10).unwrap();

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].board_name(), "");
        assert_eq!(session.cached_boards(), 0);
    }

    fn client_requests(client: &TrelloClient<MockTransport>) -> Vec<String> {
        client.transport().requests.borrow().iter().map(|(path, _)| path.clone()).collect()
    }
}
