//! Sorting and grouping of search results.
//!
//! Groups are never computed independently of the sort: [`group_cards`] walks
//! the already sorted cards and starts a new group wherever the category
//! identity changes. Group order therefore always equals sort order.

use std::cmp::Ordering;

use crate::models::Card;
use crate::store::{GroupLevel, SortPreference};

/// Separator joining nested category identities
pub const KEY_SEPARATOR: char = '|';

/// A node of the grouped result structure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Category { key: String, name: String, level: GroupLevel, children: Vec<Node> },
    /// Index into the sorted card slice
    Card(usize),
}

impl Node {
    pub fn card_count(&self) -> usize {
        match self {
            Node::Card(_) => 1,
            Node::Category { children, .. } => children.iter().map(Node::card_count).sum(),
        }
    }
}

/// Display name of the category a card falls into at `level`
pub fn category_name(card: &Card, level: GroupLevel) -> &str {
    match level {
        GroupLevel::Board => card.board_name(),
        GroupLevel::List => card.list_name(),
    }
}

/// Identity of the category at `level`: boards by URL (names can repeat), lists by name
pub fn category_identity(card: &Card, level: GroupLevel) -> &str {
    match level {
        GroupLevel::Board => {
            let url = card.board_url();
            if url.is_empty() { card.board_ref() } else { url }
        }
        GroupLevel::List => card.list_name(),
    }
}

fn compare_level(a: &Card, b: &Card, level: GroupLevel) -> Ordering {
    category_name(a, level)
        .cmp(category_name(b, level))
        .then_with(|| category_identity(a, level).cmp(category_identity(b, level)))
}

/// Stable sort by the composite key the preference describes
pub fn sort_cards(cards: &mut [Card], pref: SortPreference) {
    let levels = pref.levels();
    if levels.is_empty() {
        return;
    }
    cards.sort_by(|a, b| {
        levels.iter().fold(Ordering::Equal, |ord, level| ord.then_with(|| compare_level(a, b, *level)))
    });
}

/// Group already sorted cards into nested categories by detecting key boundaries
pub fn group_cards(sorted: &[Card], pref: SortPreference) -> Vec<Node> {
    let indices: Vec<usize> = (0..sorted.len()).collect();
    build_level(sorted, &indices, pref.levels(), None)
}

fn build_level(
    cards: &[Card],
    indices: &[usize],
    levels: &[GroupLevel],
    parent_key: Option<&str>,
) -> Vec<Node> {
    let Some((&level, rest)) = levels.split_first() else {
        return indices.iter().map(|&i| Node::Card(i)).collect();
    };

    let mut nodes = Vec::new();
    let mut start = 0;
    while start < indices.len() {
        let first = &cards[indices[start]];
        let identity = category_identity(first, level);
        let mut end = start + 1;
        while end < indices.len() && category_identity(&cards[indices[end]], level) == identity {
            end += 1;
        }

        let key = match parent_key {
            Some(parent) => format!("{}{}{}", parent, KEY_SEPARATOR, identity),
            None => identity.to_string(),
        };
        let children = build_level(cards, &indices[start..end], rest, Some(&key));
        nodes.push(Node::Category {
            key,
            name: category_name(first, level).to_string(),
            level,
            children,
        });
        start = end;
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Board, CardList};

    fn card(name: &str, board: &str, list: &str) -> Card {
        Card {
            id: name.to_string(),
            name: name.to_string(),
            url: format!("https://trello.com/c/{}", name),
            due: None,
            due_complete: false,
            labels: vec![],
            badges: Default::default(),
            board_id: board.to_lowercase(),
            board: Some(Board {
                id: board.to_lowercase(),
                name: board.to_string(),
                url: format!("https://trello.com/b/{}", board.to_lowercase()),
            }),
            list: Some(CardList { id: list.to_lowercase(), name: list.to_string() }),
        }
    }

    fn sample() -> Vec<Card> {
        vec![
            card("1", "Ops", "Doing"),
            card("2", "Docs", "Todo"),
            card("3", "Ops", "Todo"),
            card("4", "Docs", "Doing"),
            card("5", "Ops", "Doing"),
        ]
    }

    fn names(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.name.as_str()).collect()
    }

    fn top_names(nodes: &[Node]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(|n| match n {
                Node::Category { name, .. } => Some(name.clone()),
                Node::Card(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_sort_none_keeps_order() {
        let mut cards = sample();
        sort_cards(&mut cards, SortPreference::None);
        assert_eq!(names(&cards), ["1", "2", "3", "4", "5"]);
        let nodes = group_cards(&cards, SortPreference::None);
        assert_eq!(nodes, (0..5).map(Node::Card).collect::<Vec<_>>());
    }

    #[test]
    fn test_sort_board_is_stable() {
        let mut cards = sample();
        sort_cards(&mut cards, SortPreference::Board);
        assert_eq!(names(&cards), ["2", "4", "1", "3", "5"]);
    }

    #[test]
    fn test_sort_board_then_list() {
        let mut cards = sample();
        sort_cards(&mut cards, SortPreference::BoardThenList);
        assert_eq!(names(&cards), ["4", "2", "1", "5", "3"]);
    }

    #[test]
    fn test_group_board_then_list_nesting() {
        let mut cards = sample();
        sort_cards(&mut cards, SortPreference::BoardThenList);
        let nodes = group_cards(&cards, SortPreference::BoardThenList);

        assert_eq!(top_names(&nodes), ["Docs", "Ops"]);
        let Node::Category { key, children, .. } = &nodes[1] else { panic!("expected category") };
        assert_eq!(key, "https://trello.com/b/ops");
        assert_eq!(top_names(children), ["Doing", "Todo"]);
        let Node::Category { key, children: cards_in_list, .. } = &children[0] else {
            panic!("expected category")
        };
        assert_eq!(key, "https://trello.com/b/ops|Doing");
        assert_eq!(cards_in_list.len(), 2);
    }

    #[test]
    fn test_group_list_then_board_keys() {
        let mut cards = sample();
        sort_cards(&mut cards, SortPreference::ListThenBoard);
        let nodes = group_cards(&cards, SortPreference::ListThenBoard);

        assert_eq!(top_names(&nodes), ["Doing", "Todo"]);
        let Node::Category { children, .. } = &nodes[0] else { panic!("expected category") };
        let Node::Category { key, .. } = &children[0] else { panic!("expected category") };
        assert_eq!(key, "Doing|https://trello.com/b/docs");
    }

    #[test]
    fn test_group_order_matches_sort_order_for_every_preference() {
        for pref in SortPreference::ALL {
            let mut cards = sample();
            sort_cards(&mut cards, pref);
            let nodes = group_cards(&cards, pref);

            let mut flattened = Vec::new();
            flatten(&nodes, &mut flattened);
            assert_eq!(flattened, (0..cards.len()).collect::<Vec<_>>(), "{:?}", pref);

            // No category appears twice at the top level
            let tops = top_names(&nodes);
            let mut deduped = tops.clone();
            deduped.dedup();
            assert_eq!(tops, deduped, "{:?}", pref);
        }
    }

    fn flatten(nodes: &[Node], out: &mut Vec<usize>) {
        for node in nodes {
            match node {
                Node::Card(i) => out.push(*i),
                Node::Category { children, .. } => flatten(children, out),
            }
        }
    }

    #[test]
    fn test_same_board_name_different_boards_stay_apart() {
        let mut a = card("a", "Ops", "Todo");
        let mut b = card("b", "Ops", "Todo");
        a.board.as_mut().unwrap().url = "https://trello.com/b/one".into();
        b.board.as_mut().unwrap().url = "https://trello.com/b/two".into();
        let mut cards = vec![b, a.clone(), card("c", "Ops", "Todo")];
        cards[2].board.as_mut().unwrap().url = "https://trello.com/b/one".into();

        sort_cards(&mut cards, SortPreference::Board);
        let nodes = group_cards(&cards, SortPreference::Board);

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].card_count(), 2);
        assert_eq!(nodes[1].card_count(), 1);
    }

    #[test]
    fn test_cards_without_board_group_by_board_ref() {
        let mut cards = vec![card("a", "Ops", "Todo")];
        cards[0].board = None;
        cards[0].board_id = "b42".into();

        let nodes = group_cards(&cards, SortPreference::Board);
        let Node::Category { key, name, .. } = &nodes[0] else { panic!("expected category") };
        assert_eq!(key, "b42");
        assert_eq!(name, "");
    }

    #[test]
    fn test_empty_input() {
        let nodes = group_cards(&[], SortPreference::BoardThenList);
        assert!(nodes.is_empty());
    }
}
