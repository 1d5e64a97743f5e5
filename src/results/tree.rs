use std::collections::HashSet;

use super::sorting::{Node, group_cards, sort_cards};
use crate::models::Card;
use crate::store::{GroupLevel, SortPreference};

/// Remembers which categories the user collapsed.
///
/// Keyed by category identity so the state survives a refresh; categories not
/// seen before start expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    collapsed: HashSet<String>,
}

impl ExpansionState {
    pub fn is_expanded(&self, key: &str) -> bool {
        !self.collapsed.contains(key)
    }

    pub fn toggle(&mut self, key: &str) {
        if !self.collapsed.remove(key) {
            self.collapsed.insert(key.to_string());
        }
    }

    pub fn set_expanded(&mut self, key: &str, expanded: bool) {
        if expanded {
            self.collapsed.remove(key);
        } else {
            self.collapsed.insert(key.to_string());
        }
    }

    /// Forget categories that no longer exist in `tree`
    pub fn retain_existing(&mut self, tree: &ResultTree) {
        let keys = tree.category_keys();
        self.collapsed.retain(|k| keys.contains(k));
    }

    pub fn collapsed_count(&self) -> usize {
        self.collapsed.len()
    }
}

/// What a visible row shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Category { key: String, name: String, level: GroupLevel, count: usize, expanded: bool },
    /// Index into [`ResultTree::cards`]
    Card(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub depth: usize,
    pub kind: RowKind,
}

/// Sorted cards plus the category structure derived from them
#[derive(Debug, Clone, Default)]
pub struct ResultTree {
    cards: Vec<Card>,
    roots: Vec<Node>,
}

impl ResultTree {
    pub fn build(mut cards: Vec<Card>, pref: SortPreference) -> Self {
        sort_cards(&mut cards, pref);
        let roots = group_cards(&cards, pref);
        Self { cards, roots }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn roots(&self) -> &[Node] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Rows to display, skipping the children of collapsed categories
    pub fn visible_rows(&self, expansion: &ExpansionState) -> Vec<Row> {
        let mut rows = Vec::new();
        push_rows(&self.roots, 0, Some(expansion), &mut rows);
        rows
    }

    /// Every row, as if all categories were expanded
    pub fn all_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        push_rows(&self.roots, 0, None, &mut rows);
        rows
    }

    pub fn category_keys(&self) -> HashSet<String> {
        let mut keys = HashSet::new();
        collect_keys(&self.roots, &mut keys);
        keys
    }
}

fn push_rows(nodes: &[Node], depth: usize, expansion: Option<&ExpansionState>, rows: &mut Vec<Row>) {
    for node in nodes {
        match node {
            Node::Card(index) => rows.push(Row { depth, kind: RowKind::Card(*index) }),
            Node::Category { key, name, level, children } => {
                let expanded = expansion.is_none_or(|e| e.is_expanded(key));
                rows.push(Row {
                    depth,
                    kind: RowKind::Category {
                        key: key.clone(),
                        name: name.clone(),
                        level: *level,
                        count: node.card_count(),
                        expanded,
                    },
                });
                if expanded {
                    push_rows(children, depth + 1, expansion, rows);
                }
            }
        }
    }
}

fn collect_keys(nodes: &[Node], keys: &mut HashSet<String>) {
    for node in nodes {
        if let Node::Category { key, children, .. } = node {
            keys.insert(key.clone());
            collect_keys(children, keys);
        }
    }
}
