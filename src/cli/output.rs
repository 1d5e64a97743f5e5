//! Plain-text rendering of a results tree for non-interactive use

use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::Card;
use crate::results::{DueStatus, ResultTree, RowKind, fully_checked};
use crate::tui::format_due;
use crate::utils::sanitize_for_terminal;

const INDENT: &str = "  ";

/// Render every row of the tree, categories expanded, one line per row
pub fn render_tree_text(tree: &ResultTree, today: NaiveDate) -> String {
    if tree.is_empty() {
        return "No cards found\n".to_string();
    }

    let mut out = String::new();
    for row in tree.all_rows() {
        let indent = INDENT.repeat(row.depth);
        match row.kind {
            RowKind::Category { name, count, .. } => {
                let name = if name.is_empty() { "(none)".to_string() } else { sanitize_for_terminal(&name) };
                let _ = writeln!(out, "{}{} ({})", indent, name, count);
            }
            RowKind::Card(i) => {
                if let Some(card) = tree.card(i) {
                    let _ = writeln!(out, "{}- {}", indent, card_line(card, today));
                }
            }
        }
    }
    out
}

fn card_line(card: &Card, today: NaiveDate) -> String {
    let mut parts = vec![sanitize_for_terminal(&card.name)];

    if let Some(date) = card.due_date() {
        parts.push(format!("due {}", format_due(date, today)));
    }
    if let Some(tag) = DueStatus::of(card, today).tag() {
        parts.push(format!("[{}]", tag));
    }
    if fully_checked(card) {
        parts.push("✓".to_string());
    }
    let labels = card.label_names();
    if !labels.is_empty() {
        parts.push(format!("{{{}}}", sanitize_for_terminal(&labels)));
    }
    parts.push(format!("<{}>", card.url));

    parts.join(" ")
}
