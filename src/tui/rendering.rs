use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, Table, TableState};

use super::app::{MessageType, StatusMessage};
use super::dates::format_due;
use super::events::Focus;
use super::layout::AppLayout;
use crate::models::Card;
use crate::results::{DueStatus, ResultTree, Row, RowKind, fully_checked};
use crate::store::SortPreference;
use crate::utils::sanitize_for_terminal;

const MUTED: Color = Color::Rgb(113, 113, 122);
const BRIGHT: Color = Color::Rgb(250, 250, 250);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const BAR_BG: Color = Color::Rgb(24, 24, 27);
const ERROR: Color = Color::Rgb(239, 68, 68);

/// Everything the renderer needs from the app for one frame
pub struct RenderState<'a> {
    pub tree: &'a ResultTree,
    pub rows: &'a [Row],
    pub selected_idx: usize,
    pub focus: Focus,
    pub input: &'a str,
    pub sort: SortPreference,
    pub query: Option<&'a str>,
    pub search_error: Option<&'a str>,
    pub status_message: Option<&'a StatusMessage>,
    pub today: NaiveDate,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area());

    render_tree(frame, layout.tree_area, state);
    render_input(frame, layout.input_area, state);
    render_status_bar(frame, layout.status_area, state);
}

fn focus_border(focused: bool) -> Style {
    if focused { Style::default().fg(ACCENT) } else { Style::default().fg(MUTED) }
}

fn render_tree(frame: &mut Frame, area: Rect, state: &RenderState) {
    let title = match state.query {
        Some(query) => format!(" Results: {} ", sanitize_for_terminal(query)),
        None => " Results ".to_string(),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(focus_border(state.focus == Focus::Tree))
        .title(title);

    if state.rows.is_empty() {
        let text = if state.query.is_some() { "No cards found" } else { "Press / to search" };
        let paragraph = Paragraph::new(text).style(Style::default().fg(MUTED)).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let rows: Vec<TableRow> = state
        .rows
        .iter()
        .map(|row| match &row.kind {
            RowKind::Category { name, count, expanded, .. } => {
                category_row(row.depth, name, *count, *expanded)
            }
            RowKind::Card(i) => match state.tree.card(*i) {
                Some(card) => card_row(row.depth, card, state.today),
                None => TableRow::default(),
            },
        })
        .collect();

    let widths = [Constraint::Min(20), Constraint::Length(22), Constraint::Percentage(30)];
    let header = TableRow::new(["Task", "Due", "Labels"])
        .style(Style::default().fg(MUTED).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths).header(header).block(block).row_highlight_style(
        Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD),
    );

    let mut table_state = TableState::default().with_selected(Some(state.selected_idx));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn category_row(depth: usize, name: &str, count: usize, expanded: bool) -> TableRow<'static> {
    let marker = if expanded { "▾" } else { "▸" };
    let name = if name.is_empty() { "(none)".to_string() } else { sanitize_for_terminal(name) };
    let line = Line::from(vec![
        Span::raw(indent(depth)),
        Span::styled(format!("{} {}", marker, name), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" ({})", count), Style::default().fg(MUTED)),
    ]);
    TableRow::new(vec![Cell::from(line), Cell::from(""), Cell::from("")])
}

fn card_row(depth: usize, card: &Card, today: NaiveDate) -> TableRow<'static> {
    let status = DueStatus::of(card, today);

    let mut task = vec![
        Span::raw(indent(depth)),
        Span::styled(sanitize_for_terminal(&card.name), status_style(status)),
    ];
    if fully_checked(card) {
        task.push(Span::styled(" ✓", Style::default().fg(Color::Green)));
    }

    let due = match (card.due_date(), status.tag()) {
        (Some(date), Some(tag)) => format!("{} ({})", format_due(date, today), tag),
        (Some(date), None) => format_due(date, today),
        (None, Some(tag)) => tag.to_string(),
        (None, None) => String::new(),
    };

    let mut labels = Vec::new();
    for label in &card.labels {
        let color = label.color.as_deref().map(label_color).unwrap_or(MUTED);
        labels.push(Span::styled("■ ", Style::default().fg(color)));
        if !label.name.is_empty() {
            labels.push(Span::raw(format!("{} ", sanitize_for_terminal(&label.name))));
        }
    }

    TableRow::new(vec![
        Cell::from(Line::from(task)),
        Cell::from(Span::styled(due, status_style(status))),
        Cell::from(Line::from(labels)),
    ])
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

pub(crate) fn status_style(status: DueStatus) -> Style {
    match status {
        DueStatus::Overdue => Style::default().fg(Color::Red),
        DueStatus::Complete => Style::default().fg(Color::Green),
        DueStatus::DueToday => Style::default().fg(Color::Yellow),
        DueStatus::DueSoon => Style::default().fg(Color::Cyan),
        DueStatus::None => Style::default(),
    }
}

/// Trello's named label colours; `_dark`/`_light` variants share the base swatch
pub(crate) fn label_color(name: &str) -> Color {
    let base = name.strip_suffix("_dark").or_else(|| name.strip_suffix("_light")).unwrap_or(name);
    match base {
        "green" => Color::Rgb(97, 189, 79),
        "yellow" => Color::Rgb(242, 214, 0),
        "orange" => Color::Rgb(255, 159, 26),
        "red" => Color::Rgb(235, 90, 70),
        "purple" => Color::Rgb(195, 119, 224),
        "blue" => Color::Rgb(0, 121, 191),
        "sky" => Color::Rgb(0, 194, 224),
        "lime" => Color::Rgb(81, 232, 152),
        "pink" => Color::Rgb(255, 120, 203),
        "black" => Color::Rgb(52, 69, 99),
        _ => MUTED,
    }
}

fn render_input(frame: &mut Frame, area: Rect, state: &RenderState) {
    let focused = state.focus == Focus::Input;
    let mut spans = vec![Span::raw(sanitize_for_terminal(state.input))];
    if focused {
        spans.push(Span::styled("█", Style::default().fg(ACCENT)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(focus_border(focused))
            .title(" Search (Enter: run, ↑/↓: history) "),
    );

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let (text, style) = if let Some(error) = state.search_error {
        (format!(" [ERROR] {} ", sanitize_for_terminal(error)), Style::default().fg(ERROR).bg(BAR_BG))
    } else if let Some(message) = state.status_message {
        let fg = match message.message_type {
            MessageType::Success => ACCENT,
            MessageType::Error => ERROR,
        };
        (format!(" {} ", message.text), Style::default().fg(fg).bg(BAR_BG))
    } else {
        let count = state.tree.cards().len();
        let parts = [
            format!("Sort: {}", state.sort.label()),
            format!("{} card{}", count, if count == 1 { "" } else { "s" }),
            "Ctrl+S: sort".to_string(),
            "Ctrl+R: refresh".to_string(),
            "Ctrl+Y: copy".to_string(),
            "Tab: focus".to_string(),
            "q: quit".to_string(),
        ];
        (format!(" {} ", parts.join(" | ")), Style::default().fg(BRIGHT).bg(BAR_BG))
    };

    frame.render_widget(Paragraph::new(text).style(style), area);
}
