use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Stacked layout configuration
pub struct AppLayout {
    pub tree_area: Rect,
    pub input_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// - Results tree: everything that is left (at least 3 rows)
    /// - Search input: bordered, 3 rows
    /// - Status bar: bottom row
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3), Constraint::Length(1)])
            .split(area);

        Self { tree_area: chunks[0], input_area: chunks[1], status_area: chunks[2] }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_splits_correctly() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30));

        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.status_area.y, 29);
        assert_eq!(layout.input_area.height, 3);
        assert_eq!(layout.input_area.y, 26);
        assert_eq!(layout.tree_area.height, 26);
        assert_eq!(layout.tree_area.width, 100);
    }

    #[test]
    fn test_layout_minimum_height() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 7));

        assert_eq!(layout.status_area.height, 1);
        assert_eq!(layout.input_area.height, 3);
        assert_eq!(layout.tree_area.height, 3);
    }
}
