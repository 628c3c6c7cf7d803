use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};

use crate::theme::Base16Palette;

/// One sidebar row. `target` names the section the row points at; rows
/// without one are rendered but never highlighted and ignore clicks.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationItem {
    pub text: String,
    pub target: Option<String>,
    pub active: bool,
}

impl NavigationItem {
    pub fn new(text: String, target: Option<String>) -> Self {
        Self {
            text,
            target,
            active: false,
        }
    }
}

/// The contents sidebar. Rows are fixed at startup; the only mutable
/// state is which row is marked active, and the list scroll offset that
/// keeps it visible.
pub struct NavigationPanel {
    items: Vec<NavigationItem>,
    list_state: ListState,
    last_area: Option<Rect>,
}

impl NavigationPanel {
    pub fn new(items: Vec<NavigationItem>) -> Self {
        Self {
            items,
            list_state: ListState::default(),
            last_area: None,
        }
    }

    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&NavigationItem> {
        self.items.get(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.items.iter().position(|item| item.active)
    }

    /// Mark `index` active and clear every other row, so at most one row
    /// is active at any instant. `None` clears them all.
    pub fn set_active(&mut self, index: Option<usize>) {
        for item in &mut self.items {
            item.active = false;
        }
        if let Some(index) = index {
            if let Some(item) = self.items.get_mut(index) {
                item.active = true;
                self.ensure_item_visible(index);
            }
        }
    }

    /// Keep the row at `target_index` inside the list viewport.
    fn ensure_item_visible(&mut self, target_index: usize) {
        let viewport_height = self
            .last_area
            .map_or(0, |area| area.height.saturating_sub(2) as usize);
        if viewport_height == 0 {
            return;
        }
        let current_offset = self.list_state.offset();
        if target_index < current_offset {
            *self.list_state.offset_mut() = target_index;
        } else if target_index >= current_offset + viewport_height {
            *self.list_state.offset_mut() = target_index + 1 - viewport_height;
        }
    }

    /// Resolve a click position to the row under it, if any.
    pub fn handle_mouse_click(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.last_area?;
        if column <= area.x || column + 1 >= area.x + area.width {
            return None;
        }
        if row <= area.y || row + 1 >= area.y + area.height {
            return None;
        }
        let relative = (row - area.y - 1) as usize; // top border
        let index = relative + self.list_state.offset();
        (index < self.items.len()).then_some(index)
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, is_focused: bool, palette: &Base16Palette) {
        self.last_area = Some(area);
        let (text_color, border_color, bg_color) = palette.get_panel_colors(is_focused);

        let rows: Vec<ListItem> = self
            .items
            .iter()
            .map(|item| {
                let style = if item.active {
                    Style::default()
                        .fg(palette.get_active_item_color())
                        .add_modifier(Modifier::BOLD)
                } else if item.target.is_some() {
                    Style::default().fg(text_color)
                } else {
                    Style::default().fg(palette.base_03)
                };
                ListItem::new(Line::from(Span::styled(item.text.clone(), style)))
            })
            .collect();

        let list = List::new(rows).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Contents")
                .border_style(Style::default().fg(border_color))
                .style(Style::default().bg(bg_color)),
        );
        f.render_stateful_widget(list, area, &mut self.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::OCEANIC_NEXT;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn panel_with_rows(count: usize) -> NavigationPanel {
        let items = (0..count)
            .map(|i| NavigationItem::new(format!("Row {i}"), Some(format!("row-{i}"))))
            .collect();
        NavigationPanel::new(items)
    }

    fn render_panel(panel: &mut NavigationPanel, area: Rect) {
        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| panel.render(f, area, false, &OCEANIC_NEXT))
            .unwrap();
    }

    #[test]
    fn test_at_most_one_row_active() {
        let mut panel = panel_with_rows(4);
        panel.set_active(Some(1));
        panel.set_active(Some(3));

        let active: Vec<usize> = (0..4).filter(|&i| panel.item(i).unwrap().active).collect();
        assert_eq!(active, vec![3]);
    }

    #[test]
    fn test_clearing_active_row() {
        let mut panel = panel_with_rows(2);
        panel.set_active(Some(0));
        panel.set_active(None);
        assert_eq!(panel.active_index(), None);
    }

    #[test]
    fn test_out_of_range_active_clears_all() {
        let mut panel = panel_with_rows(2);
        panel.set_active(Some(0));
        panel.set_active(Some(9));
        assert_eq!(panel.active_index(), None);
    }

    #[test]
    fn test_set_active_is_idempotent() {
        let mut panel = panel_with_rows(3);
        panel.set_active(Some(2));
        panel.set_active(Some(2));
        assert_eq!(panel.active_index(), Some(2));
    }

    #[test]
    fn test_click_maps_rows_inside_borders() {
        let mut panel = panel_with_rows(3);
        render_panel(&mut panel, Rect::new(0, 3, 30, 10));

        assert_eq!(panel.handle_mouse_click(5, 4), Some(0));
        assert_eq!(panel.handle_mouse_click(5, 6), Some(2));
        assert_eq!(panel.handle_mouse_click(5, 3), None, "top border");
        assert_eq!(panel.handle_mouse_click(0, 4), None, "left border");
        assert_eq!(panel.handle_mouse_click(35, 4), None, "outside panel");
        assert_eq!(panel.handle_mouse_click(5, 8), None, "below last row");
    }

    #[test]
    fn test_click_before_first_render_misses() {
        let panel = panel_with_rows(3);
        assert_eq!(panel.handle_mouse_click(5, 5), None);
    }

    #[test]
    fn test_activating_offscreen_row_scrolls_it_into_view() {
        let mut panel = panel_with_rows(20);
        let area = Rect::new(0, 0, 30, 6);
        render_panel(&mut panel, area);

        panel.set_active(Some(15));
        render_panel(&mut panel, area);

        // Viewport shows 4 rows; offset must have moved so row 15 is inside.
        assert_eq!(panel.handle_mouse_click(5, 4), Some(15));
    }
}
