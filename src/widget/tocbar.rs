use log::debug;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::theme::Base16Palette;

/// Rows the bar occupies at the top of the screen, borders included.
pub const TOCBAR_HEIGHT: u16 = 3;

/// The bar across the top showing the current section's title. Content
/// scrolls underneath it; its bottom edge is the reference line the
/// tracker measures heading positions against.
pub struct TocBar {
    label: String,
    last_area: Option<Rect>,
}

impl TocBar {
    pub fn new(label: String) -> Self {
        Self {
            label,
            last_area: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: String) {
        if self.label != label {
            debug!("Bar label: {:?} -> {:?}", self.label, label);
            self.label = label;
        }
    }

    /// Screen row just below the bar, from the last render.
    pub fn bottom(&self) -> Option<u16> {
        self.last_area.map(|area| area.bottom())
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect, palette: &Base16Palette) {
        self.last_area = Some(area);
        let text = Line::from(Span::styled(
            self.label.clone(),
            Style::default()
                .fg(palette.base_06)
                .add_modifier(Modifier::BOLD),
        ));
        let bar = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.base_04))
                .style(Style::default().bg(palette.base_00)),
        );
        f.render_widget(bar, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::OCEANIC_NEXT;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_bottom_is_unknown_before_first_render() {
        let bar = TocBar::new("Guide".to_string());
        assert_eq!(bar.bottom(), None);
    }

    #[test]
    fn test_render_records_bottom_edge_and_shows_label() {
        let mut bar = TocBar::new("Guide".to_string());
        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| bar.render(f, Rect::new(0, 0, 40, TOCBAR_HEIGHT), &OCEANIC_NEXT))
            .unwrap();

        assert_eq!(bar.bottom(), Some(3));

        let buffer = terminal.backend().buffer();
        let row: String = (0..40)
            .map(|x| buffer.cell((x, 1)).unwrap().symbol().to_string())
            .collect();
        assert!(row.contains("Guide"), "bar row was {row:?}");
    }

    #[test]
    fn test_set_label_replaces_text() {
        let mut bar = TocBar::new("Guide".to_string());
        bar.set_label("Setup".to_string());
        assert_eq!(bar.label(), "Setup");
        bar.set_label("Setup".to_string());
        assert_eq!(bar.label(), "Setup");
    }
}
