use log::debug;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Text;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::layout::{RenderOptions, RenderedDocument};
use crate::markdown::Document;
use crate::theme::Base16Palette;

/// The scrollable reading pane. Owns the parsed document and its rendered
/// line layout; scrolling moves an offset into the line list, and the
/// layout is rebuilt whenever the pane width changes.
pub struct TextReader {
    document: Document,
    options: RenderOptions,
    rendered: RenderedDocument,
    scroll_offset: usize,
    scroll_speed: usize,
    last_inner_area: Option<Rect>,
}

impl TextReader {
    pub fn new(
        document: Document,
        options: RenderOptions,
        scroll_speed: usize,
        palette: &Base16Palette,
    ) -> Self {
        let rendered = RenderedDocument::render(&document, &options, palette);
        Self {
            document,
            options,
            rendered,
            scroll_offset: 0,
            scroll_speed,
            last_inner_area: None,
        }
    }

    pub fn rendered(&self) -> &RenderedDocument {
        &self.rendered
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// The text area inside the borders, as of the last render.
    pub fn content_area(&self) -> Option<Rect> {
        self.last_inner_area
    }

    fn viewport_height(&self) -> usize {
        self.last_inner_area.map_or(0, |area| area.height as usize)
    }

    fn max_scroll_offset(&self) -> usize {
        self.rendered
            .line_count()
            .saturating_sub(self.viewport_height())
    }

    fn clamp_offset(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.max_scroll_offset());
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(self.scroll_speed);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = (self.scroll_offset + self.scroll_speed).min(self.max_scroll_offset());
    }

    pub fn scroll_half_screen_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(self.viewport_height() / 2);
    }

    pub fn scroll_half_screen_down(&mut self) {
        self.scroll_offset =
            (self.scroll_offset + self.viewport_height() / 2).min(self.max_scroll_offset());
    }

    pub fn scroll_page_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(self.viewport_height());
    }

    pub fn scroll_page_down(&mut self) {
        self.scroll_offset =
            (self.scroll_offset + self.viewport_height()).min(self.max_scroll_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = self.max_scroll_offset();
    }

    /// Jump so the anchored line sits `scroll_margin_top` rows below the
    /// top of the pane. Returns false when the anchor is unknown.
    pub fn scroll_to_anchor(&mut self, id: &str) -> bool {
        let Some(line) = self.rendered.anchor_line(id) else {
            debug!("No anchor for {id:?}");
            return false;
        };
        let margin = self.rendered.anchor_scroll_margin().unwrap_or(0) as usize;
        self.scroll_offset = line.saturating_sub(margin).min(self.max_scroll_offset());
        true
    }

    fn relayout_if_resized(&mut self, inner: Rect, palette: &Base16Palette) {
        if inner.width == self.options.width || inner.width == 0 {
            return;
        }
        debug!(
            "Reflowing text: width {} -> {}",
            self.options.width, inner.width
        );
        self.options.width = inner.width;
        self.rendered = RenderedDocument::render(&self.document, &self.options, palette);
        self.clamp_offset();
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        is_focused: bool,
        palette: &Base16Palette,
        title: &str,
    ) {
        let inner = Rect::new(
            area.x + 1,
            area.y + 1,
            area.width.saturating_sub(2),
            area.height.saturating_sub(2),
        );
        self.last_inner_area = Some(inner);
        self.relayout_if_resized(inner, palette);
        self.clamp_offset();

        let (_, border_color, bg_color) = palette.get_panel_colors(is_focused);

        let end = (self.scroll_offset + inner.height as usize).min(self.rendered.line_count());
        let visible = self.rendered.lines()[self.scroll_offset..end].to_vec();

        let percent = if self.max_scroll_offset() == 0 {
            100
        } else {
            self.scroll_offset * 100 / self.max_scroll_offset()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{title} ({percent}%)"))
            .border_style(Style::default().fg(border_color))
            .style(Style::default().bg(bg_color));
        f.render_widget(Paragraph::new(Text::from(visible)).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::MarkdownParser;
    use crate::theme::OCEANIC_NEXT;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn long_document() -> Document {
        let mut source = String::from("# Manual\n\n");
        for i in 0..20 {
            source.push_str(&format!("## Part {i}\n\nBody for part {i}.\n\n"));
        }
        MarkdownParser::parse(&source)
    }

    fn reader_at(area: Rect) -> TextReader {
        let options = RenderOptions {
            width: area.width - 2,
            scroll_margin_top: 1,
        };
        let mut reader = TextReader::new(long_document(), options, 2, &OCEANIC_NEXT);
        render_reader(&mut reader, area);
        reader
    }

    fn render_reader(reader: &mut TextReader, area: Rect) {
        let backend = TestBackend::new(80, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| reader.render(f, area, true, &OCEANIC_NEXT, "Manual"))
            .unwrap();
    }

    #[test]
    fn test_scroll_down_respects_speed_and_bottom() {
        let mut reader = reader_at(Rect::new(0, 0, 60, 12));
        reader.scroll_down();
        assert_eq!(reader.scroll_offset(), 2);

        reader.scroll_to_bottom();
        let bottom = reader.scroll_offset();
        reader.scroll_down();
        assert_eq!(reader.scroll_offset(), bottom);
    }

    #[test]
    fn test_scroll_up_stops_at_top() {
        let mut reader = reader_at(Rect::new(0, 0, 60, 12));
        reader.scroll_up();
        assert_eq!(reader.scroll_offset(), 0);
    }

    #[test]
    fn test_half_screen_uses_viewport_height() {
        let mut reader = reader_at(Rect::new(0, 0, 60, 12));
        reader.scroll_half_screen_down();
        assert_eq!(reader.scroll_offset(), 5);
        reader.scroll_half_screen_up();
        assert_eq!(reader.scroll_offset(), 0);
    }

    #[test]
    fn test_to_bottom_fills_last_screen() {
        let mut reader = reader_at(Rect::new(0, 0, 60, 12));
        reader.scroll_to_bottom();
        assert_eq!(
            reader.scroll_offset(),
            reader.rendered().line_count() - 10,
            "last page should exactly fill the pane"
        );
        reader.scroll_to_top();
        assert_eq!(reader.scroll_offset(), 0);
    }

    #[test]
    fn test_anchor_jump_leaves_margin_above() {
        let mut reader = reader_at(Rect::new(0, 0, 60, 12));
        let line = reader.rendered().anchor_line("part-5").unwrap();

        assert!(reader.scroll_to_anchor("part-5"));
        assert_eq!(reader.scroll_offset(), line - 1);
        assert!(!reader.scroll_to_anchor("missing"));
    }

    #[test]
    fn test_render_reflows_on_width_change() {
        let mut reader = reader_at(Rect::new(0, 0, 60, 12));
        let narrow_before = reader.rendered().line_count();

        render_reader(&mut reader, Rect::new(0, 0, 30, 12));
        assert!(reader.rendered().line_count() >= narrow_before);
        assert_eq!(reader.content_area(), Some(Rect::new(1, 1, 28, 10)));
    }

    #[test]
    fn test_reflow_clamps_stale_offset() {
        let mut reader = reader_at(Rect::new(0, 0, 30, 12));
        reader.scroll_to_bottom();

        render_reader(&mut reader, Rect::new(0, 0, 78, 28));
        let max = reader.rendered().line_count() - 26;
        assert!(reader.scroll_offset() <= max);
    }
}
