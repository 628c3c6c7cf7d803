use ratatui::layout::Rect;

use crate::layout::RenderedDocument;

/// On-screen vertical extent of one tracked element. Rows are measured from
/// the terminal top; an element scrolled above it has a negative top.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub top: i32,
    pub bottom: i32,
}

/// Read-only view of the current vertical positions of the tracked section
/// headings. Answers come from the latest layout; callers sample fresh on
/// every use instead of caching.
pub trait Geometry {
    /// Screen rows of the section heading at `index`, in document order.
    fn section_rect(&self, index: usize) -> Option<ElementRect>;

    fn section_count(&self) -> usize;

    /// Scroll margin of anchor targets, resolved from the first anchored
    /// element. None when nothing in the document carries an identity.
    fn scroll_margin_top(&self) -> Option<u16>;
}

/// Production sampler: projects rendered line indices through the reader's
/// scroll offset into rows of the pane the document is drawn in.
pub struct ScreenGeometry<'a> {
    rendered: &'a RenderedDocument,
    scroll_offset: usize,
    content_area: Rect,
}

impl<'a> ScreenGeometry<'a> {
    pub fn new(rendered: &'a RenderedDocument, scroll_offset: usize, content_area: Rect) -> Self {
        Self {
            rendered,
            scroll_offset,
            content_area,
        }
    }
}

impl Geometry for ScreenGeometry<'_> {
    fn section_rect(&self, index: usize) -> Option<ElementRect> {
        let span = self.rendered.sections().get(index)?;
        let top =
            self.content_area.y as i32 + span.first_line as i32 - self.scroll_offset as i32;
        Some(ElementRect {
            top,
            bottom: top + span.line_count as i32,
        })
    }

    fn section_count(&self) -> usize {
        self.rendered.sections().len()
    }

    fn scroll_margin_top(&self) -> Option<u16> {
        self.rendered.anchor_scroll_margin()
    }
}

/// Deterministic sampler for tests and simulations: positions are supplied
/// directly instead of being derived from a layout.
pub struct SimulatedGeometry {
    pub rects: Vec<ElementRect>,
    pub scroll_margin_top: Option<u16>,
}

impl SimulatedGeometry {
    /// One single-row element per entry of `tops`.
    pub fn new(tops: &[i32], scroll_margin_top: u16) -> Self {
        Self {
            rects: tops
                .iter()
                .map(|&top| ElementRect {
                    top,
                    bottom: top + 1,
                })
                .collect(),
            scroll_margin_top: Some(scroll_margin_top),
        }
    }
}

impl Geometry for SimulatedGeometry {
    fn section_rect(&self, index: usize) -> Option<ElementRect> {
        self.rects.get(index).copied()
    }

    fn section_count(&self) -> usize {
        self.rects.len()
    }

    fn scroll_margin_top(&self) -> Option<u16> {
        self.scroll_margin_top
    }
}
