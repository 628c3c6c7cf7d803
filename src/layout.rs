use std::collections::HashMap;

use log::debug;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::markdown::{
    Block, Document, HeadingLevel, Inline, LinkType, ListItem, ListKind, Node,
    Style as InlineStyle, Text, TextOrInline,
};
use crate::theme::Base16Palette;

/// Knobs for laying a document out into terminal lines.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub width: u16,
    /// Rows of clearance kept above an anchor target when jumping to it.
    pub scroll_margin_top: u16,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 80,
            scroll_margin_top: 1,
        }
    }
}

/// Vertical span of one section heading in the rendered line list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionSpan {
    pub first_line: usize,
    pub line_count: usize,
}

/// A document flattened into styled terminal lines for one render width.
/// Records the first line of every anchored block and the span of every
/// section heading, in document order.
pub struct RenderedDocument {
    lines: Vec<Line<'static>>,
    anchors: HashMap<String, usize>,
    sections: Vec<SectionSpan>,
    scroll_margin_top: u16,
}

impl RenderedDocument {
    pub fn render(document: &Document, options: &RenderOptions, palette: &Base16Palette) -> Self {
        let mut renderer = Renderer {
            palette,
            width: options.width.max(10) as usize,
            lines: Vec::new(),
            anchors: HashMap::new(),
            sections: Vec::new(),
        };
        for node in &document.blocks {
            renderer.render_node(node);
        }
        while renderer.lines.last().is_some_and(|line| line.spans.is_empty()) {
            renderer.lines.pop();
        }
        debug!(
            "Laid out {} lines at width {} ({} sections, {} anchors)",
            renderer.lines.len(),
            renderer.width,
            renderer.sections.len(),
            renderer.anchors.len()
        );
        RenderedDocument {
            lines: renderer.lines,
            anchors: renderer.anchors,
            sections: renderer.sections,
            scroll_margin_top: options.scroll_margin_top,
        }
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn anchor_line(&self, id: &str) -> Option<usize> {
        self.anchors.get(id).copied()
    }

    pub fn sections(&self) -> &[SectionSpan] {
        &self.sections
    }

    /// Scroll margin applied to anchor targets. None when the document has
    /// no anchored element to resolve it from.
    pub fn anchor_scroll_margin(&self) -> Option<u16> {
        (!self.anchors.is_empty()).then_some(self.scroll_margin_top)
    }
}

struct Renderer<'a> {
    palette: &'a Base16Palette,
    width: usize,
    lines: Vec<Line<'static>>,
    anchors: HashMap<String, usize>,
    sections: Vec<SectionSpan>,
}

impl Renderer<'_> {
    fn render_node(&mut self, node: &Node) {
        if let Some(id) = &node.id {
            // Duplicate ids resolve to the earliest occurrence.
            self.anchors.entry(id.clone()).or_insert(self.lines.len());
        }
        match &node.block {
            Block::Heading { level, content } => self.render_heading(*level, content),
            Block::Paragraph { content } => self.render_paragraph(content),
            Block::CodeBlock { language, content } => {
                self.render_code_block(language.as_deref(), content);
            }
            Block::Quote { content } => self.render_quote(content),
            Block::List { kind, items } => self.render_list(kind, items),
            Block::ThematicBreak => self.render_thematic_break(),
        }
        self.lines.push(Line::default());
    }

    fn render_heading(&mut self, level: HeadingLevel, content: &Text) {
        let first_line = self.lines.len();
        let style = self.heading_style(level);
        for segment in self.styled_segments(content, Some(style)) {
            for line_runs in wrap_runs(&segment, self.width) {
                self.push_line(line_runs);
            }
        }
        if self.lines.len() == first_line {
            // An empty title still occupies a row so the section has a
            // position on screen.
            self.lines.push(Line::default());
        }
        if level == HeadingLevel::H2 {
            self.sections.push(SectionSpan {
                first_line,
                line_count: self.lines.len() - first_line,
            });
        }
    }

    fn render_paragraph(&mut self, content: &Text) {
        for segment in self.styled_segments(content, None) {
            let wrapped = wrap_runs(&segment, self.width);
            if wrapped.is_empty() {
                self.lines.push(Line::default());
                continue;
            }
            for line_runs in wrapped {
                self.push_line(line_runs);
            }
        }
    }

    fn render_code_block(&mut self, language: Option<&str>, content: &str) {
        let label_style = Style::default().fg(self.palette.base_03);
        if let Some(language) = language {
            self.lines
                .push(Line::from(Span::styled(format!("    [{language}]"), label_style)));
        }
        let style = Style::default().fg(self.palette.base_0b);
        for line in content.lines() {
            self.lines
                .push(Line::from(Span::styled(format!("    {line}"), style)));
        }
    }

    fn render_quote(&mut self, content: &[Node]) {
        let bar_style = Style::default().fg(self.palette.base_03);
        let text_style = Style::default().fg(self.palette.base_04);
        let inner_width = self.width.saturating_sub(2).max(8);
        let mut first = true;
        for node in content {
            let Block::Paragraph { content } = &node.block else {
                continue;
            };
            if !first {
                self.lines.push(Line::from(Span::styled("│", bar_style)));
            }
            first = false;
            for segment in self.styled_segments(content, Some(text_style)) {
                for line_runs in wrap_runs(&segment, inner_width) {
                    let mut spans = vec![Span::styled("│ ", bar_style)];
                    spans.extend(line_runs.into_iter().map(|(text, style)| Span::styled(text, style)));
                    self.lines.push(Line::from(spans));
                }
            }
        }
    }

    fn render_list(&mut self, kind: &ListKind, items: &[ListItem]) {
        let bullet_style = Style::default().fg(self.palette.base_09);
        for (index, item) in items.iter().enumerate() {
            let bullet = match kind {
                ListKind::Unordered => "• ".to_string(),
                ListKind::Ordered { start } => format!("{}. ", start + index as u32),
            };
            let indent = " ".repeat(bullet.chars().count());
            let inner_width = self.width.saturating_sub(indent.len()).max(8);
            let mut item_start = true;
            for node in &item.content {
                let Block::Paragraph { content } = &node.block else {
                    continue;
                };
                for segment in self.styled_segments(content, None) {
                    for line_runs in wrap_runs(&segment, inner_width) {
                        let prefix = if item_start {
                            bullet.clone()
                        } else {
                            indent.clone()
                        };
                        item_start = false;
                        let mut spans = vec![Span::styled(prefix, bullet_style)];
                        spans.extend(
                            line_runs
                                .into_iter()
                                .map(|(text, style)| Span::styled(text, style)),
                        );
                        self.lines.push(Line::from(spans));
                    }
                }
            }
        }
    }

    fn render_thematic_break(&mut self) {
        let style = Style::default().fg(self.palette.base_03);
        self.lines
            .push(Line::from(Span::styled("─".repeat(self.width), style)));
    }

    fn push_line(&mut self, runs: Vec<(String, Style)>) {
        let spans: Vec<Span<'static>> = runs
            .into_iter()
            .map(|(text, style)| Span::styled(text, style))
            .collect();
        self.lines.push(Line::from(spans));
    }

    /// Flatten inline content into styled runs, split into vertical
    /// segments at hard breaks.
    fn styled_segments(
        &self,
        text: &Text,
        override_style: Option<Style>,
    ) -> Vec<Vec<(String, Style)>> {
        let mut segments = Vec::new();
        let mut current: Vec<(String, Style)> = Vec::new();
        for item in text.iter() {
            match item {
                TextOrInline::Text(node) => {
                    let style =
                        override_style.unwrap_or_else(|| self.inline_style(node.style.as_ref()));
                    current.push((node.content.clone(), style));
                }
                TextOrInline::Inline(Inline::Link {
                    text, link_type, ..
                }) => {
                    let style = override_style.unwrap_or_else(|| self.link_style(*link_type));
                    current.push((text.plain_text(), style));
                }
                TextOrInline::Inline(Inline::LineBreak) => {
                    segments.push(std::mem::take(&mut current));
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }

    fn heading_style(&self, level: HeadingLevel) -> Style {
        let color = match level {
            HeadingLevel::H1 => self.palette.base_0d,
            HeadingLevel::H2 => self.palette.base_0a,
            _ => self.palette.base_0c,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }

    fn inline_style(&self, style: Option<&InlineStyle>) -> Style {
        let base = Style::default().fg(self.palette.base_05);
        match style {
            None => base,
            Some(InlineStyle::Code) => Style::default().fg(self.palette.base_0b),
            Some(InlineStyle::Strong) => Style::default()
                .fg(self.palette.base_06)
                .add_modifier(Modifier::BOLD),
            Some(InlineStyle::Emphasis) => base.add_modifier(Modifier::ITALIC),
        }
    }

    fn link_style(&self, link_type: LinkType) -> Style {
        let color = match link_type {
            LinkType::Anchor => self.palette.base_0c,
            LinkType::External => self.palette.base_0d,
        };
        Style::default().fg(color).add_modifier(Modifier::UNDERLINED)
    }
}

/// Wrap styled runs to `width` columns, slicing runs at the break points
/// textwrap picks for the flattened text.
fn wrap_runs(runs: &[(String, Style)], width: usize) -> Vec<Vec<(String, Style)>> {
    let plain: String = runs.iter().map(|(text, _)| text.as_str()).collect();
    if plain.trim().is_empty() {
        return Vec::new();
    }
    let mut wrapped = Vec::new();
    let mut cursor = 0;
    for piece in textwrap::wrap(&plain, width) {
        let piece = piece.as_ref();
        if piece.is_empty() {
            continue;
        }
        // Break points only ever drop whitespace, so the next piece is
        // found at or just after the cursor.
        let start = match plain[cursor..].find(piece) {
            Some(pos) => cursor + pos,
            None => cursor,
        };
        let end = start + piece.len();
        wrapped.push(slice_runs(runs, start, end));
        cursor = end;
    }
    wrapped
}

fn slice_runs(runs: &[(String, Style)], start: usize, end: usize) -> Vec<(String, Style)> {
    let mut out = Vec::new();
    let mut offset = 0;
    for (text, style) in runs {
        let run_start = offset;
        let run_end = offset + text.len();
        offset = run_end;
        if run_end <= start {
            continue;
        }
        if run_start >= end {
            break;
        }
        let from = start.max(run_start) - run_start;
        let to = end.min(run_end) - run_start;
        let slice = &text[from..to];
        if !slice.is_empty() {
            out.push((slice.to_string(), *style));
        }
    }
    out
}
