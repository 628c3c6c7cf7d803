use crate::markdown::{
    Block, Document, HeadingLevel, Inline, ListItem, ListKind, Node, Style, Text, TextNode,
    classify_link_url,
};
use log::debug;

/// Line-oriented Markdown parser producing the block AST the reader renders.
///
/// Supported structure: ATX headings (with an optional trailing `{#id}`
/// attribute), paragraphs, unordered and ordered lists, fenced code blocks,
/// block quotes and thematic breaks. Inline markup covers `code`,
/// **strong**, *emphasis* and links.
pub struct MarkdownParser;

impl MarkdownParser {
    pub fn parse(source: &str) -> Document {
        let lines: Vec<&str> = source.lines().collect();
        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let trimmed = lines[i].trim_start();

            if trimmed.is_empty() {
                i += 1;
            } else if let Some((level, rest)) = Self::heading_prefix(trimmed) {
                blocks.push(Self::parse_heading(level, rest));
                i += 1;
            } else if let Some(language) = Self::fence_prefix(trimmed) {
                i = Self::parse_code_block(&lines, i + 1, language, &mut blocks);
            } else if Self::is_thematic_break(trimmed) {
                blocks.push(Node::new(Block::ThematicBreak));
                i += 1;
            } else if trimmed.starts_with('>') {
                i = Self::parse_quote(&lines, i, &mut blocks);
            } else if Self::list_marker(trimmed).is_some() {
                i = Self::parse_list(&lines, i, &mut blocks);
            } else {
                i = Self::parse_paragraph(&lines, i, &mut blocks);
            }
        }

        let headings = blocks
            .iter()
            .filter(|n| matches!(n.block, Block::Heading { .. }))
            .count();
        debug!(
            "Parsed markdown: {} blocks, {} headings",
            blocks.len(),
            headings
        );

        Document { blocks }
    }

    /// `###`-style prefix. Returns the level and the remainder of the line.
    fn heading_prefix(line: &str) -> Option<(HeadingLevel, &str)> {
        let hashes = line.chars().take_while(|&c| c == '#').count();
        if hashes == 0 || hashes > 6 {
            return None;
        }
        let rest = &line[hashes..];
        if !rest.is_empty() && !rest.starts_with(' ') {
            return None;
        }
        HeadingLevel::from_u8(hashes as u8).map(|level| (level, rest.trim()))
    }

    fn parse_heading(level: HeadingLevel, rest: &str) -> Node {
        let (title, explicit_id) = Self::split_heading_id(rest);
        let content = Self::parse_inline(title);
        let id = explicit_id.or_else(|| {
            let slug = slugify(&content.plain_text());
            (!slug.is_empty()).then_some(slug)
        });
        Node::new_with_id(Block::Heading { level, content }, id)
    }

    /// Split a trailing `{#custom-id}` attribute off the heading title.
    fn split_heading_id(rest: &str) -> (&str, Option<String>) {
        if let Some(stripped) = rest.strip_suffix('}') {
            if let Some(brace) = stripped.rfind("{#") {
                let id = &stripped[brace + 2..];
                if !id.is_empty() && !id.contains(char::is_whitespace) {
                    return (rest[..brace].trim_end(), Some(id.to_string()));
                }
            }
        }
        (rest, None)
    }

    fn fence_prefix(line: &str) -> Option<Option<String>> {
        let rest = line.strip_prefix("```")?;
        let language = rest.trim();
        Some((!language.is_empty()).then(|| language.to_string()))
    }

    fn parse_code_block(
        lines: &[&str],
        mut i: usize,
        language: Option<String>,
        blocks: &mut Vec<Node>,
    ) -> usize {
        let mut content_lines = Vec::new();
        while i < lines.len() && Self::fence_prefix(lines[i].trim_start()).is_none() {
            content_lines.push(lines[i]);
            i += 1;
        }
        if i < lines.len() {
            i += 1; // closing fence
        }
        let content = content_lines.join("\n");
        if content.trim().is_empty() {
            debug!("Skipping empty code block");
        } else {
            blocks.push(Node::new(Block::CodeBlock { language, content }));
        }
        i
    }

    fn is_thematic_break(line: &str) -> bool {
        let mut marker = None;
        let mut count = 0;
        for ch in line.chars() {
            match ch {
                ' ' => {}
                '-' | '*' | '_' => {
                    if *marker.get_or_insert(ch) != ch {
                        return false;
                    }
                    count += 1;
                }
                _ => return false,
            }
        }
        count >= 3
    }

    fn parse_quote(lines: &[&str], mut i: usize, blocks: &mut Vec<Node>) -> usize {
        let mut inner = Vec::new();
        while i < lines.len() {
            let trimmed = lines[i].trim_start();
            let Some(rest) = trimmed.strip_prefix('>') else {
                break;
            };
            inner.push(rest.strip_prefix(' ').unwrap_or(rest));
            i += 1;
        }

        // Quoted lines form paragraphs split on blank lines.
        let mut content = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in inner.iter().chain(std::iter::once(&"")) {
            if line.trim().is_empty() {
                if !current.is_empty() {
                    let text = Self::parse_inline(&current.join(" "));
                    if !text.is_empty() {
                        content.push(Node::new(Block::Paragraph { content: text }));
                    }
                    current.clear();
                }
            } else {
                current.push(line.trim());
            }
        }

        if !content.is_empty() {
            blocks.push(Node::new(Block::Quote { content }));
        }
        i
    }

    /// Marker prefix of a list line: the kind plus the content after the
    /// marker.
    fn list_marker(line: &str) -> Option<(ListKind, &str)> {
        for prefix in ["- ", "* ", "+ "] {
            if let Some(rest) = line.strip_prefix(prefix) {
                return Some((ListKind::Unordered, rest));
            }
        }
        let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0 {
            if let Some(rest) = line[digits..].strip_prefix(". ") {
                let start = line[..digits].parse().unwrap_or(1);
                return Some((ListKind::Ordered { start }, rest));
            }
        }
        None
    }

    fn parse_list(lines: &[&str], mut i: usize, blocks: &mut Vec<Node>) -> usize {
        let mut kind = None;
        let mut items: Vec<ListItem> = Vec::new();
        let mut current: Vec<String> = Vec::new();

        let flush = |current: &mut Vec<String>, items: &mut Vec<ListItem>| {
            if !current.is_empty() {
                let text = Self::parse_inline(&current.join(" "));
                if !text.is_empty() {
                    items.push(ListItem::new(vec![Node::new(Block::Paragraph {
                        content: text,
                    })]));
                }
                current.clear();
            }
        };

        while i < lines.len() {
            let line = lines[i];
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                break;
            }
            if Self::is_thematic_break(trimmed) {
                break;
            }
            if let Some((line_kind, rest)) = Self::list_marker(trimmed) {
                flush(&mut current, &mut items);
                // The first marker fixes the list kind; ordered numbering
                // after the first item is cosmetic.
                kind.get_or_insert(line_kind);
                current.push(rest.trim().to_string());
                i += 1;
            } else if line.starts_with("  ") && !current.is_empty() {
                // Indented continuation joins the current item.
                current.push(trimmed.to_string());
                i += 1;
            } else {
                break;
            }
        }
        flush(&mut current, &mut items);

        if let Some(kind) = kind {
            if !items.is_empty() {
                blocks.push(Node::new(Block::List { kind, items }));
            }
        }
        i
    }

    fn parse_paragraph(lines: &[&str], mut i: usize, blocks: &mut Vec<Node>) -> usize {
        let mut text = Text::default();
        let mut pending = String::new();

        while i < lines.len() {
            let line = lines[i];
            let trimmed = line.trim_start();
            if trimmed.is_empty()
                || Self::heading_prefix(trimmed).is_some()
                || Self::fence_prefix(trimmed).is_some()
                || Self::is_thematic_break(trimmed)
                || trimmed.starts_with('>')
                || Self::list_marker(trimmed).is_some()
            {
                break;
            }
            if !pending.is_empty() {
                pending.push(' ');
            }
            pending.push_str(trimmed.trim_end());
            // Two trailing spaces force a hard break.
            if line.ends_with("  ") {
                for item in Self::parse_inline(&pending) {
                    text.push(item);
                }
                text.push_inline(Inline::LineBreak);
                pending.clear();
            }
            i += 1;
        }

        if !pending.is_empty() {
            for item in Self::parse_inline(&pending) {
                text.push(item);
            }
        }
        if !text.is_empty() {
            blocks.push(Node::new(Block::Paragraph { content: text }));
        }
        i
    }

    fn parse_inline(input: &str) -> Text {
        let chars: Vec<char> = input.chars().collect();
        let mut text = Text::default();
        let mut plain = String::new();
        let mut i = 0;

        let flush = |text: &mut Text, plain: &mut String| {
            if !plain.is_empty() {
                text.push_text(TextNode::from(std::mem::take(plain)));
            }
        };

        while i < chars.len() {
            match chars[i] {
                '\\' if i + 1 < chars.len() && chars[i + 1].is_ascii_punctuation() => {
                    plain.push(chars[i + 1]);
                    i += 2;
                }
                '`' => match Self::find_char(&chars, i + 1, '`') {
                    Some(end) => {
                        flush(&mut text, &mut plain);
                        let code: String = chars[i + 1..end].iter().collect();
                        text.push_text(TextNode::new(code, Some(Style::Code)));
                        i = end + 1;
                    }
                    None => {
                        plain.push('`');
                        i += 1;
                    }
                },
                delim @ ('*' | '_') => {
                    let double = chars.get(i + 1) == Some(&delim);
                    let (style, skip) = if double {
                        (Style::Strong, 2)
                    } else {
                        (Style::Emphasis, 1)
                    };
                    match Self::find_delim(&chars, i + skip, delim, skip) {
                        Some(end) => {
                            flush(&mut text, &mut plain);
                            let inner: String = chars[i + skip..end].iter().collect();
                            text.push_text(TextNode::new(inner, Some(style)));
                            i = end + skip;
                        }
                        None => {
                            plain.push(delim);
                            i += 1;
                        }
                    }
                }
                '[' => match Self::parse_link(&chars, i) {
                    Some((link, next)) => {
                        flush(&mut text, &mut plain);
                        text.push_inline(link);
                        i = next;
                    }
                    None => {
                        plain.push('[');
                        i += 1;
                    }
                },
                ch => {
                    plain.push(ch);
                    i += 1;
                }
            }
        }

        flush(&mut text, &mut plain);
        text
    }

    /// `[text](url)` starting at `open`. Returns the link and the index just
    /// past the closing parenthesis.
    fn parse_link(chars: &[char], open: usize) -> Option<(Inline, usize)> {
        let close = Self::find_char(chars, open + 1, ']')?;
        if chars.get(close + 1) != Some(&'(') {
            return None;
        }
        let paren = Self::find_char(chars, close + 2, ')')?;

        let label: String = chars[open + 1..close].iter().collect();
        let url: String = chars[close + 2..paren].iter().collect();
        let (link_type, target_anchor) = classify_link_url(&url);

        Some((
            Inline::Link {
                text: Self::parse_inline(&label),
                url,
                link_type,
                target_anchor,
            },
            paren + 1,
        ))
    }

    fn find_char(chars: &[char], from: usize, needle: char) -> Option<usize> {
        chars[from..]
            .iter()
            .position(|&c| c == needle)
            .map(|pos| from + pos)
    }

    /// Closing delimiter of width `width` at or after `from`, not adjacent to
    /// the opener.
    fn find_delim(chars: &[char], from: usize, delim: char, width: usize) -> Option<usize> {
        let mut i = from;
        while i + width <= chars.len() {
            if chars[i..i + width].iter().all(|&c| c == delim) && i > from {
                return Some(i);
            }
            i += 1;
        }
        None
    }
}

/// Slug for a heading title: lowercased alphanumerics, with separator runs
/// collapsed to single hyphens and remaining punctuation dropped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut pending_sep = false;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.extend(ch.to_lowercase());
        } else if ch == ' ' || ch == '-' || ch == '_' {
            pending_sep = true;
        }
    }
    slug
}
