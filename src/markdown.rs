#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub blocks: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub block: Block,
    pub id: Option<String>, // anchor id for fragment resolution
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: HeadingLevel,
        content: Text,
    },
    Paragraph {
        content: Text,
    },
    CodeBlock {
        language: Option<String>,
        content: String,
    },
    Quote {
        content: Vec<Node>,
    },
    List {
        kind: ListKind,
        items: Vec<ListItem>,
    },
    ThematicBreak,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Style {
    Code,
    Emphasis,
    Strong,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextNode {
    pub content: String,
    pub style: Option<Style>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text(Vec<TextOrInline>);

#[derive(Debug, Clone, PartialEq)]
pub enum TextOrInline {
    Text(TextNode),
    Inline(Inline),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LinkType {
    External, // https://example.com
    Anchor,   // #fragment within this document
}

#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Link {
        text: Text,
        url: String,
        link_type: LinkType,
        target_anchor: Option<String>,
    },
    LineBreak,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeadingLevel {
    H1 = 1,
    H2 = 2,
    H3 = 3,
    H4 = 4,
    H5 = 5,
    H6 = 6,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListKind {
    Ordered { start: u32 },
    Unordered,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub content: Vec<Node>,
}

impl HeadingLevel {
    pub fn from_u8(level: u8) -> Option<Self> {
        match level {
            1 => Some(HeadingLevel::H1),
            2 => Some(HeadingLevel::H2),
            3 => Some(HeadingLevel::H3),
            4 => Some(HeadingLevel::H4),
            5 => Some(HeadingLevel::H5),
            6 => Some(HeadingLevel::H6),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Node {
    pub fn new(block: Block) -> Self {
        Self { block, id: None }
    }

    pub fn new_with_id(block: Block, id: Option<String>) -> Self {
        Self { block, id }
    }
}

impl ListItem {
    pub fn new(content: Vec<Node>) -> Self {
        ListItem { content }
    }

    /// First link inside this item's content, scanning blocks in order.
    pub fn first_link(&self) -> Option<&Inline> {
        fn scan(nodes: &[Node]) -> Option<&Inline> {
            for node in nodes {
                match &node.block {
                    Block::Paragraph { content } | Block::Heading { content, .. } => {
                        for item in content.iter() {
                            if let TextOrInline::Inline(inline @ Inline::Link { .. }) = item {
                                return Some(inline);
                            }
                        }
                    }
                    Block::List { items, .. } => {
                        for item in items {
                            if let Some(link) = scan(&item.content) {
                                return Some(link);
                            }
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        scan(&self.content)
    }
}

impl TextNode {
    pub fn new(content: String, style: Option<Style>) -> Self {
        Self { content, style }
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        TextNode::from(value).into()
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        TextNode::from(value).into()
    }
}

impl From<TextNode> for Text {
    fn from(value: TextNode) -> Self {
        Self(vec![TextOrInline::Text(value)])
    }
}

impl From<&str> for TextNode {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl From<String> for TextNode {
    fn from(value: String) -> Self {
        Self {
            content: value,
            ..Default::default()
        }
    }
}

impl Text {
    pub fn push(&mut self, item: TextOrInline) {
        self.0.push(item);
    }

    pub fn push_text(&mut self, node: TextNode) {
        self.0.push(TextOrInline::Text(node));
    }

    pub fn push_inline(&mut self, inline: Inline) {
        self.0.push(TextOrInline::Inline(inline));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<TextOrInline> {
        self.0.iter()
    }

    /// All text content flattened into one string, links contributing their
    /// display text.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for item in &self.0 {
            match item {
                TextOrInline::Text(node) => out.push_str(&node.content),
                TextOrInline::Inline(Inline::Link { text, .. }) => {
                    out.push_str(&text.plain_text());
                }
                TextOrInline::Inline(Inline::LineBreak) => out.push(' '),
            }
        }
        out
    }

    /// Text content of the first child only. A leading link contributes its
    /// flattened display text; trailing children are ignored.
    pub fn leading_content(&self) -> String {
        match self.0.first() {
            Some(TextOrInline::Text(node)) => node.content.clone(),
            Some(TextOrInline::Inline(Inline::Link { text, .. })) => text.plain_text(),
            Some(TextOrInline::Inline(Inline::LineBreak)) | None => String::new(),
        }
    }
}

impl IntoIterator for Text {
    type Item = TextOrInline;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Classify a link destination and extract the fragment identifier, if any.
/// The fragment is everything after the first `#`.
pub fn classify_link_url(url: &str) -> (LinkType, Option<String>) {
    if let Some(stripped) = url.strip_prefix('#') {
        (LinkType::Anchor, Some(stripped.to_string()))
    } else if let Some(hash_pos) = url.find('#') {
        (LinkType::External, Some(url[hash_pos + 1..].to_string()))
    } else {
        (LinkType::External, None)
    }
}
