use std::collections::HashMap;

use log::debug;

use crate::markdown::{Block, Document, HeadingLevel, Inline, ListItem, ListKind, Text};
use crate::widget::navigation_panel::NavigationItem;

/// A section heading the scroll tracker follows. Position is not stored
/// here; it is sampled from the rendered layout on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingMarker {
    pub id: Option<String>,
    pub title: Text,
}

/// Navigation data extracted from a document once at startup: the section
/// headings in document order, the sidebar rows, and the fragment-id map
/// from heading identity to sidebar row index.
#[derive(Debug, Clone, Default)]
pub struct Outline {
    pub headings: Vec<HeadingMarker>,
    pub items: Vec<NavigationItem>,
    pub registry: HashMap<String, usize>,
}

impl Outline {
    pub fn build(document: &Document) -> Self {
        let headings = Self::collect_heading_markers(document);
        let (items, registry) = Self::build_navigation_items(document);
        debug!(
            "Outline: {} section headings, {} sidebar rows, {} mapped",
            headings.len(),
            items.len(),
            registry.len()
        );
        Outline {
            headings,
            items,
            registry,
        }
    }

    /// Every level-2 heading, in document order. Headings whose title
    /// produced no slug are kept without an identity; they can still become
    /// the current section, they just never match a sidebar row.
    fn collect_heading_markers(document: &Document) -> Vec<HeadingMarker> {
        document
            .blocks
            .iter()
            .filter_map(|node| match &node.block {
                Block::Heading { level, content } if *level == HeadingLevel::H2 => {
                    Some(HeadingMarker {
                        id: node.id.clone(),
                        title: content.clone(),
                    })
                }
                _ => None,
            })
            .collect()
    }

    /// Sidebar rows come from the document's own table of contents: the
    /// first top-level unordered list before the first level-2 heading.
    fn toc_list(document: &Document) -> Option<&[ListItem]> {
        for node in &document.blocks {
            match &node.block {
                Block::Heading { level, .. } if *level == HeadingLevel::H2 => return None,
                Block::List {
                    kind: ListKind::Unordered,
                    items,
                } => return Some(items),
                _ => {}
            }
        }
        None
    }

    fn build_navigation_items(
        document: &Document,
    ) -> (Vec<NavigationItem>, HashMap<String, usize>) {
        let mut items = Vec::new();
        let mut registry = HashMap::new();

        let Some(list_items) = Self::toc_list(document) else {
            return (items, registry);
        };

        for list_item in list_items {
            let text = Self::item_text(list_item);
            let target = match list_item.first_link() {
                Some(Inline::Link { target_anchor, .. }) => target_anchor.clone(),
                _ => None,
            };

            let index = items.len();
            match &target {
                Some(fragment) => {
                    // Duplicate fragments are accepted; the last row wins.
                    registry.insert(fragment.clone(), index);
                }
                None => {
                    debug!("Sidebar row {index} has no fragment link, left unmapped");
                }
            }
            items.push(NavigationItem::new(text, target));
        }

        (items, registry)
    }

    fn item_text(item: &ListItem) -> String {
        item.content
            .iter()
            .filter_map(|node| match &node.block {
                Block::Paragraph { content } | Block::Heading { content, .. } => {
                    Some(content.plain_text())
                }
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn item_index_for(&self, id: &str) -> Option<usize> {
        self.registry.get(id).copied()
    }

    pub fn has_headings(&self) -> bool {
        !self.headings.is_empty()
    }
}

/// Title of the document: the first level-1 heading's text.
pub fn document_title(document: &Document) -> Option<String> {
    document.blocks.iter().find_map(|node| match &node.block {
        Block::Heading { level, content } if *level == HeadingLevel::H1 => {
            let title = content.plain_text();
            (!title.is_empty()).then_some(title)
        }
        _ => None,
    })
}
