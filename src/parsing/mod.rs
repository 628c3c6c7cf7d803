pub mod markdown_parser;
pub mod outline;

pub use markdown_parser::MarkdownParser;
pub use outline::{HeadingMarker, Outline, document_title};
