pub mod navigation_panel;
pub mod text_reader;
pub mod tocbar;

pub use navigation_panel::{NavigationItem, NavigationPanel};
pub use text_reader::TextReader;
pub use tocbar::{TOCBAR_HEIGHT, TocBar};
