pub mod debounce;
pub mod geometry;
pub mod inputs;
pub mod layout;
pub mod main_app;
pub mod markdown;
pub mod panic_handler;
pub mod parsing;
pub mod preferences;
pub mod theme;
pub mod tracker;
pub mod widget;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use inputs::event_source;
pub use main_app::App;
