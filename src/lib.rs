// Export modules for use in tests
pub mod controller;
pub mod dialog;
pub mod dom;
pub mod event_source;
pub mod fetch;
pub mod files;
pub mod highlight;
pub mod navigation;
pub mod panic_handler;
pub mod preview;
pub mod settings;
pub mod tooltip;
pub mod upload;

pub mod test_utils;

// Re-export the page controller surface
pub use controller::{PageController, run_controller};
pub use dialog::{ConfirmPrompt, confirm_action};
pub use event_source::{EventSource, SimulatedEventSource, UiEvent};
pub use highlight::{highlight_article_content, highlight_search_text};
