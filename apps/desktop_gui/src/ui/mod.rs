//! UI layer: app shell, per-view rendering, and form drafts.

pub mod app;
pub mod forms;
pub mod views;

pub use app::DesktopGuiApp;
