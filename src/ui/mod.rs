//! Terminal rendering.
//!
//! - [`status`]: the main status view (overview, memory, performance, modules)
//! - [`debug`]: the debug overlay (connection details, call log, raw payload)
//! - [`common`]: header, error banner, status bar, and help overlay
//! - [`theme`]: colors and border styles

pub mod common;
pub mod debug;
pub mod status;
pub mod theme;

pub use theme::Theme;
