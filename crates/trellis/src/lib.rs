//! Trellis - a retained-mode widget hierarchy for embedded and kiosk UIs.
//!
//! Trellis keeps a tree of widgets, sizes and places them with a small set of
//! constraint layouts, and routes pointer and keyboard input from a native
//! window to the widget that should handle it. Rendering goes through the
//! [`DrawSurface`](surface::DrawSurface) trait, so any vector backend can sit
//! underneath.
//!
//! # Crates
//!
//! - `trellis-core`: geometry, colors, error types and logging helpers
//! - `trellis`: the widget tree, layouts, the [`Screen`](screen::Screen) and windows
//!
//! # Example
//!
//! ```no_run
//! use trellis::prelude::*;
//!
//! fn main() -> trellis::Result<()> {
//!     let mut screen = Screen::headless(&ScreenConfig::new("Demo", (800, 600)));
//!     let window = screen.add_window(screen.root(), "Hello")?;
//!     screen.tree_mut().set_layout(window, GroupLayout::default())?;
//!     screen.tree_mut().add_label(window, "Welcome")?;
//!     screen.center_window(window)?;
//!     screen.draw_all();
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod prelude;
pub mod screen;
pub mod surface;
pub mod theme;
pub mod widget;
pub mod window;

pub use error::{ConfigError, Error, Result};
pub use trellis_core::{
    Alignment, Color, LayoutError, LayoutResult, Orientation, Rect, TreeError, TreeResult,
    Vector2f, Vector2i,
};
