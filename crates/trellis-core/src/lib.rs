//! Core value types for Trellis.
//!
//! This crate holds the pieces of the widget hierarchy that carry no tree
//! state of their own:
//!
//! - **Geometry**: [`Vector2i`], [`Vector2f`], [`Rect`], [`Alignment`], [`Orientation`]
//! - **Color**: [`Color`]
//! - **Errors**: [`TreeError`] and [`LayoutError`] for structural mistakes
//! - **Logging**: tracing targets, span names and [`logging::PerfSpan`]
//!
//! The widget tree, layouts and the screen live in the `trellis` crate.

pub mod color;
pub mod error;
pub mod geometry;
pub mod logging;

pub use color::Color;
pub use error::{LayoutError, LayoutResult, TreeError, TreeResult};
pub use geometry::{Alignment, Orientation, Rect, Vector2f, Vector2i};
pub use logging::{PerfSpan, TreeFormatOptions, TreeStyle};
