//! Error types for tree construction and layout.
//!
//! Both error families describe structural mistakes in UI-building code.
//! They are returned to the caller instead of being clamped or silently
//! absorbed, so a broken widget tree fails the first time it is laid out.

use thiserror::Error;

/// Errors raised while editing the widget tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The widget handle is stale or was never issued by this tree.
    #[error("invalid or destroyed widget handle")]
    InvalidWidget,

    /// A child insertion index was past the end of the child list.
    #[error("child index {index} out of range for {count} children")]
    IndexOutOfRange { index: usize, count: usize },

    /// A widget would become its own ancestor.
    #[error("cannot make a widget a child of itself or of its descendant")]
    CircularParentage,

    /// The root widget belongs to its screen and cannot be removed or reparented.
    #[error("the root widget cannot be removed or reparented")]
    RootRemoval,
}

/// Errors raised by layout strategies.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// An anchor spans past the declared grid lines.
    #[error("advanced grid layout: widget is out of bounds on axis {axis}: {anchor} exceeds {lines} lines")]
    AnchorOutOfBounds {
        axis: usize,
        anchor: String,
        lines: usize,
    },

    /// A spanning widget needs extra room but none of its lines can stretch.
    #[error("advanced grid layout: no space to place widget on axis {axis}: {anchor}")]
    NoStretchAvailable { axis: usize, anchor: String },

    /// A visible child of an advanced grid has no anchor.
    #[error("advanced grid layout: widget was not registered with an anchor")]
    MissingAnchor,

    /// A grid layout was configured with zero cells per line.
    #[error("grid layout resolution must be at least 1")]
    ZeroResolution,

    /// A row or column index was outside the declared grid.
    #[error("grid line {index} out of range for {count} lines")]
    LineOutOfRange { index: usize, count: usize },

    /// The layout target handle is stale.
    #[error(transparent)]
    Tree(#[from] TreeError),
}

/// Result type for tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;

/// Result type for layout operations.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
