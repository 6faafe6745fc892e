//! The widget hierarchy.
//!
//! This module provides the retained widget tree and everything that hangs
//! off it:
//!
//! - [`WidgetTree`]: the arena owning every [`WidgetNode`], addressed by [`WidgetId`]
//! - [`WidgetKind`]: the built-in variants (plain, label, window, popup)
//! - [`Widget`]: the trait for attaching custom behavior to a node
//! - [`layout`]: box, group, grid and advanced grid strategies
//! - [`Button`]: a clickable leaf used by dialogs and the keyboard
//! - [`WidgetTreeDebug`]: a printable dump of a subtree
//!
//! # Coordinates
//!
//! A node's position is relative to its parent. Hit-testing and event
//! routing pass points in the receiving node's *parent* coordinates;
//! drawing uses absolute screen coordinates.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::{WidgetNode, WidgetTree};
//! use trellis::widget::layout::BoxLayout;
//!
//! let mut tree = WidgetTree::default();
//! let panel = tree.insert(tree.root(), WidgetNode::new().with_layout(BoxLayout::vertical()))?;
//! tree.add_label(panel, "Name")?;
//! tree.perform_layout(panel, &surface)?;
//! ```

mod button;
mod debug;
pub mod events;
pub mod layout;
mod node;
mod paint;
mod sizing;
mod traits;
mod tree;

#[cfg(test)]
mod tests;

slotmap::new_key_type! {
    /// Handle to a widget in a [`WidgetTree`].
    pub struct WidgetId;
}

pub use button::{Button, ButtonCallback};
pub use debug::WidgetTreeDebug;
pub use events::{
    InputEvent, KeyAction, KeyEvent, KeyboardModifiers, MouseButton, MouseButtons,
    PointerButtonEvent, PointerMoveEvent, ScrollEvent,
};
pub use layout::{
    AdvancedGridLayout, Anchor, BoxLayout, GridLayout, GroupLayout, Layout, LayoutStrategy,
};
pub use node::{LabelData, PopupData, WidgetKind, WidgetNode, WindowData};
pub use traits::Widget;
pub use tree::WidgetTree;

static_assertions::assert_impl_all!(WidgetId: Copy, Send, Sync);
