//! Layout strategies for positioning child widgets.
//!
//! A layout strategy is attached to a container node and is consulted in two
//! ways:
//!
//! 1. **Preferred size**: bottom-up, from the children's target sizes.
//! 2. **Placement**: top-down, assigning every visible child a position and
//!    size inside the container and then laying that child out in turn.
//!
//! A child's *target size* is its fixed size on axes where one is set and its
//! preferred size elsewhere. Invisible children are skipped entirely.
//!
//! # Built-in Layouts
//!
//! - [`BoxLayout`] - A single row or column
//! - [`GroupLayout`] - A column of labelled, indented groups
//! - [`GridLayout`] - Fixed number of cells per row or column
//! - [`AdvancedGridLayout`] - Explicit rows and columns with anchors and stretch
//!
//! # Window Headers
//!
//! When the container is a window with a non-empty title, every strategy
//! reserves the theme's header height at the top.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::layout::{BoxLayout, LayoutStrategy};
//! use trellis_core::{Alignment, Orientation};
//!
//! tree.set_layout(panel, BoxLayout::new(Orientation::Vertical, Alignment::Fill, 10, 6))?;
//! tree.perform_layout(panel, &surface)?;
//! ```

mod advanced_grid;
mod box_layout;
mod grid_layout;
mod group_layout;

pub use advanced_grid::{AdvancedGridLayout, Anchor};
pub use box_layout::BoxLayout;
pub use grid_layout::GridLayout;
pub use group_layout::GroupLayout;

use trellis_core::{LayoutResult, Vector2i};

use super::{WidgetId, WidgetTree};
use crate::surface::DrawSurface;

/// Common contract of all layout strategies.
pub trait Layout {
    /// Size the container `node` would like to have.
    fn preferred_size(
        &self,
        tree: &WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i>;

    /// Position and size every visible child of `node`, then lay each out.
    fn perform_layout(
        &self,
        tree: &mut WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<()>;
}

/// One of the built-in layout strategies.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutStrategy {
    /// Single row or column.
    Box(BoxLayout),
    /// Labelled groups in a column.
    Group(GroupLayout),
    /// Uniform grid.
    Grid(GridLayout),
    /// Anchor grid.
    AdvancedGrid(AdvancedGridLayout),
}

impl LayoutStrategy {
    /// Short name for traces.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Box(_) => "BoxLayout",
            Self::Group(_) => "GroupLayout",
            Self::Grid(_) => "GridLayout",
            Self::AdvancedGrid(_) => "AdvancedGridLayout",
        }
    }

    pub fn as_grid_mut(&mut self) -> Option<&mut GridLayout> {
        match self {
            Self::Grid(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn as_advanced_grid(&self) -> Option<&AdvancedGridLayout> {
        match self {
            Self::AdvancedGrid(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn as_advanced_grid_mut(&mut self) -> Option<&mut AdvancedGridLayout> {
        match self {
            Self::AdvancedGrid(layout) => Some(layout),
            _ => None,
        }
    }
}

impl Layout for LayoutStrategy {
    fn preferred_size(
        &self,
        tree: &WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i> {
        match self {
            Self::Box(l) => l.preferred_size(tree, node, surface),
            Self::Group(l) => l.preferred_size(tree, node, surface),
            Self::Grid(l) => l.preferred_size(tree, node, surface),
            Self::AdvancedGrid(l) => l.preferred_size(tree, node, surface),
        }
    }

    fn perform_layout(
        &self,
        tree: &mut WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<()> {
        let _span = tracing::trace_span!(
            target: "trellis::layout",
            trellis_core::logging::span_names::LAYOUT,
            layout = self.name(),
            ?node,
        )
        .entered();
        match self {
            Self::Box(l) => l.perform_layout(tree, node, surface),
            Self::Group(l) => l.perform_layout(tree, node, surface),
            Self::Grid(l) => l.perform_layout(tree, node, surface),
            Self::AdvancedGrid(l) => l.perform_layout(tree, node, surface),
        }
    }
}

impl From<BoxLayout> for LayoutStrategy {
    fn from(layout: BoxLayout) -> Self {
        Self::Box(layout)
    }
}

impl From<GroupLayout> for LayoutStrategy {
    fn from(layout: GroupLayout) -> Self {
        Self::Group(layout)
    }
}

impl From<GridLayout> for LayoutStrategy {
    fn from(layout: GridLayout) -> Self {
        Self::Grid(layout)
    }
}

impl From<AdvancedGridLayout> for LayoutStrategy {
    fn from(layout: AdvancedGridLayout) -> Self {
        Self::AdvancedGrid(layout)
    }
}

// =========================================================================
// Helpers shared by the strategies
// =========================================================================

/// Visible children of `node` in insertion order.
fn visible_children(tree: &WidgetTree, node: WidgetId) -> Vec<WidgetId> {
    tree.children(node)
        .iter()
        .copied()
        .filter(|&child| tree.node(child).is_some_and(|n| n.is_visible()))
        .collect()
}

/// The container extent: fixed size where set, current size elsewhere.
fn container_size(tree: &WidgetTree, node: WidgetId) -> LayoutResult<Vector2i> {
    let node = tree.get(node)?;
    Ok(node.fixed_size().or_fallback(node.size()))
}

/// Assign geometry to `child` and lay it out.
fn place(
    tree: &mut WidgetTree,
    child: WidgetId,
    position: Vector2i,
    size: Vector2i,
    surface: &dyn DrawSurface,
) -> LayoutResult<()> {
    let node = tree.get_mut(child)?;
    node.position = position;
    node.size = size;
    tree.perform_layout(child, surface)
}
