//! Box layout for arranging widgets in a row or column.
//!
//! `BoxLayout` stacks visible children along its orientation, separated by
//! `spacing`, with `margin` around the content. On the cross axis each child
//! is placed according to the layout's [`Alignment`].
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::layout::BoxLayout;
//! use trellis_core::{Alignment, Orientation};
//!
//! // A toolbar: children left to right, vertically centered.
//! let toolbar = BoxLayout::new(Orientation::Horizontal, Alignment::Middle, 0, 6);
//! tree.set_layout(panel, toolbar)?;
//! ```

use trellis_core::{Alignment, LayoutResult, Orientation, Vector2i};

use super::{Layout, container_size, place, visible_children};
use crate::surface::DrawSurface;
use crate::widget::{WidgetId, WidgetTree};

/// A single row or column of widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxLayout {
    orientation: Orientation,
    alignment: Alignment,
    margin: i32,
    spacing: i32,
}

impl BoxLayout {
    /// Create a box layout.
    pub fn new(orientation: Orientation, alignment: Alignment, margin: i32, spacing: i32) -> Self {
        Self {
            orientation,
            alignment,
            margin,
            spacing,
        }
    }

    /// A row with middle alignment and no margin or spacing.
    pub fn horizontal() -> Self {
        Self::new(Orientation::Horizontal, Alignment::Middle, 0, 0)
    }

    /// A column with middle alignment and no margin or spacing.
    pub fn vertical() -> Self {
        Self::new(Orientation::Vertical, Alignment::Middle, 0, 0)
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    #[inline]
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    #[inline]
    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.margin = margin;
    }

    #[inline]
    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: i32) {
        self.spacing = spacing;
    }
}

impl Default for BoxLayout {
    fn default() -> Self {
        Self::horizontal()
    }
}

impl Layout for BoxLayout {
    fn preferred_size(
        &self,
        tree: &WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i> {
        let main = self.orientation.axis();
        let cross = self.orientation.cross().axis();
        let mut size = Vector2i::splat(2 * self.margin);

        let mut y_offset = 0;
        if let Some(header) = tree.header_height(node) {
            match self.orientation {
                Orientation::Vertical => size.y += header - self.margin / 2,
                Orientation::Horizontal => y_offset = header,
            }
        }

        for (index, child) in visible_children(tree, node).into_iter().enumerate() {
            if index > 0 {
                size[main] += self.spacing;
            }
            let target = tree.target_size(child, surface)?;
            size[main] += target[main];
            size[cross] = size[cross].max(target[cross] + 2 * self.margin);
        }
        Ok(size + Vector2i::new(0, y_offset))
    }

    fn perform_layout(
        &self,
        tree: &mut WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<()> {
        let main = self.orientation.axis();
        let cross = self.orientation.cross().axis();
        let mut container = container_size(tree, node)?;
        let mut cursor = self.margin;

        let mut y_offset = 0;
        if let Some(header) = tree.header_height(node) {
            match self.orientation {
                Orientation::Vertical => cursor += header - self.margin / 2,
                Orientation::Horizontal => {
                    y_offset = header;
                    container.y -= header;
                }
            }
        }

        for (index, child) in visible_children(tree, node).into_iter().enumerate() {
            if index > 0 {
                cursor += self.spacing;
            }
            let fixed = tree.get(child)?.fixed_size();
            let mut target = tree.target_size(child, surface)?;
            let mut pos = Vector2i::new(0, y_offset);
            pos[main] = cursor;

            match self.alignment {
                Alignment::Minimum => pos[cross] += self.margin,
                Alignment::Middle => pos[cross] += (container[cross] - target[cross]) / 2,
                Alignment::Maximum => {
                    pos[cross] += container[cross] - target[cross] - self.margin * 2;
                }
                Alignment::Fill => {
                    pos[cross] += self.margin;
                    target[cross] = if fixed[cross] != 0 {
                        fixed[cross]
                    } else {
                        container[cross] - self.margin * 2
                    };
                }
            }

            place(tree, child, pos, target, surface)?;
            cursor += target[main];
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use crate::widget::WidgetNode;

    fn setup(layout: BoxLayout, container: WidgetNode) -> (WidgetTree, WidgetId, Vec<WidgetId>) {
        let mut tree = WidgetTree::default();
        let root = tree.root();
        let panel = tree.insert(root, container.with_layout(layout)).unwrap();
        let children = [(40, 20), (60, 10), (30, 30)]
            .into_iter()
            .map(|size| tree.insert(panel, WidgetNode::new().with_size(size)).unwrap())
            .collect();
        (tree, panel, children)
    }

    fn geometry(tree: &WidgetTree, id: WidgetId) -> (Vector2i, Vector2i) {
        let node = tree.node(id).unwrap();
        (node.position(), node.size())
    }

    #[test]
    fn test_horizontal_preferred_size() {
        let layout = BoxLayout::new(Orientation::Horizontal, Alignment::Middle, 5, 4);
        let (tree, panel, _) = setup(layout, WidgetNode::new());
        let surface = RecordingSurface::new();
        // 10 + 40 + 4 + 60 + 4 + 30 wide, tallest child 30 + 10.
        assert_eq!(tree.preferred_size(panel, &surface).unwrap(), Vector2i::new(148, 40));
    }

    #[test]
    fn test_vertical_middle_alignment() {
        let layout = BoxLayout::new(Orientation::Vertical, Alignment::Middle, 0, 2);
        let (mut tree, panel, children) = setup(layout, WidgetNode::new().with_size((100, 200)));
        let surface = RecordingSurface::new();
        tree.perform_layout(panel, &surface).unwrap();

        assert_eq!(geometry(&tree, children[0]), (Vector2i::new(30, 0), Vector2i::new(40, 20)));
        assert_eq!(geometry(&tree, children[1]), (Vector2i::new(20, 22), Vector2i::new(60, 10)));
        assert_eq!(geometry(&tree, children[2]), (Vector2i::new(35, 34), Vector2i::new(30, 30)));
    }

    #[test]
    fn test_fill_respects_fixed_cross_size() {
        let layout = BoxLayout::new(Orientation::Vertical, Alignment::Fill, 10, 0);
        let (mut tree, panel, children) = setup(layout, WidgetNode::new().with_size((100, 200)));
        tree.node_mut(children[1]).unwrap().set_fixed_size((25, 0));
        let surface = RecordingSurface::new();
        tree.perform_layout(panel, &surface).unwrap();

        assert_eq!(geometry(&tree, children[0]), (Vector2i::new(10, 10), Vector2i::new(80, 20)));
        assert_eq!(geometry(&tree, children[1]), (Vector2i::new(10, 30), Vector2i::new(25, 10)));
    }

    #[test]
    fn test_maximum_alignment() {
        let layout = BoxLayout::new(Orientation::Horizontal, Alignment::Maximum, 5, 0);
        let (mut tree, panel, children) = setup(layout, WidgetNode::new().with_size((200, 50)));
        let surface = RecordingSurface::new();
        tree.perform_layout(panel, &surface).unwrap();
        // 50 - 20 - 10
        assert_eq!(geometry(&tree, children[0]).0, Vector2i::new(5, 20));
    }

    #[test]
    fn test_titled_window_reserves_header() {
        let vertical = BoxLayout::new(Orientation::Vertical, Alignment::Minimum, 10, 0);
        let (mut tree, window, children) =
            setup(vertical, WidgetNode::window("Title").with_size((200, 200)));
        let surface = RecordingSurface::new();
        tree.perform_layout(window, &surface).unwrap();
        // 10 + 30 - 5
        assert_eq!(geometry(&tree, children[0]).0, Vector2i::new(10, 35));

        let horizontal = BoxLayout::new(Orientation::Horizontal, Alignment::Minimum, 10, 0);
        let (mut tree, window, children) =
            setup(horizontal, WidgetNode::window("Title").with_size((200, 200)));
        tree.perform_layout(window, &surface).unwrap();
        assert_eq!(geometry(&tree, children[0]).0, Vector2i::new(10, 40));
        assert_eq!(
            tree.preferred_size(window, &surface).unwrap(),
            Vector2i::new(20 + 130, 50 + 30)
        );
    }

    #[test]
    fn test_invisible_children_are_skipped() {
        let layout = BoxLayout::new(Orientation::Horizontal, Alignment::Minimum, 0, 10);
        let (mut tree, panel, children) = setup(layout, WidgetNode::new().with_size((300, 50)));
        tree.node_mut(children[0]).unwrap().set_visible(false);
        let surface = RecordingSurface::new();
        tree.perform_layout(panel, &surface).unwrap();
        assert_eq!(geometry(&tree, children[1]).0, Vector2i::new(0, 0));
        assert_eq!(geometry(&tree, children[2]).0, Vector2i::new(70, 0));
    }
}
