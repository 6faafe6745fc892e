//! Group layout: a single column of labelled sections.
//!
//! Labels act as group headings. Widgets following a label with a non-empty
//! caption are indented until the next label. A larger gap precedes every
//! label so that groups read as separate blocks.

use trellis_core::{LayoutResult, Vector2i};

use super::{Layout, place, visible_children};
use crate::surface::DrawSurface;
use crate::widget::node::WidgetKind;
use crate::widget::{WidgetId, WidgetTree};

/// A column of label-headed groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupLayout {
    margin: i32,
    spacing: i32,
    group_spacing: i32,
    group_indent: i32,
}

impl Default for GroupLayout {
    fn default() -> Self {
        Self::new(15, 6, 14, 20)
    }
}

impl GroupLayout {
    pub fn new(margin: i32, spacing: i32, group_spacing: i32, group_indent: i32) -> Self {
        Self {
            margin,
            spacing,
            group_spacing,
            group_indent,
        }
    }

    #[inline]
    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.margin = margin;
    }

    /// Gap before a non-label widget.
    #[inline]
    pub fn spacing(&self) -> i32 {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: i32) {
        self.spacing = spacing;
    }

    /// Gap before a label.
    #[inline]
    pub fn group_spacing(&self) -> i32 {
        self.group_spacing
    }

    pub fn set_group_spacing(&mut self, group_spacing: i32) {
        self.group_spacing = group_spacing;
    }

    #[inline]
    pub fn group_indent(&self) -> i32 {
        self.group_indent
    }

    pub fn set_group_indent(&mut self, group_indent: i32) {
        self.group_indent = group_indent;
    }

    /// Walk visible children, yielding each with its leading gap and indent.
    fn walk(&self, tree: &WidgetTree, node: WidgetId) -> LayoutResult<Vec<GroupItem>> {
        let mut items = Vec::new();
        let mut indent = false;
        for (index, child) in visible_children(tree, node).into_iter().enumerate() {
            let caption = match tree.get(child)?.kind() {
                WidgetKind::Label(label) => Some(label.caption.as_str()),
                _ => None,
            };
            let gap = match (index, caption) {
                (0, _) => 0,
                (_, Some(_)) => self.group_spacing,
                (_, None) => self.spacing,
            };
            let indent_here = if indent && caption.is_none() {
                self.group_indent
            } else {
                0
            };
            if let Some(caption) = caption {
                indent = !caption.is_empty();
            }
            items.push(GroupItem {
                child,
                gap,
                indent: indent_here,
            });
        }
        Ok(items)
    }
}

struct GroupItem {
    child: WidgetId,
    gap: i32,
    indent: i32,
}

impl Layout for GroupLayout {
    fn preferred_size(
        &self,
        tree: &WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i> {
        let mut height = self.margin;
        let mut width = 2 * self.margin;
        if let Some(header) = tree.header_height(node) {
            height += header - self.margin / 2;
        }

        for item in self.walk(tree, node)? {
            let target = tree.target_size(item.child, surface)?;
            height += item.gap + target.y;
            width = width.max(target.x + 2 * self.margin + item.indent);
        }
        height += self.margin;
        Ok(Vector2i::new(width, height))
    }

    fn perform_layout(
        &self,
        tree: &mut WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<()> {
        let container = tree.get(node)?;
        let width = if container.fixed_size().x != 0 {
            container.fixed_size().x
        } else {
            container.size().x
        };
        let available_width = width - 2 * self.margin;

        let mut height = self.margin;
        if let Some(header) = tree.header_height(node) {
            height += header - self.margin / 2;
        }

        for item in self.walk(tree, node)? {
            height += item.gap;
            let preferred = tree.preferred_size(item.child, surface)?;
            let fixed = tree.get(item.child)?.fixed_size();
            let target = fixed.or_fallback(Vector2i::new(available_width - item.indent, preferred.y));
            let pos = Vector2i::new(self.margin + item.indent, height);
            place(tree, item.child, pos, target, surface)?;
            height += target.y;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use crate::widget::WidgetNode;

    #[test]
    fn test_labels_indent_following_widgets() {
        let mut tree = WidgetTree::default();
        let root = tree.root();
        let surface = RecordingSurface::new();
        let panel = tree
            .insert(root, WidgetNode::new().with_size((200, 0)).with_layout(GroupLayout::default()))
            .unwrap();
        let heading = tree.add_label(panel, "Group").unwrap();
        let field = tree.insert(panel, WidgetNode::new().with_size((50, 20))).unwrap();
        let blank = tree.add_label(panel, "").unwrap();
        let after = tree.insert(panel, WidgetNode::new().with_size((50, 20))).unwrap();

        tree.perform_layout(panel, &surface).unwrap();

        let geometry = |id| {
            let n = tree.node(id).unwrap();
            (n.position(), n.size())
        };
        assert_eq!(geometry(heading), (Vector2i::new(15, 15), Vector2i::new(170, 16)));
        // spacing 6 after a 16px label; indented by 20.
        assert_eq!(geometry(field), (Vector2i::new(35, 37), Vector2i::new(150, 20)));
        // group spacing 14 before the empty label, which ends indentation.
        assert_eq!(geometry(blank).0, Vector2i::new(15, 71));
        assert_eq!(geometry(after).0, Vector2i::new(15, 77));
    }

    #[test]
    fn test_preferred_size_includes_indent() {
        let mut tree = WidgetTree::default();
        let root = tree.root();
        let surface = RecordingSurface::new();
        let panel = tree
            .insert(root, WidgetNode::new().with_layout(GroupLayout::default()))
            .unwrap();
        tree.add_label(panel, "ab").unwrap();
        tree.insert(panel, WidgetNode::new().with_size((100, 10))).unwrap();

        // width: 100 + 30 + 20; height: 15 + 16 + 6 + 10 + 15
        assert_eq!(tree.preferred_size(panel, &surface).unwrap(), Vector2i::new(150, 62));
    }
}
