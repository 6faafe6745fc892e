//! The widget arena.
//!
//! All widgets of a screen live in one [`WidgetTree`], a `SlotMap` keyed by
//! [`WidgetId`]. Parents hold an ordered child list and children hold a
//! back-reference to their parent; both directions are kept in sync by the
//! methods here. A stale [`WidgetId`] never aliases a newer widget.
//!
//! The tree always has a root. It stands for the whole screen surface, has
//! no parent, and cannot be removed.

use std::any::Any;
use std::sync::Arc;

use slotmap::SlotMap;
use trellis_core::logging::targets;
use trellis_core::{Rect, TreeError, TreeResult, Vector2i};

use super::WidgetId;
use super::layout::LayoutStrategy;
use super::node::{WidgetKind, WidgetNode};
use super::traits::Widget;
use crate::theme::Theme;

/// Arena of widget nodes rooted at a single root widget.
pub struct WidgetTree {
    nodes: SlotMap<WidgetId, WidgetNode>,
    root: WidgetId,
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new(Arc::new(Theme::default()))
    }
}

impl WidgetTree {
    /// Create a tree whose root carries `theme`.
    pub fn new(theme: Arc<Theme>) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root = WidgetNode::new().with_id("root");
        root.theme = Some(theme);
        let root = nodes.insert(root);
        Self { nodes, root }
    }

    /// The root widget.
    #[inline]
    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Check if a handle refers to a live widget.
    #[inline]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of live widgets, including the root and detached nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn get(&self, id: WidgetId) -> TreeResult<&WidgetNode> {
        self.nodes.get(id).ok_or(TreeError::InvalidWidget)
    }

    pub(crate) fn get_mut(&mut self, id: WidgetId) -> TreeResult<&mut WidgetNode> {
        self.nodes.get_mut(id).ok_or(TreeError::InvalidWidget)
    }

    // =========================================================================
    // Construction
    // =========================================================================

    /// Add `node` as the last child of `parent`.
    pub fn insert(&mut self, parent: WidgetId, node: WidgetNode) -> TreeResult<WidgetId> {
        let count = self.get(parent)?.children.len();
        let id = self.create_detached(node);
        self.add_child(parent, id, count)?;
        Ok(id)
    }

    /// Add a plain container widget to `parent`.
    pub fn add_widget(&mut self, parent: WidgetId) -> TreeResult<WidgetId> {
        self.insert(parent, WidgetNode::new())
    }

    /// Add a text label to `parent`.
    pub fn add_label(
        &mut self,
        parent: WidgetId,
        caption: impl Into<String>,
    ) -> TreeResult<WidgetId> {
        self.insert(parent, WidgetNode::label(caption))
    }

    /// Store a node without attaching it anywhere.
    ///
    /// The node keeps any theme it was built with; otherwise it receives one
    /// when it is attached.
    pub fn create_detached(&mut self, mut node: WidgetNode) -> WidgetId {
        node.parent = None;
        node.children.clear();
        let id = self.nodes.insert(node);
        tracing::trace!(target: targets::TREE, ?id, "created widget");
        id
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Insert `child` into `parent`'s child list at `index`.
    ///
    /// The child is detached from its previous parent first, inherits the
    /// parent's theme recursively, and gets its back-reference set.
    #[tracing::instrument(skip(self), target = "trellis::tree", level = "trace")]
    pub fn add_child(&mut self, parent: WidgetId, child: WidgetId, index: usize) -> TreeResult<()> {
        self.get(parent)?;
        self.get(child)?;
        if child == self.root {
            return Err(TreeError::RootRemoval);
        }
        if self.is_ancestor_of(child, parent) {
            return Err(TreeError::CircularParentage);
        }

        // Reattaching to the same parent shifts the valid range by one.
        let old_parent = self.get(child)?.parent;
        let mut count = self.get(parent)?.children.len();
        if old_parent == Some(parent) {
            count -= 1;
        }
        if index > count {
            return Err(TreeError::IndexOutOfRange { index, count });
        }

        self.detach(child);
        self.get_mut(parent)?.children.insert(index, child);
        self.get_mut(child)?.parent = Some(parent);

        if let Some(theme) = self.get(parent)?.theme.clone() {
            self.set_theme(child, theme);
        }
        Ok(())
    }

    /// Append `child` to `parent`'s child list.
    pub fn push_child(&mut self, parent: WidgetId, child: WidgetId) -> TreeResult<()> {
        let mut count = self.get(parent)?.children.len();
        if self.parent(child) == Some(parent) {
            count -= 1;
        }
        self.add_child(parent, child, count)
    }

    /// Detach `child` from `parent` and release its subtree.
    pub fn remove_child(&mut self, parent: WidgetId, child: WidgetId) -> TreeResult<()> {
        if self.get(child)?.parent != Some(parent) {
            return Err(TreeError::InvalidWidget);
        }
        self.destroy(child)
    }

    /// Detach the child at `index` and release its subtree.
    pub fn remove_child_at(&mut self, parent: WidgetId, index: usize) -> TreeResult<()> {
        let children = &self.get(parent)?.children;
        let child = *children.get(index).ok_or(TreeError::IndexOutOfRange {
            index,
            count: children.len(),
        })?;
        self.destroy(child)
    }

    /// Remove a widget and all its descendants.
    ///
    /// The widget is unlinked from its parent before anything is released.
    #[tracing::instrument(skip(self), target = "trellis::tree", level = "trace")]
    pub fn destroy(&mut self, id: WidgetId) -> TreeResult<()> {
        if id == self.root {
            return Err(TreeError::RootRemoval);
        }
        let doomed = self.depth_first_preorder(id)?;
        tracing::trace!(target: targets::TREE, ?id, count = doomed.len(), "destroying subtree");

        self.detach(id);
        for node in doomed.into_iter().rev() {
            self.nodes.remove(node);
        }
        Ok(())
    }

    /// Unlink `id` from its parent, leaving it alive and detached.
    fn detach(&mut self, id: WidgetId) {
        let old_parent = self.nodes.get_mut(id).and_then(|node| node.parent.take());
        if let Some(parent) = old_parent
            && let Some(parent_node) = self.nodes.get_mut(parent)
        {
            parent_node.children.retain(|&c| c != id);
        }
    }

    /// Move a widget to the end of its parent's child list (front of the z-order).
    pub fn raise(&mut self, id: WidgetId) -> TreeResult<()> {
        let parent = self.get(id)?.parent;
        if let Some(parent) = parent {
            let siblings = &mut self.get_mut(parent)?.children;
            siblings.retain(|&c| c != id);
            siblings.push(id);
        }
        Ok(())
    }

    /// Move a widget to the start of its parent's child list.
    pub fn lower(&mut self, id: WidgetId) -> TreeResult<()> {
        let parent = self.get(id)?.parent;
        if let Some(parent) = parent {
            let siblings = &mut self.get_mut(parent)?.children;
            siblings.retain(|&c| c != id);
            siblings.insert(0, id);
        }
        Ok(())
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children of `id` in z-order; empty for stale handles.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn child_count(&self, id: WidgetId) -> usize {
        self.children(id).len()
    }

    /// Position of `child` in `parent`'s child list.
    pub fn child_index(&self, parent: WidgetId, child: WidgetId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    /// Ancestors of `id` from its parent up to the root.
    pub fn ancestors(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut result = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            result.push(ancestor);
            current = self.parent(ancestor);
        }
        result
    }

    /// Check if `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_of(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// The subtree rooted at `id`, parents before children.
    pub fn depth_first_preorder(&self, id: WidgetId) -> TreeResult<Vec<WidgetId>> {
        let mut result = Vec::new();
        self.depth_first_preorder_recursive(id, &mut result)?;
        Ok(result)
    }

    fn depth_first_preorder_recursive(
        &self,
        id: WidgetId,
        result: &mut Vec<WidgetId>,
    ) -> TreeResult<()> {
        let node = self.get(id)?;
        result.push(id);
        for &child in &node.children {
            self.depth_first_preorder_recursive(child, result)?;
        }
        Ok(())
    }

    // =========================================================================
    // Theme
    // =========================================================================

    /// Assign `theme` to `id` and all of its descendants.
    pub fn set_theme(&mut self, id: WidgetId, theme: Arc<Theme>) {
        let Ok(subtree) = self.depth_first_preorder(id) else {
            return;
        };
        for node in subtree {
            if let Some(node) = self.nodes.get_mut(node) {
                node.theme = Some(Arc::clone(&theme));
            }
        }
    }

    /// The theme `id` draws with.
    pub fn theme(&self, id: WidgetId) -> Arc<Theme> {
        match self.nodes.get(id) {
            Some(node) => node.theme(),
            None => Arc::new(Theme::default()),
        }
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Find a child of `id` with the given string id.
    ///
    /// With `recursive`, the whole subtree is searched depth-first.
    pub fn find_by_id(&self, id: WidgetId, label: &str, recursive: bool) -> Option<WidgetId> {
        for &child in self.children(id) {
            if self.nodes.get(child).and_then(|n| n.id()) == Some(label) {
                return Some(child);
            }
            if recursive && let Some(found) = self.find_by_id(child, label, true) {
                return Some(found);
            }
        }
        None
    }

    /// Search the whole tree, starting from the root.
    pub fn find_global_by_id(&self, label: &str) -> Option<WidgetId> {
        self.find_by_id(self.root, label, true)
    }

    /// The nearest window that is `id` or one of its ancestors.
    pub fn window_of(&self, id: WidgetId) -> Option<WidgetId> {
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(node_id)?;
            if matches!(node.kind, WidgetKind::Window(_)) {
                return Some(node_id);
            }
            current = node.parent;
        }
        None
    }

    /// The header height a titled window reserves, or `None`.
    pub fn header_height(&self, id: WidgetId) -> Option<i32> {
        let node = self.nodes.get(id)?;
        match &node.kind {
            WidgetKind::Window(window) if !window.title.is_empty() => {
                Some(node.theme().window_header_height)
            }
            _ => None,
        }
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Containment test for `p` in `id`'s parent coordinates.
    pub fn contains_point(&self, id: WidgetId, p: Vector2i) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| Rect::from_origin_size(node.position, node.size).contains(p))
    }

    /// Position of `id` relative to the root's origin.
    pub fn absolute_position(&self, id: WidgetId) -> Vector2i {
        let mut result = Vector2i::ZERO;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(node_id) else {
                break;
            };
            result += node.position;
            current = node.parent;
        }
        result
    }

    /// The part of `id` not clipped away by its ancestors, in absolute coordinates.
    pub fn absolute_clip_rect(&self, id: WidgetId) -> Rect {
        let Some(node) = self.nodes.get(id) else {
            return Rect::default();
        };
        let mut clip = Rect::from_origin_size(self.absolute_position(id), node.size);
        for ancestor in self.ancestors(id) {
            if let Some(a) = self.nodes.get(ancestor) {
                clip = clip.intersect(&Rect::from_origin_size(self.absolute_position(ancestor), a.size));
            }
        }
        clip
    }

    /// Whether `id` and every ancestor are visible.
    pub fn is_visible_recursive(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.nodes.get(node_id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Hit-test `p`, given in `id`'s parent coordinates.
    ///
    /// Children are tested front to back (reverse insertion order); the
    /// first visible child containing the point is searched recursively.
    pub fn find_at(&self, id: WidgetId, p: Vector2i) -> Option<WidgetId> {
        let node = self.nodes.get(id)?;
        let local = p - node.position;
        for &child in node.children.iter().rev() {
            let visible = self.nodes.get(child).is_some_and(|c| c.visible);
            if visible && self.contains_point(child, local) {
                return self.find_at(child, local);
            }
        }
        self.contains_point(id, p).then_some(id)
    }

    // =========================================================================
    // Layout strategy
    // =========================================================================

    /// Install a layout strategy on `id`.
    pub fn set_layout(&mut self, id: WidgetId, layout: impl Into<LayoutStrategy>) -> TreeResult<()> {
        self.get_mut(id)?.layout = Some(Arc::new(layout.into()));
        Ok(())
    }

    /// Install a strategy shared with other widgets.
    pub fn set_shared_layout(&mut self, id: WidgetId, layout: Arc<LayoutStrategy>) -> TreeResult<()> {
        self.get_mut(id)?.layout = Some(layout);
        Ok(())
    }

    pub fn layout(&self, id: WidgetId) -> Option<&LayoutStrategy> {
        self.nodes.get(id)?.layout.as_deref()
    }

    /// Mutable access to `id`'s strategy, cloning it first if it is shared.
    pub fn layout_mut(&mut self, id: WidgetId) -> Option<&mut LayoutStrategy> {
        self.nodes.get_mut(id)?.layout.as_mut().map(Arc::make_mut)
    }

    pub(crate) fn layout_arc(&self, id: WidgetId) -> Option<Arc<LayoutStrategy>> {
        self.nodes.get(id)?.layout.clone()
    }

    // =========================================================================
    // Behavior
    // =========================================================================

    /// Attach custom behavior to `id`, replacing any previous one.
    pub fn set_behavior(&mut self, id: WidgetId, behavior: impl Widget) -> TreeResult<()> {
        self.get_mut(id)?.behavior = Some(Box::new(behavior));
        Ok(())
    }

    /// Borrow `id`'s behavior as a concrete type.
    pub fn behavior<T: Widget>(&self, id: WidgetId) -> Option<&T> {
        let behavior: &dyn Any = self.nodes.get(id)?.behavior.as_deref()?;
        behavior.downcast_ref()
    }

    /// Mutably borrow `id`'s behavior as a concrete type.
    pub fn behavior_mut<T: Widget>(&mut self, id: WidgetId) -> Option<&mut T> {
        let behavior: &mut dyn Any = self.nodes.get_mut(id)?.behavior.as_deref_mut()?;
        behavior.downcast_mut()
    }

    pub(crate) fn behavior_dyn(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.nodes.get(id)?.behavior.as_deref()
    }

    /// Detach the behavior for the duration of a dispatch.
    pub(crate) fn take_behavior(&mut self, id: WidgetId) -> Option<Box<dyn Widget>> {
        self.nodes.get_mut(id)?.behavior.take()
    }

    /// Reattach a behavior taken by [`take_behavior`](Self::take_behavior).
    ///
    /// Dropped if the widget was removed or given a new behavior meanwhile.
    pub(crate) fn restore_behavior(&mut self, id: WidgetId, behavior: Box<dyn Widget>) {
        if let Some(node) = self.nodes.get_mut(id)
            && node.behavior.is_none()
        {
            node.behavior = Some(behavior);
        }
    }
}
