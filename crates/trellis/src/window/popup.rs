//! Popups anchored to a parent window.
//!
//! A popup is a headerless window that follows another window around. Its
//! placement is recomputed before every draw from the parent window's
//! position and the popup's anchor, so it needs no bookkeeping when the
//! parent is dragged.

use trellis_core::logging::targets;
use trellis_core::{TreeError, TreeResult, Vector2i};

use crate::screen::Screen;
use crate::widget::{PopupData, WidgetId, WidgetNode};

/// Default distance from a popup's top edge to its anchor point.
pub(crate) const DEFAULT_ANCHOR_HEIGHT: i32 = 30;

impl Screen {
    /// Add a popup under `parent`, anchored to `parent_window`.
    pub fn add_popup(&mut self, parent: WidgetId, parent_window: WidgetId) -> TreeResult<WidgetId> {
        if !self.tree.contains(parent_window) {
            return Err(TreeError::InvalidWidget);
        }
        let mut node = WidgetNode::window("");
        if let Some(window) = node.window_data_mut() {
            window.popup = Some(PopupData {
                parent_window,
                anchor_pos: Vector2i::ZERO,
                anchor_height: DEFAULT_ANCHOR_HEIGHT,
                clamp_to_screen: false,
            });
        }
        let id = self.tree.insert(parent, node)?;
        tracing::debug!(target: targets::WINDOW, ?id, ?parent_window, "popup added");
        Ok(id)
    }

    /// Set the anchor point of `popup`, relative to its parent window.
    pub fn set_popup_anchor(&mut self, popup: WidgetId, anchor_pos: impl Into<Vector2i>) -> TreeResult<()> {
        let data = self.tree.get_mut(popup)?.popup_mut().ok_or(TreeError::InvalidWidget)?;
        data.anchor_pos = anchor_pos.into();
        Ok(())
    }

    /// Set how far below the popup's top edge the anchor sits.
    pub fn set_popup_anchor_height(&mut self, popup: WidgetId, anchor_height: i32) -> TreeResult<()> {
        let data = self.tree.get_mut(popup)?.popup_mut().ok_or(TreeError::InvalidWidget)?;
        data.anchor_height = anchor_height;
        Ok(())
    }

    /// Recompute the visibility and position of `popup` from its parent
    /// window, refreshing the parent first when it is a popup too.
    pub fn refresh_relative_placement(&mut self, popup: WidgetId) {
        let mut chain = Vec::new();
        self.refresh_placement_chain(popup, &mut chain);
    }

    /// Refresh every popup in the tree.
    pub(crate) fn refresh_popups(&mut self) {
        let Ok(order) = self.tree.depth_first_preorder(self.root()) else {
            return;
        };
        for id in order {
            if self.tree.node(id).is_some_and(|n| n.popup().is_some()) {
                self.refresh_relative_placement(id);
            }
        }
    }

    fn refresh_placement_chain(&mut self, popup: WidgetId, chain: &mut Vec<WidgetId>) {
        if chain.contains(&popup) {
            tracing::warn!(target: targets::WINDOW, ?popup, "popup anchored to itself, placement skipped");
            return;
        }
        let Some(data) = self.tree.node(popup).and_then(|n| n.popup()).copied() else {
            return;
        };
        chain.push(popup);
        if self.tree.node(data.parent_window).is_some_and(|n| n.popup().is_some()) {
            self.refresh_placement_chain(data.parent_window, chain);
        }

        let parent_visible = self.tree.is_visible_recursive(data.parent_window);
        let parent_origin = self.tree.absolute_position(data.parent_window);
        let own_origin = self
            .tree
            .parent(popup)
            .map_or(Vector2i::ZERO, |p| self.tree.absolute_position(p));
        let screen_height = self.size().y;

        let Some(node) = self.tree.node_mut(popup) else {
            return;
        };
        if !parent_visible {
            node.set_visible(false);
        }
        let mut pos = parent_origin - own_origin + data.anchor_pos - Vector2i::new(0, data.anchor_height);
        if data.clamp_to_screen {
            pos.y = pos.y.min(screen_height - node.size().y);
        }
        node.set_position(pos);
    }
}
