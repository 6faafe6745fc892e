//! Windows, popups and the built-in dialogs.
//!
//! A window is a widget of kind [`WidgetKind::Window`]. A non-empty title
//! gives it a draggable header that layouts reserve room for, and a modal
//! window confines pointer input to itself while it holds focus.
//!
//! Windows are normally children of the screen's root. Their order among
//! the root's children is their stacking order; focusing anything inside a
//! window brings it to the front together with the popups anchored to it.
//!
//! # Example
//!
//! ```ignore
//! let window = screen.add_window(screen.root(), "Settings")?;
//! screen.tree_mut().set_layout(window, GroupLayout::default())?;
//! screen.tree_mut().add_label(window, "Brightness")?;
//! screen.center_window(window)?;
//! ```

mod keyboard;
mod message_dialog;
mod popup;

pub use keyboard::{KeyCallback, Keyboard, KeyboardType, VirtualKey};
pub use message_dialog::{
    DialogCallback, DialogResponse, MessageDialog, MessageDialogBuilder, MessageDialogKind,
};

use trellis_core::logging::targets;
use trellis_core::{LayoutResult, TreeResult};

use crate::screen::Screen;
use crate::widget::{WidgetId, WidgetKind, WidgetNode};

impl Screen {
    /// Add a window titled `title` to `parent`.
    pub fn add_window(&mut self, parent: WidgetId, title: impl Into<String>) -> TreeResult<WidgetId> {
        self.tree.insert(parent, WidgetNode::window(title))
    }

    /// Whether `id` is a window or popup.
    pub fn is_window(&self, id: WidgetId) -> bool {
        self.tree
            .node(id)
            .is_some_and(|n| matches!(n.kind(), WidgetKind::Window(_)))
    }

    /// Move `window` to the top of its siblings, followed by every popup
    /// anchored to it that was stacked behind it.
    pub fn move_window_to_front(&mut self, window: WidgetId) {
        self.raise_with_popups(window, &mut Vec::new());
    }

    /// `raised` holds every window promoted so far in this pass. Popups
    /// anchored to each other in a cycle are raised once each.
    fn raise_with_popups(&mut self, window: WidgetId, raised: &mut Vec<WidgetId>) {
        if raised.contains(&window) {
            tracing::warn!(target: targets::WINDOW, ?window, "popup anchor cycle while raising");
            return;
        }
        if self.tree.raise(window).is_err() {
            return;
        }
        raised.push(window);
        tracing::debug!(target: targets::WINDOW, ?window, "window moved to front");
        let Some(parent) = self.tree.parent(window) else {
            return;
        };
        loop {
            let siblings = self.tree.children(parent);
            let base = siblings.iter().position(|&c| c == window).unwrap_or(0);
            let behind = siblings[..base].iter().copied().find(|&sibling| {
                !raised.contains(&sibling)
                    && self
                        .tree
                        .node(sibling)
                        .and_then(|n| n.popup())
                        .is_some_and(|popup| popup.parent_window == window)
            });
            match behind {
                Some(popup) => self.raise_with_popups(popup, raised),
                None => break,
            }
        }
    }

    /// Remove `window` and its subtree, dropping any focus or drag state
    /// that refers to it.
    pub fn dispose_window(&mut self, window: WidgetId) -> TreeResult<()> {
        if self.focus_path.contains(&window) {
            self.focus_path.clear();
        }
        self.release_drag_within(window);
        tracing::debug!(target: targets::WINDOW, ?window, "window disposed");
        self.tree.destroy(window)
    }

    /// Remove any widget and its subtree.
    ///
    /// The focus path is cleared when it runs through the removed subtree.
    pub fn remove_widget(&mut self, id: WidgetId) -> TreeResult<()> {
        if self.focus_path.iter().any(|&f| self.tree.is_ancestor_of(id, f)) {
            self.focus_path.clear();
        }
        self.release_drag_within(id);
        self.tree.destroy(id)
    }

    fn release_drag_within(&mut self, id: WidgetId) {
        if let Some(target) = self.drag_target
            && self.tree.is_ancestor_of(id, target)
        {
            self.drag_target = None;
        }
    }

    /// Center `window` on the screen.
    ///
    /// A window that was never sized is first given its preferred size and
    /// laid out.
    pub fn center_window(&mut self, window: WidgetId) -> LayoutResult<()> {
        if self.tree.get(window)?.size().is_zero() {
            let preferred = self.preferred_size(window)?;
            self.tree.get_mut(window)?.set_size(preferred);
            self.perform_layout_of(window)?;
        }
        let screen_size = self.size();
        let node = self.tree.get_mut(window)?;
        let pos = (screen_size - node.size()) / 2;
        node.set_position(pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenConfig;
    use trellis_core::Vector2i;

    fn setup() -> Screen {
        Screen::headless(&ScreenConfig::new("windows", (400, 300)))
    }

    #[test]
    fn test_focus_raises_window() {
        let mut screen = setup();
        let root = screen.root();
        let a = screen.add_window(root, "A").unwrap();
        let b = screen.add_window(root, "B").unwrap();
        let c = screen.add_window(root, "C").unwrap();
        let inside = screen.tree_mut().add_widget(a).unwrap();

        screen.request_focus(inside);
        assert_eq!(screen.tree().children(root), &[b, c, a]);
    }

    #[test]
    fn test_anchored_popups_follow_window() {
        let mut screen = setup();
        let root = screen.root();
        let a = screen.add_window(root, "A").unwrap();
        let popup = screen.add_popup(root, a).unwrap();
        let nested = screen.add_popup(root, popup).unwrap();
        let b = screen.add_window(root, "B").unwrap();
        screen.tree_mut().lower(nested).unwrap();

        screen.move_window_to_front(a);
        assert_eq!(screen.tree().children(root), &[b, a, popup, nested]);
    }

    #[test]
    fn test_mutually_anchored_popups_raise_once() {
        let mut screen = setup();
        let root = screen.root();
        let window = screen.add_window(root, "W").unwrap();
        let first = screen.add_popup(root, window).unwrap();
        let second = screen.add_popup(root, first).unwrap();
        if let Some(data) = screen.tree_mut().node_mut(first).and_then(|n| n.popup_mut()) {
            data.parent_window = second;
        }
        screen.draw_all();

        screen.move_window_to_front(first);
        assert_eq!(screen.tree().children(root), &[window, first, second]);
        screen.move_window_to_front(second);
        assert_eq!(screen.tree().children(root), &[window, second, first]);
    }

    #[test]
    fn test_dispose_clears_focus_and_drag() {
        let mut screen = setup();
        let root = screen.root();
        let window = screen.add_window(root, "W").unwrap();
        if let Some(node) = screen.tree_mut().node_mut(window) {
            node.set_position((10, 10));
            node.set_size((100, 100));
        }
        screen.request_focus(window);

        screen.on_pointer_move(20, 15);
        screen.on_pointer_button(
            crate::widget::MouseButton::Left,
            true,
            crate::widget::KeyboardModifiers::NONE,
        );
        assert_eq!(screen.drag_target(), Some(window));

        screen.dispose_window(window).unwrap();
        assert!(screen.focus_path().is_empty());
        assert_eq!(screen.drag_target(), None);
        assert!(!screen.tree().contains(window));
        // Further motion must not touch the stale handle.
        assert!(!screen.on_pointer_move(30, 30));
    }

    #[test]
    fn test_remove_widget_inside_focus_path() {
        let mut screen = setup();
        let root = screen.root();
        let window = screen.add_window(root, "W").unwrap();
        let panel = screen.tree_mut().add_widget(window).unwrap();
        let leaf = screen.tree_mut().add_widget(panel).unwrap();
        let other = screen.tree_mut().add_widget(window).unwrap();

        screen.request_focus(leaf);
        screen.remove_widget(other).unwrap();
        assert_eq!(screen.focus_path(), &[leaf, panel, window]);

        screen.remove_widget(panel).unwrap();
        assert!(screen.focus_path().is_empty());
        assert!(!screen.tree().contains(leaf));
        assert!(screen.tree().contains(window));
        assert!(screen.remove_widget(root).is_err());
    }

    #[test]
    fn test_center_window_sizes_unsized_window() {
        let mut screen = setup();
        let root = screen.root();
        let window = screen.add_window(root, "Ten chars!").unwrap();
        screen.center_window(window).unwrap();

        let node = screen.tree().node(window).unwrap();
        // Title: 10 chars at 18px -> 90 wide, padded by 20.
        assert_eq!(node.size(), Vector2i::new(110, 18));
        assert_eq!(node.position(), Vector2i::new(145, 141));
    }

    #[test]
    fn test_center_window_keeps_existing_size() {
        let mut screen = setup();
        let root = screen.root();
        let window = screen.add_window(root, "").unwrap();
        screen.tree_mut().node_mut(window).unwrap().set_size((100, 50));
        screen.center_window(window).unwrap();
        assert_eq!(
            screen.tree().node(window).unwrap().position(),
            Vector2i::new(150, 125)
        );
    }
}
