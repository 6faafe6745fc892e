//! The focus path.
//!
//! Focus is held by a chain of widgets: the focused leaf and every ancestor
//! below the root. Moving focus notifies the old chain, rebuilds the path and
//! brings the outermost window of the new chain to the front.

use trellis_core::logging::targets;

use super::Screen;
use crate::widget::{WidgetId, WidgetKind};

impl Screen {
    /// The focus path, from the focused leaf up to the root's child.
    pub fn focus_path(&self) -> &[WidgetId] {
        &self.focus_path
    }

    /// The focused leaf, if any.
    pub fn focused_widget(&self) -> Option<WidgetId> {
        self.focus_path.first().copied()
    }

    /// Move focus to `target`, or clear it with `None`.
    pub fn update_focus(&mut self, target: Option<WidgetId>) {
        self.dispatching(|screen| {
            let old_path = std::mem::take(&mut screen.focus_path);
            for &id in &old_path {
                screen.send_focus_changed(id, false);
            }

            let root = screen.root();
            let mut path = Vec::new();
            let mut window = None;
            let mut current = target.filter(|&id| screen.tree.contains(id));
            while let Some(id) = current {
                if id == root {
                    break;
                }
                path.push(id);
                if screen
                    .tree
                    .node(id)
                    .is_some_and(|n| matches!(n.kind(), WidgetKind::Window(_)))
                {
                    window = Some(id);
                }
                current = screen.tree.parent(id);
            }
            tracing::debug!(target: targets::SCREEN, ?target, depth = path.len(), "focus moved");
            screen.focus_path = path.clone();

            for &id in path.iter().rev() {
                screen.send_focus_changed(id, true);
            }
            if let Some(window) = window {
                screen.move_window_to_front(window);
            }
        });
    }

    /// Ask for `id` to receive focus.
    ///
    /// Requests made from inside an event handler take effect once the
    /// outermost dispatch returns. While one is pending, requests for the
    /// pending widget or its ancestors are absorbed by it, so a press keeps
    /// focus on the innermost widget that asked.
    pub fn request_focus(&mut self, id: WidgetId) {
        if !self.is_dispatching() {
            self.update_focus(Some(id));
            return;
        }
        match self.pending_focus {
            Some(pending) if pending == id || self.tree.is_ancestor_of(id, pending) => {}
            Some(_) => self.pending_focus = Some(id),
            None => {
                self.pending_focus = Some(id);
                self.defer(|screen| {
                    if let Some(target) = screen.pending_focus.take() {
                        screen.update_focus(Some(target));
                    }
                });
            }
        }
    }

    /// Drop focus from every widget.
    pub fn clear_focus(&mut self) {
        self.update_focus(None);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::screen::ScreenConfig;
    use crate::widget::{Widget, WidgetNode};

    /// Logs focus notifications as `(label, focused)`.
    struct FocusProbe {
        label: &'static str,
        log: Rc<RefCell<Vec<(&'static str, bool)>>>,
    }

    impl Widget for FocusProbe {
        fn focus_changed(&mut self, _screen: &mut Screen, _id: WidgetId, focused: bool) -> bool {
            self.log.borrow_mut().push((self.label, focused));
            false
        }
    }

    fn setup() -> (Screen, Rc<RefCell<Vec<(&'static str, bool)>>>, [WidgetId; 3]) {
        let mut screen = Screen::headless(&ScreenConfig::new("focus", (400, 300)));
        let log = Rc::new(RefCell::new(Vec::new()));
        let probe = |label| FocusProbe {
            label,
            log: Rc::clone(&log),
        };
        let root = screen.root();
        let tree = screen.tree_mut();
        let window = tree
            .insert(root, WidgetNode::window("w").with_behavior(probe("window")))
            .unwrap();
        let panel = tree
            .insert(window, WidgetNode::new().with_behavior(probe("panel")))
            .unwrap();
        let leaf = tree
            .insert(panel, WidgetNode::new().with_behavior(probe("leaf")))
            .unwrap();
        (screen, log, [window, panel, leaf])
    }

    #[test]
    fn test_path_is_ancestor_chain_without_root() {
        let (mut screen, log, [window, panel, leaf]) = setup();
        screen.update_focus(Some(leaf));
        assert_eq!(screen.focus_path(), &[leaf, panel, window]);
        assert_eq!(screen.focused_widget(), Some(leaf));
        assert!(screen.tree().node(panel).unwrap().is_focused());
        assert_eq!(
            *log.borrow(),
            vec![("window", true), ("panel", true), ("leaf", true)]
        );
    }

    #[test]
    fn test_old_path_is_unfocused_first() {
        let (mut screen, log, [window, panel, leaf]) = setup();
        screen.update_focus(Some(leaf));
        log.borrow_mut().clear();

        screen.update_focus(Some(panel));
        assert_eq!(screen.focus_path(), &[panel, window]);
        assert!(!screen.tree().node(leaf).unwrap().is_focused());
        assert_eq!(
            log.borrow()[..3],
            [("leaf", false), ("panel", false), ("window", false)]
        );
        assert_eq!(log.borrow()[3..], [("window", true), ("panel", true)]);
    }

    #[test]
    fn test_clear_focus() {
        let (mut screen, _, [_, _, leaf]) = setup();
        screen.update_focus(Some(leaf));
        screen.clear_focus();
        assert!(screen.focus_path().is_empty());
        assert!(!screen.tree().node(leaf).unwrap().is_focused());
    }

    #[test]
    fn test_focus_on_root_gives_empty_path() {
        let (mut screen, _, _) = setup();
        let root = screen.root();
        screen.request_focus(root);
        assert!(screen.focus_path().is_empty());
    }
}
