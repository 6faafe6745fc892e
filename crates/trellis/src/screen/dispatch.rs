//! Delivery of widget events and the built-in handlers.
//!
//! `send_*` delivers an event to one widget: to its [`Widget`] behavior when
//! it has one, otherwise to the matching `default_*` handler. Behaviors
//! usually call the default themselves to keep the built-in propagation.
//!
//! The defaults mirror how containers pass events on: pointer events go to
//! the front-most visible child under the pointer, translated into that
//! child's parent frame, until one consumes them.

use trellis_core::Vector2i;
use trellis_core::logging::targets;

use super::Screen;
use crate::widget::{
    KeyEvent, MouseButton, PointerButtonEvent, PointerMoveEvent, ScrollEvent, Widget, WidgetId,
    WidgetKind,
};

impl Screen {
    /// Run `handler` against `id`'s behavior, or `fallback` if it has none.
    ///
    /// The behavior is detached while it runs. Returns `None` when `id` is
    /// not a live widget.
    fn route<R>(
        &mut self,
        id: WidgetId,
        handler: impl FnOnce(&mut dyn Widget, &mut Screen) -> R,
        fallback: impl FnOnce(&mut Screen) -> R,
    ) -> Option<R> {
        if !self.tree.contains(id) {
            tracing::trace!(target: targets::SCREEN, ?id, "event for stale widget dropped");
            return None;
        }
        Some(self.dispatching(|screen| match screen.tree.take_behavior(id) {
            Some(mut behavior) => {
                let result = handler(behavior.as_mut(), screen);
                screen.tree.restore_behavior(id, behavior);
                result
            }
            None => fallback(screen),
        }))
    }

    // =========================================================================
    // Delivery
    // =========================================================================

    /// Deliver a button event; `ev.pos` is in `id`'s parent frame.
    pub fn send_pointer_button(&mut self, id: WidgetId, ev: &PointerButtonEvent) -> bool {
        self.route(
            id,
            |behavior, screen| behavior.pointer_button(screen, id, ev),
            |screen| screen.default_pointer_button(id, ev),
        )
        .unwrap_or(false)
    }

    pub fn send_pointer_motion(&mut self, id: WidgetId, ev: &PointerMoveEvent) -> bool {
        self.route(
            id,
            |behavior, screen| behavior.pointer_motion(screen, id, ev),
            |screen| screen.default_pointer_motion(id, ev),
        )
        .unwrap_or(false)
    }

    pub fn send_pointer_drag(&mut self, id: WidgetId, ev: &PointerMoveEvent) -> bool {
        self.route(
            id,
            |behavior, screen| behavior.pointer_drag(screen, id, ev),
            |screen| screen.default_pointer_drag(id, ev),
        )
        .unwrap_or(false)
    }

    /// Update the hover flag of `id` and tell it the pointer entered or left.
    pub fn send_pointer_enter(&mut self, id: WidgetId, p: Vector2i, entered: bool) -> bool {
        if let Some(node) = self.tree.node_mut(id) {
            node.set_hovered(entered);
        }
        self.route(
            id,
            |behavior, screen| behavior.pointer_enter(screen, id, p, entered),
            |_| false,
        )
        .unwrap_or(false)
    }

    pub fn send_scroll(&mut self, id: WidgetId, ev: &ScrollEvent) -> bool {
        self.route(
            id,
            |behavior, screen| behavior.scroll(screen, id, ev),
            |screen| screen.default_scroll(id, ev),
        )
        .unwrap_or(false)
    }

    /// Update the focus flag of `id` and notify it.
    pub fn send_focus_changed(&mut self, id: WidgetId, focused: bool) -> bool {
        if let Some(node) = self.tree.node_mut(id) {
            node.set_focused(focused);
        }
        self.route(
            id,
            |behavior, screen| behavior.focus_changed(screen, id, focused),
            |_| false,
        )
        .unwrap_or(false)
    }

    pub fn send_key(&mut self, id: WidgetId, ev: &KeyEvent) -> bool {
        self.route(id, |behavior, screen| behavior.key(screen, id, ev), |_| false)
            .unwrap_or(false)
    }

    pub fn send_char(&mut self, id: WidgetId, codepoint: char) -> bool {
        self.route(
            id,
            |behavior, screen| behavior.char(screen, id, codepoint),
            |_| false,
        )
        .unwrap_or(false)
    }

    // =========================================================================
    // Built-in handlers
    // =========================================================================

    /// Offer the event to the children of `id` front to back.
    ///
    /// An unconsumed left press focuses `id`. Windows additionally start or
    /// stop a header drag on left presses and consume them.
    pub fn default_pointer_button(&mut self, id: WidgetId, ev: &PointerButtonEvent) -> bool {
        let Some(node) = self.tree.node(id) else {
            return false;
        };
        let position = node.position();
        let local = ev.translated(position);
        let children: Vec<WidgetId> = node.children().iter().rev().copied().collect();

        for child in children {
            let hit = self.tree.node(child).is_some_and(|c| c.is_visible())
                && self.tree.contains_point(child, local.pos);
            if hit && self.send_pointer_button(child, &local) {
                return true;
            }
        }

        if ev.button == MouseButton::Left
            && ev.down
            && !self.tree.node(id).is_some_and(|n| n.is_focused())
        {
            self.request_focus(id);
        }

        if ev.button == MouseButton::Left {
            let header = self.tree.header_height(id);
            if let Some(window) = self.tree.node_mut(id).and_then(|n| n.window_data_mut()) {
                window.drag_header = window.popup.is_none()
                    && ev.down
                    && header.is_some_and(|h| ev.pos.y - position.y < h);
                return true;
            }
        }
        false
    }

    /// Offer motion to children under the pointer now or before the move,
    /// sending enter and leave notifications on the way.
    pub fn default_pointer_motion(&mut self, id: WidgetId, ev: &PointerMoveEvent) -> bool {
        let Some(node) = self.tree.node(id) else {
            return false;
        };
        let local = ev.translated(node.position());
        let children: Vec<WidgetId> = node.children().iter().rev().copied().collect();

        for child in children {
            if !self.tree.node(child).is_some_and(|c| c.is_visible()) {
                continue;
            }
            let contained = self.tree.contains_point(child, local.pos);
            let prev_contained = self.tree.contains_point(child, local.pos - local.rel);
            if contained != prev_contained {
                self.send_pointer_enter(child, ev.pos, contained);
            }
            if (contained || prev_contained) && self.send_pointer_motion(child, &local) {
                return true;
            }
        }
        false
    }

    /// Move a window whose header is being dragged, keeping it inside its
    /// parent.
    pub fn default_pointer_drag(&mut self, id: WidgetId, ev: &PointerMoveEvent) -> bool {
        if !ev.buttons.contains(MouseButton::Left) {
            return false;
        }
        let parent_size = self
            .tree
            .parent(id)
            .and_then(|p| self.tree.node(p))
            .map_or(Vector2i::ZERO, |p| p.size());
        let Some(node) = self.tree.node_mut(id) else {
            return false;
        };
        if !matches!(node.kind(), WidgetKind::Window(window) if window.drag_header) {
            return false;
        }
        let pos = (node.position() + ev.rel).max(Vector2i::ZERO);
        let pos = pos.min(parent_size - node.size());
        node.set_position(pos);
        tracing::trace!(target: targets::WINDOW, ?id, %pos, "window dragged");
        true
    }

    /// Offer a scroll to the front-most visible child under the pointer.
    pub fn default_scroll(&mut self, id: WidgetId, ev: &ScrollEvent) -> bool {
        let Some(node) = self.tree.node(id) else {
            return false;
        };
        let local = ev.translated(node.position());
        let children: Vec<WidgetId> = node.children().iter().rev().copied().collect();

        for child in children {
            let hit = self.tree.node(child).is_some_and(|c| c.is_visible())
                && self.tree.contains_point(child, local.pos);
            if hit && self.send_scroll(child, &local) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::ScreenConfig;
    use crate::widget::{KeyboardModifiers, MouseButtons, WidgetNode};

    fn setup() -> (Screen, WidgetId) {
        let mut screen = Screen::headless(&ScreenConfig::new("dispatch", (400, 300)));
        let root = screen.root();
        let window = screen
            .tree_mut()
            .insert(
                root,
                WidgetNode::window("Drag me")
                    .with_position((50, 50))
                    .with_size((100, 80)),
            )
            .unwrap();
        (screen, window)
    }

    fn press(pos: (i32, i32), down: bool) -> PointerButtonEvent {
        PointerButtonEvent {
            pos: pos.into(),
            button: MouseButton::Left,
            down,
            modifiers: KeyboardModifiers::NONE,
        }
    }

    fn drag(rel: (i32, i32)) -> PointerMoveEvent {
        PointerMoveEvent {
            pos: Vector2i::ZERO,
            rel: rel.into(),
            buttons: MouseButtons::only(MouseButton::Left),
            modifiers: KeyboardModifiers::NONE,
        }
    }

    #[test]
    fn test_header_press_arms_drag() {
        let (mut screen, window) = setup();
        assert!(screen.send_pointer_button(window, &press((60, 55), true)));
        assert!(screen.tree().node(window).unwrap().window_data().unwrap().is_dragging());

        assert!(screen.send_pointer_button(window, &press((60, 55), false)));
        assert!(!screen.tree().node(window).unwrap().window_data().unwrap().is_dragging());

        // Below the 30px header.
        screen.send_pointer_button(window, &press((60, 100), true));
        assert!(!screen.tree().node(window).unwrap().window_data().unwrap().is_dragging());
    }

    #[test]
    fn test_drag_clamps_to_parent() {
        let (mut screen, window) = setup();
        screen.send_pointer_button(window, &press((60, 55), true));

        assert!(screen.send_pointer_drag(window, &drag((10, 5))));
        assert_eq!(screen.tree().node(window).unwrap().position(), Vector2i::new(60, 55));

        screen.send_pointer_drag(window, &drag((-500, 1000)));
        assert_eq!(screen.tree().node(window).unwrap().position(), Vector2i::new(0, 220));
    }

    #[test]
    fn test_plain_widget_ignores_drag() {
        let (mut screen, window) = setup();
        let child = screen.tree_mut().add_widget(window).unwrap();
        assert!(!screen.send_pointer_drag(child, &drag((5, 5))));
    }

    #[test]
    fn test_motion_sets_hover() {
        let (mut screen, window) = setup();
        let root = screen.root();
        let ev = PointerMoveEvent {
            pos: Vector2i::new(70, 70),
            rel: Vector2i::new(30, 30),
            buttons: MouseButtons::NONE,
            modifiers: KeyboardModifiers::NONE,
        };
        screen.send_pointer_motion(root, &ev);
        assert!(screen.tree().node(window).unwrap().is_hovered());

        let ev = PointerMoveEvent {
            pos: Vector2i::new(300, 250),
            rel: Vector2i::new(230, 180),
            ..ev
        };
        screen.send_pointer_motion(root, &ev);
        assert!(!screen.tree().node(window).unwrap().is_hovered());
    }

    #[test]
    fn test_stale_widget_is_ignored() {
        let (mut screen, window) = setup();
        screen.tree_mut().destroy(window).unwrap();
        assert!(!screen.send_pointer_button(window, &press((60, 55), true)));
        assert!(!screen.send_char(window, 'x'));
    }
}
