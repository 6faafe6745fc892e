//! Raw input entry points.
//!
//! A platform backend feeds the screen through [`Screen::handle_event`] or
//! the individual `on_*` methods. Each returns whether a widget consumed the
//! input.
//!
//! # Pointer state machine
//!
//! A left press on any widget other than the root starts a drag with that
//! widget as the target. While the drag lasts, motion is delivered to the
//! target as drag events in its parent's frame. Any other button event ends
//! it; a release away from the target first sends the target a synthetic
//! release so it can reset its pressed state.
//!
//! # Modal windows
//!
//! When the outermost focused window is modal, button and scroll input with
//! the pointer outside it is dropped before any handler runs.
//!
//! # Panics
//!
//! A panic inside any handler is logged, reported to the diagnostic sink,
//! and aborts the process. The tree may be half-edited at that point, so
//! there is no state worth unwinding into.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use trellis_core::logging::{span_names, targets};
use trellis_core::{Rect, Vector2f, Vector2i};

use super::Screen;
use crate::widget::{
    InputEvent, KeyAction, KeyEvent, KeyboardModifiers, MouseButton, PointerButtonEvent,
    PointerMoveEvent, ScrollEvent, WidgetKind,
};

impl Screen {
    /// Dispatch one raw event.
    ///
    /// Ignored while event processing is off or once the screen's native
    /// window is no longer registered.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        if !self.process_events || !super::ScreenRegistry::global().contains(self.handle) {
            return false;
        }
        match event {
            InputEvent::PointerMove { x, y } => self.on_pointer_move(x, y),
            InputEvent::PointerButton {
                button,
                pressed,
                modifiers,
            } => self.on_pointer_button(button, pressed, modifiers),
            InputEvent::Scroll { dx, dy } => self.on_scroll(dx, dy),
            InputEvent::Key(ev) => self.on_key(ev.key, ev.scancode, ev.action, ev.modifiers),
            InputEvent::Char(codepoint) => self.on_char(codepoint),
            InputEvent::Resize { width, height } => {
                self.on_resize(width, height);
                true
            }
        }
    }

    pub fn on_pointer_move(&mut self, x: i32, y: i32) -> bool {
        self.guarded("pointer_move", |screen| {
            let p = Vector2i::new(x, y) - screen.pointer_offset;
            screen.last_interaction = Instant::now();
            let rel = p - screen.pointer.pos;
            let ev = PointerMoveEvent {
                pos: p,
                rel,
                buttons: screen.pointer.buttons,
                modifiers: screen.pointer.modifiers,
            };

            let mut handled = false;
            if let Some(target) = screen.drag_target {
                let origin = screen
                    .tree
                    .parent(target)
                    .map_or(Vector2i::ZERO, |parent| screen.tree.absolute_position(parent));
                handled = screen.send_pointer_drag(target, &ev.translated(origin));
            }
            if !handled {
                let root = screen.root();
                handled = screen.send_pointer_motion(root, &ev);
            }
            screen.pointer.pos = p;
            handled
        })
    }

    pub fn on_pointer_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        modifiers: KeyboardModifiers,
    ) -> bool {
        self.guarded("pointer_button", |screen| {
            screen.pointer.modifiers = modifiers;
            screen.last_interaction = Instant::now();
            if screen.blocked_by_modal() {
                tracing::trace!(target: targets::SCREEN, ?button, "button outside modal window dropped");
                return false;
            }

            if pressed {
                screen.pointer.buttons.insert(button);
            } else {
                screen.pointer.buttons.remove(button);
            }

            let pos = screen.pointer.pos;
            let root = screen.root();
            let under_pointer = screen.tree.find_at(root, pos);

            if let Some(target) = screen.drag_target
                && !pressed
                && under_pointer != Some(target)
            {
                let origin = screen
                    .tree
                    .parent(target)
                    .map_or(Vector2i::ZERO, |parent| screen.tree.absolute_position(parent));
                let release = PointerButtonEvent {
                    pos: pos - origin,
                    button,
                    down: false,
                    modifiers,
                };
                screen.send_pointer_button(target, &release);
            }

            if pressed && button == MouseButton::Left {
                screen.drag_target = under_pointer.filter(|&id| id != root);
                if screen.drag_target.is_none() {
                    screen.update_focus(None);
                }
            } else {
                screen.drag_target = None;
            }

            let ev = PointerButtonEvent {
                pos,
                button,
                down: pressed,
                modifiers,
            };
            screen.send_pointer_button(root, &ev)
        })
    }

    pub fn on_scroll(&mut self, dx: f32, dy: f32) -> bool {
        self.guarded("scroll", |screen| {
            screen.last_interaction = Instant::now();
            if screen.blocked_by_modal() {
                return false;
            }
            let ev = ScrollEvent {
                pos: screen.pointer.pos,
                delta: Vector2f::new(dx, dy),
            };
            let root = screen.root();
            screen.send_scroll(root, &ev)
        })
    }

    pub fn on_key(
        &mut self,
        key: i32,
        scancode: i32,
        action: KeyAction,
        modifiers: KeyboardModifiers,
    ) -> bool {
        self.guarded("key", |screen| {
            screen.last_interaction = Instant::now();
            screen.pointer.modifiers = modifiers;
            let ev = KeyEvent {
                key,
                scancode,
                action,
                modifiers,
            };
            let path = screen.focus_path.clone();
            path.into_iter().any(|id| {
                screen.tree.node(id).is_some_and(|n| n.is_focused()) && screen.send_key(id, &ev)
            })
        })
    }

    pub fn on_char(&mut self, codepoint: char) -> bool {
        self.guarded("char", |screen| {
            screen.last_interaction = Instant::now();
            let path = screen.focus_path.clone();
            path.into_iter().any(|id| {
                screen.tree.node(id).is_some_and(|n| n.is_focused())
                    && screen.send_char(id, codepoint)
            })
        })
    }

    /// The native surface changed size.
    pub fn on_resize(&mut self, width: i32, height: i32) {
        let size = Vector2i::new(width, height);
        let root = self.root();
        if let Some(node) = self.tree.node_mut(root) {
            node.set_size(size);
        }
        self.last_interaction = Instant::now();
        tracing::debug!(target: targets::SCREEN, %size, "screen resized");
        if let Some(callback) = self.resize_callback.as_mut() {
            callback(size);
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Whether the outermost focused window is modal and the pointer is
    /// outside it.
    fn blocked_by_modal(&self) -> bool {
        let Some(&top) = self.focus_path.last() else {
            return false;
        };
        let Some(node) = self.tree.node(top) else {
            return false;
        };
        if !matches!(node.kind(), WidgetKind::Window(window) if window.modal) {
            return false;
        }
        let bounds = Rect::from_origin_size(self.tree.absolute_position(top), node.size());
        !bounds.contains(self.pointer.pos)
    }

    /// Run one top-level dispatch, aborting the process if a handler panics.
    fn guarded<R>(&mut self, event: &'static str, f: impl FnOnce(&mut Self) -> R) -> R {
        let span = tracing::trace_span!(target: "trellis::screen", span_names::DISPATCH, event);
        let _entered = span.enter();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.dispatching(f)));
        match outcome {
            Ok(result) => result,
            Err(payload) => {
                let message = format!("handler panicked during {event}: {}", panic_message(&*payload));
                tracing::error!(target: targets::SCREEN, handle = ?self.handle, "{message}");
                if let Some(sink) = self.diagnostic_sink.as_ref() {
                    sink(&message);
                }
                std::process::abort();
            }
        }
    }
}

/// Text of a panic payload, when it carries one.
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
