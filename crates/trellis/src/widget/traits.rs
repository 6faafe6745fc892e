//! The widget behavior trait.
//!
//! Built-in kinds (plain widgets, labels, windows, popups) get their
//! behavior from the tree and the screen. Anything else, such as buttons,
//! the on-screen keyboard or application widgets, attaches a boxed
//! [`Widget`] to its node and overrides the hooks it cares about. Every hook
//! has a default that forwards to the built-in behavior, so an override can
//! call the default and then add to it.
//!
//! # Dispatch
//!
//! While a hook runs, the behavior is temporarily detached from its node so
//! the hook can receive `&mut Screen` and edit the tree freely, including
//! removing its own widget. Pointer positions are in the receiving widget's
//! parent coordinates; use `p - position` to get local coordinates.

use std::any::Any;

use trellis_core::{LayoutResult, Vector2i};

use super::events::{KeyEvent, PointerButtonEvent, PointerMoveEvent, ScrollEvent};
use super::{WidgetId, WidgetTree};
use crate::screen::Screen;
use crate::surface::DrawSurface;

/// Custom behavior attached to a widget node.
///
/// Event hooks return `true` when the event was consumed.
///
/// # Example
///
/// ```ignore
/// struct ClickCounter(u32);
///
/// impl Widget for ClickCounter {
///     fn pointer_button(&mut self, screen: &mut Screen, id: WidgetId, ev: &PointerButtonEvent) -> bool {
///         if ev.down {
///             self.0 += 1;
///         }
///         screen.default_pointer_button(id, ev)
///     }
/// }
/// ```
pub trait Widget: Any {
    // =========================================================================
    // Layout and drawing
    // =========================================================================

    /// Preferred size of the widget.
    fn preferred_size(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i> {
        tree.default_preferred_size(id, surface)
    }

    /// Draw the widget and its children.
    ///
    /// Only called for visible widgets.
    fn draw(&self, tree: &WidgetTree, id: WidgetId, surface: &mut dyn DrawSurface) {
        tree.draw_default(id, surface);
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    fn pointer_button(
        &mut self,
        screen: &mut Screen,
        id: WidgetId,
        ev: &PointerButtonEvent,
    ) -> bool {
        screen.default_pointer_button(id, ev)
    }

    fn pointer_motion(&mut self, screen: &mut Screen, id: WidgetId, ev: &PointerMoveEvent) -> bool {
        screen.default_pointer_motion(id, ev)
    }

    /// Pointer motion while this widget is the drag target.
    fn pointer_drag(&mut self, screen: &mut Screen, id: WidgetId, ev: &PointerMoveEvent) -> bool {
        screen.default_pointer_drag(id, ev)
    }

    /// The pointer entered or left the widget.
    ///
    /// The hover flag has already been updated when this runs.
    fn pointer_enter(&mut self, screen: &mut Screen, id: WidgetId, p: Vector2i, entered: bool) -> bool {
        let _ = (screen, id, p, entered);
        false
    }

    fn scroll(&mut self, screen: &mut Screen, id: WidgetId, ev: &ScrollEvent) -> bool {
        screen.default_scroll(id, ev)
    }

    // =========================================================================
    // Focus and keyboard
    // =========================================================================

    /// The widget joined or left the focus path.
    ///
    /// The focus flag has already been updated when this runs.
    fn focus_changed(&mut self, screen: &mut Screen, id: WidgetId, focused: bool) -> bool {
        let _ = (screen, id, focused);
        false
    }

    fn key(&mut self, screen: &mut Screen, id: WidgetId, ev: &KeyEvent) -> bool {
        let _ = (screen, id, ev);
        false
    }

    fn char(&mut self, screen: &mut Screen, id: WidgetId, codepoint: char) -> bool {
        let _ = (screen, id, codepoint);
        false
    }
}
