//! Prelude module for Trellis.
//!
//! ```ignore
//! use trellis::prelude::*;
//! ```
//!
//! This provides access to:
//! - The screen and its configuration (`Screen`, `ScreenConfig`)
//! - The widget tree (`WidgetTree`, `WidgetNode`, `WidgetId`, `Widget`)
//! - Layouts (`BoxLayout`, `GroupLayout`, `GridLayout`, `AdvancedGridLayout`)
//! - Windows and dialogs (`Keyboard`, `MessageDialog`)
//! - Geometry types (`Vector2i`, `Rect`, `Color`)

// ============================================================================
// Screen
// ============================================================================

pub use crate::screen::{NativeWindowHandle, Screen, ScreenConfig};
pub use crate::surface::{DrawSurface, RecordingSurface};
pub use crate::theme::Theme;

// ============================================================================
// Widget Foundation
// ============================================================================

pub use crate::widget::{Button, Widget, WidgetId, WidgetKind, WidgetNode, WidgetTree};

// ============================================================================
// Layout System
// ============================================================================

pub use crate::widget::layout::{
    AdvancedGridLayout, Anchor, BoxLayout, GridLayout, GroupLayout, LayoutStrategy,
};
pub use trellis_core::{Alignment, Orientation};

// ============================================================================
// Windows
// ============================================================================

pub use crate::window::{
    DialogResponse, Keyboard, KeyboardType, MessageDialog, MessageDialogKind, VirtualKey,
};

// ============================================================================
// Geometry Types
// ============================================================================

pub use trellis_core::{Color, Rect, Vector2i};

// ============================================================================
// Event Types
// ============================================================================

pub use crate::widget::{InputEvent, KeyAction, KeyboardModifiers, MouseButton};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_types_exist() {
        let _vbox = BoxLayout::vertical();
        let _grid = GridLayout::new(Orientation::Horizontal, 3, Alignment::Middle, 5, 5);
        let _rect = Rect::new(0, 0, 100, 100);
        let _color = Color::from_rgba8(255, 255, 255, 255);
        let screen = Screen::headless(&ScreenConfig::default());
        assert_eq!(screen.size(), Vector2i::new(800, 600));
    }
}
