//! Input event types.
//!
//! The platform layer feeds raw input into a `Screen` as [`InputEvent`]s or
//! through the `on_*` entry points. The screen turns them into the
//! per-widget events below, translating positions into the receiving
//! widget's parent coordinate space on the way down the tree.

use trellis_core::{Vector2f, Vector2i};

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.control || self.alt || self.meta
    }
}

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Primary button (usually left).
    Left = 0,
    /// Secondary button (usually right).
    Right = 1,
    /// Middle button (scroll wheel click).
    Middle = 2,
    /// Additional button 1 (e.g., browser back).
    Button4 = 3,
    /// Additional button 2 (e.g., browser forward).
    Button5 = 4,
}

impl MouseButton {
    /// The bit this button occupies in a [`MouseButtons`] mask.
    #[inline]
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// The set of currently held mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MouseButtons(u8);

impl MouseButtons {
    /// No buttons held.
    pub const NONE: Self = Self(0);

    /// Create a mask holding exactly `button`.
    pub fn only(button: MouseButton) -> Self {
        Self(button.bit())
    }

    #[inline]
    pub fn contains(self, button: MouseButton) -> bool {
        self.0 & button.bit() != 0
    }

    #[inline]
    pub fn insert(&mut self, button: MouseButton) {
        self.0 |= button.bit();
    }

    #[inline]
    pub fn remove(&mut self, button: MouseButton) {
        self.0 &= !button.bit();
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The raw bitmask.
    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }
}

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

// =========================================================================
// Per-widget events
// =========================================================================

/// A button press or release at `pos`, in the receiver's parent coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerButtonEvent {
    pub pos: Vector2i,
    pub button: MouseButton,
    pub down: bool,
    pub modifiers: KeyboardModifiers,
}

impl PointerButtonEvent {
    /// The same event shifted by `-offset`.
    pub fn translated(&self, offset: Vector2i) -> Self {
        Self {
            pos: self.pos - offset,
            ..*self
        }
    }
}

/// Pointer motion, also used for drags.
///
/// `rel` is the movement since the previous event; `buttons` is the set held
/// during the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerMoveEvent {
    pub pos: Vector2i,
    pub rel: Vector2i,
    pub buttons: MouseButtons,
    pub modifiers: KeyboardModifiers,
}

impl PointerMoveEvent {
    /// The same event shifted by `-offset`.
    pub fn translated(&self, offset: Vector2i) -> Self {
        Self {
            pos: self.pos - offset,
            ..*self
        }
    }
}

/// A scroll wheel or trackpad scroll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub pos: Vector2i,
    pub delta: Vector2f,
}

impl ScrollEvent {
    /// The same event shifted by `-offset`.
    pub fn translated(&self, offset: Vector2i) -> Self {
        Self {
            pos: self.pos - offset,
            ..*self
        }
    }
}

/// A physical key event. Key and scancode values are backend-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: i32,
    pub scancode: i32,
    pub action: KeyAction,
    pub modifiers: KeyboardModifiers,
}

// =========================================================================
// Raw input
// =========================================================================

/// Raw input as delivered by a platform backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The pointer moved to an absolute screen position.
    PointerMove { x: i32, y: i32 },
    /// A mouse button changed state.
    PointerButton {
        button: MouseButton,
        pressed: bool,
        modifiers: KeyboardModifiers,
    },
    /// A scroll at the current pointer position.
    Scroll { dx: f32, dy: f32 },
    /// A key changed state.
    Key(KeyEvent),
    /// A unicode character was typed.
    Char(char),
    /// The native surface was resized.
    Resize { width: i32, height: i32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_mask() {
        let mut buttons = MouseButtons::NONE;
        buttons.insert(MouseButton::Left);
        buttons.insert(MouseButton::Middle);
        assert!(buttons.contains(MouseButton::Left));
        assert!(!buttons.contains(MouseButton::Right));
        buttons.remove(MouseButton::Left);
        assert_eq!(buttons, MouseButtons::only(MouseButton::Middle));
        buttons.remove(MouseButton::Middle);
        assert!(buttons.is_empty());
    }

    #[test]
    fn test_translated_events() {
        let ev = PointerButtonEvent {
            pos: Vector2i::new(50, 40),
            button: MouseButton::Left,
            down: true,
            modifiers: KeyboardModifiers::SHIFT,
        };
        let local = ev.translated(Vector2i::new(20, 10));
        assert_eq!(local.pos, Vector2i::new(30, 30));
        assert!(local.modifiers.any());
    }
}
