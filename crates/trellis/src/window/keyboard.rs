//! The on-screen keyboard popup.
//!
//! A keyboard is a popup anchored to a parent window, filled with one button
//! per key. Key presses are reported through a [`KeyCallback`]; the keyboard
//! never edits text itself.
//!
//! The popup body (shadow, fill and anchor arrow) is rasterized once per size
//! on a worker thread and handed back over a single-slot channel. Until the
//! buffer arrives a vector placeholder is drawn instead.

use std::fmt;
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError, bounded};
use parking_lot::Mutex;
use trellis_core::logging::targets;
use trellis_core::{Alignment, Color, Orientation, Rect, Vector2i};

use crate::error::Result;
use crate::screen::Screen;
use crate::surface::{DrawSurface, PixelBuffer};
use crate::widget::{GridLayout, PointerButtonEvent, Widget, WidgetId, WidgetTree};

/// Width of the anchor arrow on the keyboard's left edge.
const ANCHOR_DX: i32 = 15;

/// Key set of a keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyboardType {
    /// Digits with delete and enter.
    #[default]
    Number,
    /// Digits, a dot and delete, for typing addresses.
    NumberIP,
    /// Digits, lowercase letters, space and dot.
    Full,
}

impl KeyboardType {
    /// Cells per grid row.
    fn columns(self) -> usize {
        match self {
            KeyboardType::Number | KeyboardType::NumberIP => 3,
            KeyboardType::Full => 10,
        }
    }

    /// Keys in grid order.
    pub fn keys(self) -> Vec<VirtualKey> {
        let chars = |s: &str| s.chars().map(VirtualKey::Char).collect::<Vec<_>>();
        match self {
            KeyboardType::Number => {
                let mut keys = chars("123456789");
                keys.extend([VirtualKey::Backspace, VirtualKey::Char('0'), VirtualKey::Enter]);
                keys
            }
            KeyboardType::NumberIP => {
                let mut keys = chars("123456789.0");
                keys.push(VirtualKey::Backspace);
                keys
            }
            KeyboardType::Full => {
                let mut keys = chars("1234567890qwertyuiopasdfghjkl");
                keys.push(VirtualKey::Backspace);
                keys.extend(chars("zxcvbnm ."));
                keys.push(VirtualKey::Enter);
                keys
            }
        }
    }
}

/// A key reported by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VirtualKey {
    Char(char),
    Backspace,
    Enter,
}

impl VirtualKey {
    /// Text shown on the key's button.
    pub fn caption(self) -> String {
        match self {
            VirtualKey::Char(' ') => "\u{2423}".to_owned(),
            VirtualKey::Char(c) => c.to_string(),
            VirtualKey::Backspace => "del".to_owned(),
            VirtualKey::Enter => "\u{21b5}".to_owned(),
        }
    }
}

/// Key press handler.
pub type KeyCallback = Box<dyn FnMut(&mut Screen, VirtualKey)>;

// =========================================================================
// Body texture
// =========================================================================

/// Colors and metrics the worker needs to paint the body.
#[derive(Debug, Clone, Copy)]
struct BodyStyle {
    size: Vector2i,
    shadow_size: i32,
    anchor_height: i32,
    shadow: Color,
    fill: Color,
}

impl BodyStyle {
    /// Buffer size: the body plus the shadow on every side and the arrow.
    fn buffer_size(&self) -> Vector2i {
        self.size + Vector2i::new(2 * self.shadow_size + ANCHOR_DX, 2 * self.shadow_size)
    }

    fn render(&self) -> PixelBuffer {
        let ds = self.shadow_size;
        let buffer_size = self.buffer_size();
        let mut pixels = PixelBuffer::new(buffer_size.x, buffer_size.y);
        let body = Rect::from_origin_size(Vector2i::new(ANCHOR_DX + ds, ds), self.size);

        pixels.fill_rect(body.inflate(ds), self.shadow);
        pixels.fill_rect(body, self.fill);
        let anchor_y = ds + self.anchor_height;
        for i in 0..ANCHOR_DX {
            let x = body.left() - ANCHOR_DX + i;
            for y in anchor_y - i..=anchor_y + i {
                pixels.set_pixel(x, y, self.fill);
            }
        }
        pixels
    }
}

enum BodyState {
    Idle,
    Pending {
        size: Vector2i,
        receiver: Receiver<PixelBuffer>,
    },
    Ready {
        size: Vector2i,
        buffer: PixelBuffer,
    },
    /// The worker could not be started; only the placeholder is drawn.
    Unavailable,
}

/// The rasterized popup body, rebuilt whenever the keyboard is resized.
struct BodyTexture {
    state: Mutex<BodyState>,
}

impl BodyTexture {
    fn new() -> Self {
        Self {
            state: Mutex::new(BodyState::Idle),
        }
    }

    fn is_ready(&self) -> bool {
        matches!(*self.state.lock(), BodyState::Ready { .. })
    }

    /// The finished buffer for `style.size`, starting a render if needed.
    fn poll(&self, style: BodyStyle) -> Option<PixelBuffer> {
        let mut state = self.state.lock();
        loop {
            match &*state {
                BodyState::Unavailable => return None,
                BodyState::Ready { size, buffer } if *size == style.size => return Some(buffer.clone()),
                BodyState::Pending { size, receiver } if *size == style.size => {
                    match receiver.try_recv() {
                        Ok(buffer) => {
                            tracing::debug!(target: targets::WINDOW, size = %style.size, "keyboard body ready");
                            *state = BodyState::Ready {
                                size: style.size,
                                buffer,
                            };
                        }
                        Err(TryRecvError::Empty) => return None,
                        Err(TryRecvError::Disconnected) => {
                            tracing::warn!(target: targets::WINDOW, "keyboard body worker exited without a result");
                            *state = BodyState::Unavailable;
                        }
                    }
                }
                _ => {
                    *state = Self::spawn(style);
                    if matches!(*state, BodyState::Unavailable) {
                        return None;
                    }
                }
            }
        }
    }

    fn spawn(style: BodyStyle) -> BodyState {
        let (sender, receiver) = bounded(1);
        let spawned = thread::Builder::new()
            .name("trellis-keyboard-body".into())
            .spawn(move || {
                // The keyboard may be gone by now; a closed channel is fine.
                let _ = sender.send(style.render());
            });
        match spawned {
            Ok(_) => BodyState::Pending {
                size: style.size,
                receiver,
            },
            Err(err) => {
                tracing::warn!(target: targets::WINDOW, %err, "failed to start keyboard body worker");
                BodyState::Unavailable
            }
        }
    }
}

// =========================================================================
// Keyboard
// =========================================================================

/// Keyboard behavior, attached to the popup that holds the key buttons.
pub struct Keyboard {
    kind: KeyboardType,
    callback: Option<KeyCallback>,
    body: BodyTexture,
}

impl Keyboard {
    /// Create a keyboard popup anchored to `parent_window`.
    ///
    /// The popup is added to the screen's root, sized to fit its keys and
    /// kept inside the bottom edge of the screen.
    #[tracing::instrument(skip(screen, callback), level = "debug")]
    pub fn create(
        screen: &mut Screen,
        parent_window: WidgetId,
        kind: KeyboardType,
        callback: impl FnMut(&mut Screen, VirtualKey) + 'static,
    ) -> Result<WidgetId> {
        let root = screen.root();
        let popup = screen.add_popup(root, parent_window)?;
        let tree = screen.tree_mut();
        if let Some(data) = tree.get_mut(popup)?.popup_mut() {
            data.clamp_to_screen = true;
        }
        tree.set_layout(
            popup,
            GridLayout::new(Orientation::Horizontal, kind.columns(), Alignment::Middle, 5, 5),
        )?;
        tree.set_behavior(
            popup,
            Keyboard {
                kind,
                callback: Some(Box::new(callback)),
                body: BodyTexture::new(),
            },
        )?;
        let mut digit = None;
        let mut commands = Vec::new();
        for key in kind.keys() {
            let button = tree.add_button(popup, key.caption(), move |screen, _| {
                Keyboard::press(screen, popup, key);
            })?;
            match key {
                VirtualKey::Char(c) if c.is_ascii_digit() => digit = digit.or(Some(button)),
                VirtualKey::Char(_) => {}
                VirtualKey::Backspace | VirtualKey::Enter => commands.push(button),
            }
        }
        // Command keys take the size of a digit key.
        if let Some(digit) = digit {
            let key_size = screen.preferred_size(digit)?;
            for button in commands {
                screen.tree_mut().get_mut(button)?.set_fixed_size(key_size);
            }
        }

        let size = screen.preferred_size(popup)?;
        screen.tree_mut().get_mut(popup)?.set_size(size);
        screen.perform_layout_of(popup)?;
        Ok(popup)
    }

    /// Report `key` to the callback of the keyboard `keyboard`.
    pub fn press(screen: &mut Screen, keyboard: WidgetId, key: VirtualKey) {
        let Some(mut callback) = screen
            .tree_mut()
            .behavior_mut::<Keyboard>(keyboard)
            .and_then(|k| k.callback.take())
        else {
            return;
        };
        tracing::trace!(target: targets::WINDOW, ?keyboard, ?key, "virtual key pressed");
        callback(screen, key);
        if let Some(k) = screen.tree_mut().behavior_mut::<Keyboard>(keyboard)
            && k.callback.is_none()
        {
            k.callback = Some(callback);
        }
    }

    pub fn kind(&self) -> KeyboardType {
        self.kind
    }

    /// Whether the rasterized body has arrived from the worker.
    pub fn is_body_ready(&self) -> bool {
        self.body.is_ready()
    }

    fn draw_placeholder(tree: &WidgetTree, id: WidgetId, style: &BodyStyle, surface: &mut dyn DrawSurface) {
        let theme = tree.theme(id);
        let origin = tree.absolute_position(id);
        let body = Rect::from_origin_size(origin, style.size);

        surface.fill_rounded_rect(
            body.inflate(style.shadow_size),
            theme.window_corner_radius * 2,
            style.shadow.with_alpha(64.0 / 255.0),
        );
        surface.fill_rect(body, style.fill);
        surface.stroke_rect(body.inflate(1), theme.border_dark);

        let anchor_y = origin.y + style.anchor_height;
        for i in 0..ANCHOR_DX {
            let x = origin.x - ANCHOR_DX + i;
            surface.draw_line(Vector2i::new(x, anchor_y - i), Vector2i::new(x, anchor_y + i), style.fill);
        }
    }
}

impl Widget for Keyboard {
    fn draw(&self, tree: &WidgetTree, id: WidgetId, surface: &mut dyn DrawSurface) {
        let Some(node) = tree.node(id) else {
            return;
        };
        let theme = node.theme();
        let style = BodyStyle {
            size: node.size(),
            shadow_size: theme.window_drop_shadow_size,
            anchor_height: node.popup().map_or(0, |p| p.anchor_height),
            shadow: theme.drop_shadow,
            fill: theme.window_keyboard,
        };
        if !style.size.is_zero() {
            match self.body.poll(style) {
                Some(buffer) => {
                    let pos = tree.absolute_position(id)
                        - Vector2i::new(ANCHOR_DX + style.shadow_size, style.shadow_size);
                    surface.draw_pixels(pos, &buffer);
                }
                None => Self::draw_placeholder(tree, id, &style, surface),
            }
        }
        tree.draw_children(id, surface);
    }

    /// Offer the press to every key under the pointer without consuming it.
    fn pointer_button(&mut self, screen: &mut Screen, id: WidgetId, ev: &PointerButtonEvent) -> bool {
        let Some(node) = screen.tree().node(id) else {
            return false;
        };
        let local = ev.translated(node.position());
        let children = node.children().to_vec();
        for child in children.into_iter().rev() {
            let hit = screen.tree().node(child).is_some_and(|c| c.is_visible())
                && screen.tree().contains_point(child, local.pos);
            if hit {
                screen.send_pointer_button(child, &local);
            }
        }
        false
    }
}

impl fmt::Debug for Keyboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keyboard")
            .field("kind", &self.kind)
            .field("body_ready", &self.body.is_ready())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;
    use crate::screen::{NativeWindowHandle, ScreenConfig};
    use crate::surface::{DrawCommand, RecordingSurface};
    use crate::widget::{Button, KeyboardModifiers, MouseButton, WidgetNode};

    fn setup() -> (Screen, WidgetId, Rc<RefCell<Vec<VirtualKey>>>, RecordingSurface) {
        let surface = RecordingSurface::new();
        let mut screen = Screen::new(
            NativeWindowHandle::unique(),
            &ScreenConfig::new("keyboard", (400, 300)),
            surface.clone(),
        );
        let root = screen.root();
        let window = screen.add_window(root, "Edit").unwrap();
        if let Some(node) = screen.tree_mut().node_mut(window) {
            node.set_position((10, 10));
            node.set_size((100, 60));
        }
        let pressed = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&pressed);
        let keyboard = Keyboard::create(&mut screen, window, KeyboardType::Number, move |_, key| {
            log.borrow_mut().push(key);
        })
        .unwrap();
        screen.set_popup_anchor(keyboard, (120, 40)).unwrap();
        (screen, keyboard, pressed, surface)
    }

    fn find_key(screen: &Screen, keyboard: WidgetId, caption: &str) -> WidgetId {
        screen
            .tree()
            .children(keyboard)
            .iter()
            .copied()
            .find(|&id| screen.tree().behavior::<Button>(id).map(Button::caption) == Some(caption))
            .unwrap()
    }

    #[test]
    fn test_key_sets() {
        assert_eq!(KeyboardType::Number.keys().len(), 12);
        assert_eq!(KeyboardType::NumberIP.keys().len(), 12);
        assert_eq!(KeyboardType::Full.keys().len(), 40);
        assert_eq!(KeyboardType::Number.keys()[9], VirtualKey::Backspace);
        assert_eq!(KeyboardType::NumberIP.keys()[9], VirtualKey::Char('.'));
        assert_eq!(KeyboardType::NumberIP.keys()[11], VirtualKey::Backspace);
    }

    #[test]
    fn test_command_keys_match_digit_size() {
        let (screen, keyboard, _, _) = setup();
        let tree = screen.tree();
        let zero = tree.node(find_key(&screen, keyboard, "0")).unwrap().size();
        for caption in ["del", "\u{21b5}"] {
            let key = tree.node(find_key(&screen, keyboard, caption)).unwrap();
            assert_eq!(key.fixed_size(), zero);
            assert_eq!(key.size(), zero);
        }
        // All three columns share the digit width.
        let x = |caption| tree.node(find_key(&screen, keyboard, caption)).unwrap().position().x;
        assert_eq!(x("2") - x("1"), x("3") - x("2"));
    }

    #[test]
    fn test_press_offered_front_to_back() {
        struct Tap(&'static str, Rc<RefCell<Vec<&'static str>>>);

        impl Widget for Tap {
            fn pointer_button(&mut self, _: &mut Screen, _: WidgetId, _: &PointerButtonEvent) -> bool {
                self.1.borrow_mut().push(self.0);
                true
            }
        }

        let (mut screen, keyboard, _, _) = setup();
        let taps = Rc::new(RefCell::new(Vec::new()));
        for name in ["back", "front"] {
            let tap = Tap(name, Rc::clone(&taps));
            screen
                .tree_mut()
                .insert(keyboard, WidgetNode::new().with_size((4, 4)).with_behavior(tap))
                .unwrap();
        }
        screen.draw_all();

        let origin = screen.tree().absolute_position(keyboard);
        screen.on_pointer_move(origin.x + 1, origin.y + 1);
        screen.on_pointer_button(MouseButton::Left, true, KeyboardModifiers::NONE);
        assert_eq!(*taps.borrow(), vec!["front", "back"]);
    }

    #[test]
    fn test_create_lays_out_keys() {
        let (screen, keyboard, _, _) = setup();
        let tree = screen.tree();
        assert_eq!(tree.child_count(keyboard), 12);
        assert!(tree.node(keyboard).unwrap().popup().unwrap().clamp_to_screen);
        let one = find_key(&screen, keyboard, "1");
        let two = find_key(&screen, keyboard, "2");
        let four = find_key(&screen, keyboard, "4");
        assert_eq!(tree.node(one).unwrap().position().y, tree.node(two).unwrap().position().y);
        assert!(tree.node(two).unwrap().position().x > tree.node(one).unwrap().position().x);
        assert!(tree.node(four).unwrap().position().y > tree.node(one).unwrap().position().y);
    }

    #[test]
    fn test_clicking_key_reports_it() {
        let (mut screen, keyboard, pressed, _) = setup();
        screen.draw_all();

        let five = find_key(&screen, keyboard, "5");
        let center = screen.tree().absolute_position(five) + screen.tree().node(five).unwrap().size() / 2;
        screen.on_pointer_move(center.x, center.y);
        screen.on_pointer_button(MouseButton::Left, true, KeyboardModifiers::NONE);
        screen.on_pointer_button(MouseButton::Left, false, KeyboardModifiers::NONE);

        assert_eq!(*pressed.borrow(), vec![VirtualKey::Char('5')]);
    }

    #[test]
    fn test_body_rendered_by_worker() {
        let (mut screen, keyboard, _, surface) = setup();
        screen.draw_all();

        let mut ready = false;
        for _ in 0..200 {
            surface.clear();
            screen.draw_all();
            if screen.tree().behavior::<Keyboard>(keyboard).unwrap().is_body_ready() {
                ready = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(ready);

        surface.clear();
        screen.draw_all();
        let origin = screen.tree().absolute_position(keyboard);
        let size = screen.tree().node(keyboard).unwrap().size();
        let pixels = surface
            .commands()
            .into_iter()
            .find_map(|c| match c {
                DrawCommand::Pixels { pos, size } => Some((pos, size)),
                _ => None,
            })
            .unwrap();
        assert_eq!(pixels.0, origin - Vector2i::new(25, 10));
        assert_eq!(pixels.1, size + Vector2i::new(35, 20));
    }

    #[test]
    fn test_body_buffer_has_arrow() {
        let style = BodyStyle {
            size: Vector2i::new(40, 60),
            shadow_size: 2,
            anchor_height: 30,
            shadow: Color::BLACK,
            fill: Color::WHITE,
        };
        let buffer = style.render();
        assert_eq!(buffer.size(), Vector2i::new(59, 64));
        // The arrow tip is a single pixel on the anchor row.
        assert_eq!(buffer.pixel(2, 32), Some([255, 255, 255, 255]));
        assert_eq!(buffer.pixel(2, 31), Some([0, 0, 0, 0]));
        assert_eq!(buffer.pixel(16, 19), Some([255, 255, 255, 255]));
    }
}
