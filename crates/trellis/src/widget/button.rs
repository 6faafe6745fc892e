//! A push button.

use trellis_core::logging::targets;
use trellis_core::{LayoutResult, Rect, TreeResult, Vector2i};

use super::events::{MouseButton, PointerButtonEvent};
use super::traits::Widget;
use super::{WidgetId, WidgetNode, WidgetTree};
use crate::screen::Screen;
use crate::surface::DrawSurface;

/// Click handler. Receives the screen and the button's own id.
pub type ButtonCallback = Box<dyn FnMut(&mut Screen, WidgetId)>;

/// Button behavior: a caption and a click callback.
///
/// A click is a left press followed by a left release inside the button.
pub struct Button {
    caption: String,
    pushed: bool,
    callback: Option<ButtonCallback>,
}

impl Button {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            pushed: false,
            callback: None,
        }
    }

    pub fn with_callback(mut self, callback: impl FnMut(&mut Screen, WidgetId) + 'static) -> Self {
        self.callback = Some(Box::new(callback));
        self
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Whether the button is held down.
    pub fn is_pushed(&self) -> bool {
        self.pushed
    }

    pub fn set_callback(&mut self, callback: impl FnMut(&mut Screen, WidgetId) + 'static) {
        self.callback = Some(Box::new(callback));
    }
}

impl Widget for Button {
    fn preferred_size(
        &self,
        tree: &WidgetTree,
        id: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i> {
        let node = tree.get(id)?;
        let theme = node.theme();
        let font_size = node.font_size_override().unwrap_or(theme.button_font_size);
        let bounds = surface.text_bounds(&theme.font_bold, font_size, &self.caption);
        Ok(bounds + Vector2i::new(20, 10))
    }

    fn draw(&self, tree: &WidgetTree, id: WidgetId, surface: &mut dyn DrawSurface) {
        let Some(node) = tree.node(id) else {
            return;
        };
        let theme = node.theme();
        let origin = tree.absolute_position(id);
        let body = Rect::from_origin_size(origin, node.size());
        let fill = if self.pushed {
            theme.button_fill_pushed
        } else {
            theme.button_fill
        };
        surface.fill_rounded_rect(body, theme.button_corner_radius, fill);
        surface.stroke_rect(body, theme.border_dark);

        let font_size = node.font_size_override().unwrap_or(theme.button_font_size);
        let bounds = surface.text_bounds(&theme.font_bold, font_size, &self.caption);
        let pos = origin + (node.size() - bounds) / 2;
        let color = if node.is_enabled() {
            theme.text_color
        } else {
            theme.disabled_text_color
        };
        surface.draw_text(pos, &theme.font_bold, font_size, &self.caption, color);
        tree.draw_children(id, surface);
    }

    fn pointer_button(&mut self, screen: &mut Screen, id: WidgetId, ev: &PointerButtonEvent) -> bool {
        screen.default_pointer_button(id, ev);

        let enabled = screen.tree().node(id).is_some_and(|n| n.is_enabled());
        if ev.button != MouseButton::Left || !enabled {
            return false;
        }
        if ev.down {
            self.pushed = true;
        } else if self.pushed {
            self.pushed = false;
            if screen.tree().contains_point(id, ev.pos)
                && let Some(mut callback) = self.callback.take()
            {
                tracing::debug!(target: targets::SCREEN, ?id, caption = %self.caption, "button clicked");
                // Runs after dispatch so the callback may dispose the button's window.
                screen.defer(move |screen| {
                    callback(screen, id);
                    if let Some(button) = screen.tree_mut().behavior_mut::<Button>(id)
                        && button.callback.is_none()
                    {
                        button.callback = Some(callback);
                    }
                });
            }
        }
        true
    }
}

impl WidgetTree {
    /// Add a button with a click callback to `parent`.
    pub fn add_button(
        &mut self,
        parent: WidgetId,
        caption: impl Into<String>,
        callback: impl FnMut(&mut Screen, WidgetId) + 'static,
    ) -> TreeResult<WidgetId> {
        let button = Button::new(caption).with_callback(callback);
        self.insert(parent, WidgetNode::new().with_behavior(button))
    }
}
