//! The draw pass for built-in widget kinds.
//!
//! Drawing walks children in insertion order, so later siblings paint over
//! earlier ones. Everything is emitted in absolute screen coordinates.

use trellis_core::{Rect, Vector2i};

use super::node::{LabelData, WidgetKind, WidgetNode, WindowData};
use super::{WidgetId, WidgetTree};
use crate::surface::DrawSurface;

impl WidgetTree {
    /// Draw `id` and its subtree if it is visible.
    pub fn draw(&self, id: WidgetId, surface: &mut dyn DrawSurface) {
        if !self.node(id).is_some_and(|node| node.visible) {
            return;
        }
        match self.behavior_dyn(id) {
            Some(behavior) => behavior.draw(self, id, surface),
            None => self.draw_default(id, surface),
        }
    }

    /// Paint the built-in appearance of `id`, then its children.
    pub fn draw_default(&self, id: WidgetId, surface: &mut dyn DrawSurface) {
        let Some(node) = self.node(id) else {
            return;
        };
        let origin = self.absolute_position(id);
        match &node.kind {
            WidgetKind::Label(label) => paint_label(node, label, origin, surface),
            WidgetKind::Window(window) if window.popup.is_some() => paint_popup(node, origin, surface),
            WidgetKind::Window(window) => paint_window(node, window, origin, surface),
            WidgetKind::Plain => {}
        }
        self.draw_children(id, surface);
    }

    /// Draw the visible children of `id` front to back in insertion order.
    ///
    /// Children of anything but the root are clipped to their parent.
    pub fn draw_children(&self, id: WidgetId, surface: &mut dyn DrawSurface) {
        let Some(node) = self.node(id) else {
            return;
        };
        if node.children.is_empty() {
            return;
        }
        let clip = id != self.root();
        if clip {
            surface.push_clip(Rect::from_origin_size(self.absolute_position(id), node.size));
        }
        for &child in &node.children {
            self.draw(child, surface);
        }
        if clip {
            surface.pop_clip();
        }
    }
}

fn paint_label(node: &WidgetNode, label: &LabelData, origin: Vector2i, surface: &mut dyn DrawSurface) {
    if label.caption.is_empty() {
        return;
    }
    let theme = node.theme();
    let font = label.font.as_deref().unwrap_or(&theme.font_normal);
    let font_size = node.font_size();
    let color = match label.color {
        Some(color) => color,
        None if node.enabled => theme.text_color,
        None => theme.disabled_text_color,
    };

    let mut pos = origin;
    if node.fixed_size.x == 0 {
        let bounds = surface.text_bounds(font, font_size, &label.caption);
        pos.y += (node.size.y - bounds.y) / 2;
    }
    surface.draw_text(pos, font, font_size, &label.caption, color);
}

fn paint_window(node: &WidgetNode, window: &WindowData, origin: Vector2i, surface: &mut dyn DrawSurface) {
    let theme = node.theme();
    let body = Rect::from_origin_size(origin, node.size);
    let radius = theme.window_corner_radius;

    surface.fill_rounded_rect(
        body.inflate(theme.window_drop_shadow_size),
        radius * 2,
        theme.drop_shadow,
    );
    let fill = if node.focused {
        theme.window_fill_focused
    } else {
        theme.window_fill_unfocused
    };
    surface.fill_rounded_rect(body, radius, fill);

    if window.title.is_empty() {
        return;
    }
    let header_height = theme.window_header_height;
    surface.fill_rounded_rect(
        Rect::from_origin_size(origin, Vector2i::new(node.size.x, header_height)),
        radius,
        theme.window_header_top,
    );
    surface.draw_line(
        origin + Vector2i::new(0, header_height),
        origin + Vector2i::new(node.size.x, header_height),
        theme.border_dark,
    );

    let font_size = theme.window_title_font_size;
    let bounds = surface.text_bounds(&theme.font_bold, font_size, &window.title);
    let title_pos = origin + Vector2i::new((node.size.x - bounds.x) / 2, (header_height - bounds.y) / 2);
    surface.draw_text(
        title_pos + Vector2i::new(0, 1),
        &theme.font_bold,
        font_size,
        &window.title,
        theme.drop_shadow,
    );
    let title_color = if node.focused {
        theme.window_title_focused
    } else {
        theme.window_title_unfocused
    };
    surface.draw_text(title_pos, &theme.font_bold, font_size, &window.title, title_color);
}

fn paint_popup(node: &WidgetNode, origin: Vector2i, surface: &mut dyn DrawSurface) {
    let theme = node.theme();
    let body = Rect::from_origin_size(origin, node.size);
    let radius = theme.window_corner_radius;
    let anchor_height = node.popup().map_or(0, |popup| popup.anchor_height);

    surface.fill_rounded_rect(
        body.inflate(theme.window_drop_shadow_size),
        radius * 2,
        theme.drop_shadow,
    );
    surface.fill_rounded_rect(body, radius, theme.window_popup);

    // Arrow pointing back at the anchor, on the left edge.
    let tip = origin + Vector2i::new(-15, anchor_height);
    let top = origin + Vector2i::new(1, anchor_height - 15);
    let bottom = origin + Vector2i::new(1, anchor_height + 15);
    surface.draw_line(tip, top, theme.window_popup);
    surface.draw_line(top, bottom, theme.window_popup);
    surface.draw_line(bottom, tip, theme.window_popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};

    #[test]
    fn test_draw_order_is_forward() {
        let mut tree = WidgetTree::default();
        let root = tree.root();
        let first = tree
            .insert(root, WidgetNode::label("first").with_size((50, 16)))
            .unwrap();
        tree.insert(root, WidgetNode::label("second").with_size((50, 16)))
            .unwrap();
        tree.insert(root, WidgetNode::label("hidden").hidden()).unwrap();

        let mut surface = RecordingSurface::new();
        tree.draw(root, &mut surface);
        let texts: Vec<String> = surface
            .commands()
            .iter()
            .filter_map(|c| c.text().map(str::to_owned))
            .collect();
        assert_eq!(texts, vec!["first", "second"]);

        tree.node_mut(first).unwrap().set_visible(false);
        surface.clear();
        tree.draw(root, &mut surface);
        assert_eq!(surface.commands().iter().filter(|c| c.text().is_some()).count(), 1);
    }

    #[test]
    fn test_window_title_centered() {
        let mut tree = WidgetTree::default();
        let root = tree.root();
        tree.insert(
            root,
            WidgetNode::window("ab").with_position((100, 50)).with_size((200, 100)),
        )
        .unwrap();

        let mut surface = RecordingSurface::new();
        tree.draw(root, &mut surface);
        // "ab" at 18px is 18 wide and 18 high.
        let title = surface
            .commands()
            .into_iter()
            .filter_map(|c| match c {
                DrawCommand::Text { pos, text, .. } if text == "ab" => Some(pos),
                _ => None,
            })
            .last()
            .unwrap();
        assert_eq!(title, Vector2i::new(100 + 91, 50 + 6));
    }

    #[test]
    fn test_children_clipped_to_parent() {
        let mut tree = WidgetTree::default();
        let root = tree.root();
        let panel = tree
            .insert(root, WidgetNode::new().with_position((10, 10)).with_size((40, 40)))
            .unwrap();
        tree.add_label(panel, "x").unwrap();

        let mut surface = RecordingSurface::new();
        tree.draw(root, &mut surface);
        let commands = surface.commands();
        assert_eq!(commands.first(), Some(&DrawCommand::PushClip(Rect::new(10, 10, 40, 40))));
        assert_eq!(commands.last(), Some(&DrawCommand::PopClip));
    }
}
