//! Preferred-size queries and the layout pass.

use trellis_core::logging::targets;
use trellis_core::{LayoutResult, Vector2i};

use super::layout::Layout;
use super::node::{LabelData, WidgetKind, WidgetNode};
use super::{WidgetId, WidgetTree};
use crate::surface::DrawSurface;

impl WidgetTree {
    /// Preferred size of `id`, honoring any behavior override.
    pub fn preferred_size(&self, id: WidgetId, surface: &dyn DrawSurface) -> LayoutResult<Vector2i> {
        match self.behavior_dyn(id) {
            Some(behavior) => behavior.preferred_size(self, id, surface),
            None => self.default_preferred_size(id, surface),
        }
    }

    /// Preferred size from the widget's kind, layout strategy or current size.
    pub fn default_preferred_size(
        &self,
        id: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i> {
        let node = self.get(id)?;
        match &node.kind {
            WidgetKind::Label(label) => Ok(label_preferred_size(node, label, surface)),
            WidgetKind::Window(window) => {
                let base = self.container_preferred_size(id, node, surface)?;
                let theme = node.theme();
                let title = surface.text_bounds(
                    &theme.font_bold,
                    theme.window_title_font_size,
                    &window.title,
                );
                Ok(base.max(Vector2i::new(title.x + 20, title.y)))
            }
            WidgetKind::Plain => self.container_preferred_size(id, node, surface),
        }
    }

    fn container_preferred_size(
        &self,
        id: WidgetId,
        node: &WidgetNode,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i> {
        match &node.layout {
            Some(layout) => layout.preferred_size(self, id, surface),
            None => Ok(node.size),
        }
    }

    /// The size a layout should give `id`: fixed where set, preferred elsewhere.
    pub fn target_size(&self, id: WidgetId, surface: &dyn DrawSurface) -> LayoutResult<Vector2i> {
        let fixed = self.get(id)?.fixed_size;
        if fixed.x != 0 && fixed.y != 0 {
            return Ok(fixed);
        }
        Ok(fixed.or_fallback(self.preferred_size(id, surface)?))
    }

    /// Lay out the children of `id` and recurse into them.
    pub fn perform_layout(&mut self, id: WidgetId, surface: &dyn DrawSurface) -> LayoutResult<()> {
        if let Some(layout) = self.layout_arc(id) {
            return layout.perform_layout(self, id, surface);
        }

        let node = self.get(id)?;
        let children = node.children.clone();
        if node.popup().is_some() && children.len() == 1 {
            let size = node.size;
            let child = children[0];
            let child_node = self.get_mut(child)?;
            child_node.position = Vector2i::ZERO;
            child_node.size = size;
            return self.perform_layout(child, surface);
        }

        for child in children {
            if !self.get(child)?.visible {
                continue;
            }
            let size = self.target_size(child, surface)?;
            tracing::trace!(target: targets::LAYOUT, ?child, %size, "sized child");
            self.get_mut(child)?.size = size;
            self.perform_layout(child, surface)?;
        }
        Ok(())
    }
}

fn label_preferred_size(node: &WidgetNode, label: &LabelData, surface: &dyn DrawSurface) -> Vector2i {
    if label.caption.is_empty() {
        return Vector2i::ZERO;
    }
    let theme = node.theme();
    let font = label.font.as_deref().unwrap_or(&theme.font_normal);
    let font_size = node.font_size();
    let bounds = surface.text_bounds(font, font_size, &label.caption);
    if node.fixed_size.x > 0 {
        Vector2i::new(node.fixed_size.x, bounds.y)
    } else {
        Vector2i::new(bounds.x, font_size)
    }
}
