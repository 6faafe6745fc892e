//! Per-widget state stored in the tree arena.
//!
//! A [`WidgetNode`] holds everything the tree, the layouts and the screen
//! need to know about one widget: structure links, geometry, flags, an
//! optional layout strategy, the shared theme, and the built-in
//! [`WidgetKind`]. Custom behavior is attached as a boxed [`Widget`].
//!
//! Structure links (`parent`, `children`) are only changed through
//! [`WidgetTree`](super::WidgetTree), which keeps both directions consistent.

use std::fmt;
use std::sync::Arc;

use trellis_core::{Color, Vector2i};

use super::WidgetId;
use super::layout::LayoutStrategy;
use super::traits::Widget;
use crate::theme::Theme;

/// Caption and font of a text label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelData {
    pub caption: String,
    /// Font name; the theme's regular font when `None`.
    pub font: Option<String>,
    /// Text color; the theme's text color when `None`.
    pub color: Option<Color>,
}

/// Placement data for a popup anchored to a parent window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupData {
    /// The window the popup is attached to.
    pub parent_window: WidgetId,
    /// Anchor point relative to the parent window's position.
    pub anchor_pos: Vector2i,
    /// Vertical distance from the popup's top edge to the anchor point.
    pub anchor_height: i32,
    /// Keep the popup's bottom edge inside the screen.
    pub clamp_to_screen: bool,
}

/// Title, modality and drag state of a window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowData {
    pub title: String,
    pub modal: bool,
    /// Set while a left press that started in the header is held.
    pub(crate) drag_header: bool,
    /// Present when the window is a popup.
    pub popup: Option<PopupData>,
}

impl WindowData {
    /// Whether the window is currently being dragged by its header.
    pub fn is_dragging(&self) -> bool {
        self.drag_header
    }
}

/// The built-in variant of a widget.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WidgetKind {
    /// A plain container.
    #[default]
    Plain,
    /// A single line of text.
    Label(LabelData),
    /// A top-level window or popup.
    Window(WindowData),
}

impl WidgetKind {
    /// Short name used in tree dumps and traces.
    pub fn name(&self) -> &'static str {
        match self {
            WidgetKind::Plain => "Widget",
            WidgetKind::Label(_) => "Label",
            WidgetKind::Window(WindowData { popup: Some(_), .. }) => "Popup",
            WidgetKind::Window(_) => "Window",
        }
    }
}

/// A node in the widget tree.
pub struct WidgetNode {
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,
    pub(crate) position: Vector2i,
    pub(crate) size: Vector2i,
    pub(crate) fixed_size: Vector2i,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    pub(crate) focused: bool,
    pub(crate) mouse_hover: bool,
    pub(crate) layout: Option<Arc<LayoutStrategy>>,
    pub(crate) theme: Option<Arc<Theme>>,
    pub(crate) id: Option<String>,
    pub(crate) tooltip: Option<String>,
    pub(crate) font_size: Option<i32>,
    pub(crate) kind: WidgetKind,
    pub(crate) behavior: Option<Box<dyn Widget>>,
}

impl Default for WidgetNode {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetNode {
    /// Create a visible, enabled plain widget with zero geometry.
    pub fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            position: Vector2i::ZERO,
            size: Vector2i::ZERO,
            fixed_size: Vector2i::ZERO,
            visible: true,
            enabled: true,
            focused: false,
            mouse_hover: false,
            layout: None,
            theme: None,
            id: None,
            tooltip: None,
            font_size: None,
            kind: WidgetKind::Plain,
            behavior: None,
        }
    }

    /// Create a text label.
    pub fn label(caption: impl Into<String>) -> Self {
        Self::new().with_kind(WidgetKind::Label(LabelData {
            caption: caption.into(),
            font: None,
            color: None,
        }))
    }

    /// Create a window. An empty title means the window has no header.
    pub fn window(title: impl Into<String>) -> Self {
        Self::new().with_kind(WidgetKind::Window(WindowData {
            title: title.into(),
            modal: false,
            drag_header: false,
            popup: None,
        }))
    }

    // =========================================================================
    // Builder
    // =========================================================================

    pub fn with_kind(mut self, kind: WidgetKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_position(mut self, position: impl Into<Vector2i>) -> Self {
        self.position = position.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<Vector2i>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_fixed_size(mut self, fixed_size: impl Into<Vector2i>) -> Self {
        self.fixed_size = fixed_size.into();
        self
    }

    pub fn with_layout(mut self, layout: impl Into<LayoutStrategy>) -> Self {
        self.layout = Some(Arc::new(layout.into()));
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn with_font_size(mut self, font_size: i32) -> Self {
        self.font_size = Some(font_size);
        self
    }

    /// Set the font of a label. Other kinds ignore it.
    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        if let WidgetKind::Label(label) = &mut self.kind {
            label.font = Some(font.into());
        }
        self
    }

    pub fn with_behavior(mut self, behavior: impl Widget) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark a window as modal. Has no effect on other kinds.
    pub fn modal(mut self) -> Self {
        if let WidgetKind::Window(window) = &mut self.kind {
            window.modal = true;
        }
        self
    }

    // =========================================================================
    // Structure
    // =========================================================================

    #[inline]
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// Children in z-order, back to front.
    #[inline]
    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Position relative to the parent.
    #[inline]
    pub fn position(&self) -> Vector2i {
        self.position
    }

    pub fn set_position(&mut self, position: impl Into<Vector2i>) {
        self.position = position.into();
    }

    #[inline]
    pub fn size(&self) -> Vector2i {
        self.size
    }

    pub fn set_size(&mut self, size: impl Into<Vector2i>) {
        self.size = size.into();
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.size.y
    }

    /// Per-axis fixed size; zero components are unconstrained.
    #[inline]
    pub fn fixed_size(&self) -> Vector2i {
        self.fixed_size
    }

    pub fn set_fixed_size(&mut self, fixed_size: impl Into<Vector2i>) {
        self.fixed_size = fixed_size.into();
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// The widget's own visibility flag, ignoring ancestors.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the widget is on the screen's focus path.
    #[inline]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Whether the pointer is currently inside the widget.
    #[inline]
    pub fn is_hovered(&self) -> bool {
        self.mouse_hover
    }

    pub(crate) fn set_hovered(&mut self, hovered: bool) {
        self.mouse_hover = hovered;
    }

    // =========================================================================
    // Identity and text
    // =========================================================================

    /// The string id used by `find_by_id`.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn set_tooltip(&mut self, tooltip: impl Into<String>) {
        self.tooltip = Some(tooltip.into());
    }

    /// Explicit font size, if one was set.
    pub fn font_size_override(&self) -> Option<i32> {
        self.font_size
    }

    pub fn set_font_size(&mut self, font_size: i32) {
        self.font_size = Some(font_size);
    }

    /// Font size to use: the explicit one, else the theme's standard size.
    pub fn font_size(&self) -> i32 {
        self.font_size.unwrap_or_else(|| self.theme().standard_font_size)
    }

    // =========================================================================
    // Theme, layout and kind
    // =========================================================================

    /// The theme this widget draws with.
    ///
    /// Detached widgets that never received a theme use the default one.
    pub fn theme(&self) -> Arc<Theme> {
        match &self.theme {
            Some(theme) => Arc::clone(theme),
            None => Arc::new(Theme::default()),
        }
    }

    pub fn layout(&self) -> Option<&LayoutStrategy> {
        self.layout.as_deref()
    }

    #[inline]
    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    #[inline]
    pub fn kind_mut(&mut self) -> &mut WidgetKind {
        &mut self.kind
    }

    /// Window data, if this node is a window or popup.
    pub fn window_data(&self) -> Option<&WindowData> {
        match &self.kind {
            WidgetKind::Window(window) => Some(window),
            _ => None,
        }
    }

    pub fn window_data_mut(&mut self) -> Option<&mut WindowData> {
        match &mut self.kind {
            WidgetKind::Window(window) => Some(window),
            _ => None,
        }
    }

    /// Popup data, if this node is a popup.
    pub fn popup(&self) -> Option<&PopupData> {
        self.window_data().and_then(|w| w.popup.as_ref())
    }

    pub fn popup_mut(&mut self) -> Option<&mut PopupData> {
        self.window_data_mut().and_then(|w| w.popup.as_mut())
    }

    /// Whether a behavior object is attached (and not currently dispatching).
    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }
}

impl fmt::Debug for WidgetNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetNode")
            .field("kind", &self.kind.name())
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("children", &self.children.len())
            .field("position", &self.position)
            .field("size", &self.size)
            .field("fixed_size", &self.fixed_size)
            .field("visible", &self.visible)
            .field("focused", &self.focused)
            .field("layout", &self.layout.is_some())
            .field("behavior", &self.behavior.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let node = WidgetNode::new()
            .with_position((4, 5))
            .with_fixed_size((0, 20))
            .with_id("panel");
        assert!(node.is_visible());
        assert!(node.is_enabled());
        assert!(!node.is_focused());
        assert_eq!(node.position(), Vector2i::new(4, 5));
        assert_eq!(node.fixed_size(), Vector2i::new(0, 20));
        assert_eq!(node.id(), Some("panel"));
        assert_eq!(node.kind().name(), "Widget");
    }

    #[test]
    fn test_modal_only_applies_to_windows() {
        let window = WidgetNode::window("Settings").modal();
        assert!(window.window_data().is_some_and(|w| w.modal));
        let plain = WidgetNode::new().modal();
        assert!(plain.window_data().is_none());
    }

    #[test]
    fn test_font_size_falls_back_to_theme() {
        let node = WidgetNode::label("x");
        assert_eq!(node.font_size(), Theme::default().standard_font_size);
        assert_eq!(node.with_font_size(50).font_size(), 50);
    }
}
