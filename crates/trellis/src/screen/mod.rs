//! The root surface.
//!
//! A [`Screen`] owns one [`WidgetTree`] and the [`DrawSurface`] it renders
//! to. It stands for one top-level native window: it turns raw input into
//! widget events, tracks which widgets hold focus, runs the layout and draw
//! passes, and keeps itself listed in the [`ScreenRegistry`] while alive.
//!
//! # Example
//!
//! ```ignore
//! use trellis::screen::{Screen, ScreenConfig};
//!
//! let mut screen = Screen::headless(&ScreenConfig::new("Demo", (800, 600)));
//! let window = screen.add_window(screen.root(), "Settings")?;
//! screen.tree_mut().add_label(window, "Volume")?;
//! screen.perform_layout()?;
//!
//! screen.on_pointer_move(120, 80);
//! screen.draw_all();
//! ```

mod config;
mod dispatch;
mod focus;
mod registry;
mod routing;

use std::sync::Arc;
use std::time::{Duration, Instant};

use trellis_core::logging::span_names;
use trellis_core::{LayoutResult, PerfSpan, Rect, Vector2i};

pub use config::ScreenConfig;
pub use registry::{NativeWindowHandle, RegistryEntry, ScreenRegistry};

use crate::surface::{DrawSurface, RecordingSurface};
use crate::theme::Theme;
use crate::widget::{KeyboardModifiers, MouseButtons, WidgetId, WidgetTree};

/// Work queued during a dispatch and run once the outermost dispatch returns.
type DeferredAction = Box<dyn FnOnce(&mut Screen)>;

/// Called with the new size after the native surface was resized.
pub type ResizeCallback = Box<dyn FnMut(Vector2i)>;

/// Receives a description of a handler panic before the process aborts.
pub type DiagnosticSink = Box<dyn Fn(&str)>;

/// Last known pointer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointerState {
    /// Position in screen coordinates, after the calibration offset.
    pub pos: Vector2i,
    pub buttons: MouseButtons,
    pub modifiers: KeyboardModifiers,
}

/// The root of a widget hierarchy, bound to one native window.
pub struct Screen {
    pub(crate) tree: WidgetTree,
    surface: Box<dyn DrawSurface>,
    handle: NativeWindowHandle,
    caption: String,
    /// Focused widgets from the leaf up to, excluding, the root.
    pub(crate) focus_path: Vec<WidgetId>,
    pub(crate) drag_target: Option<WidgetId>,
    pointer: PointerState,
    pointer_offset: Vector2i,
    last_interaction: Instant,
    tooltip_delay: Duration,
    process_events: bool,
    dispatch_depth: usize,
    deferred: Vec<DeferredAction>,
    /// Focus target requested during the current dispatch.
    pending_focus: Option<WidgetId>,
    resize_callback: Option<ResizeCallback>,
    diagnostic_sink: Option<DiagnosticSink>,
}

impl Screen {
    /// Create a screen for `handle` drawing to `surface`, and register it.
    pub fn new(
        handle: NativeWindowHandle,
        config: &ScreenConfig,
        surface: impl DrawSurface + 'static,
    ) -> Self {
        let mut tree = WidgetTree::new(Arc::new(Theme::default()));
        let root = tree.root();
        if let Some(node) = tree.node_mut(root) {
            node.set_size(config.size);
        }

        ScreenRegistry::global().register(
            handle,
            RegistryEntry {
                caption: config.caption.clone(),
            },
        );

        Self {
            tree,
            surface: Box::new(surface),
            handle,
            caption: config.caption.clone(),
            focus_path: Vec::new(),
            drag_target: None,
            pointer: PointerState::default(),
            pointer_offset: config.pointer_offset,
            last_interaction: Instant::now(),
            tooltip_delay: config.tooltip_delay(),
            process_events: config.process_events,
            dispatch_depth: 0,
            deferred: Vec::new(),
            pending_focus: None,
            resize_callback: None,
            diagnostic_sink: None,
        }
    }

    /// A screen with a fresh handle that records draw commands.
    pub fn headless(config: &ScreenConfig) -> Self {
        Self::new(NativeWindowHandle::unique(), config, RecordingSurface::new())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    #[inline]
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    /// The root widget, covering the whole surface.
    #[inline]
    pub fn root(&self) -> WidgetId {
        self.tree.root()
    }

    pub fn surface(&self) -> &dyn DrawSurface {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> &mut dyn DrawSurface {
        self.surface.as_mut()
    }

    pub fn handle(&self) -> NativeWindowHandle {
        self.handle
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    /// Size of the root widget.
    pub fn size(&self) -> Vector2i {
        self.tree.node(self.root()).map_or(Vector2i::ZERO, |n| n.size())
    }

    /// Replace the theme of the whole tree.
    pub fn set_theme(&mut self, theme: Arc<Theme>) {
        let root = self.root();
        self.tree.set_theme(root, theme);
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Position of the pointer in screen coordinates.
    pub fn pointer_position(&self) -> Vector2i {
        self.pointer.pos
    }

    pub fn pointer_offset(&self) -> Vector2i {
        self.pointer_offset
    }

    /// Calibration subtracted from raw pointer positions.
    pub fn set_pointer_offset(&mut self, offset: Vector2i) {
        self.pointer_offset = offset;
    }

    /// The widget receiving drag events, if a drag is active.
    pub fn drag_target(&self) -> Option<WidgetId> {
        self.drag_target
    }

    pub fn is_dragging(&self) -> bool {
        self.drag_target.is_some()
    }

    pub fn last_interaction(&self) -> Instant {
        self.last_interaction
    }

    pub fn tooltip_delay(&self) -> Duration {
        self.tooltip_delay
    }

    pub fn set_tooltip_delay(&mut self, delay: Duration) {
        self.tooltip_delay = delay;
    }

    pub fn process_events(&self) -> bool {
        self.process_events
    }

    /// Turn raw input dispatch on or off.
    pub fn set_process_events(&mut self, enabled: bool) {
        self.process_events = enabled;
    }

    pub fn set_resize_callback(&mut self, callback: impl FnMut(Vector2i) + 'static) {
        self.resize_callback = Some(Box::new(callback));
    }

    /// Install a sink that hears about handler panics before the abort.
    pub fn set_diagnostic_sink(&mut self, sink: impl Fn(&str) + 'static) {
        self.diagnostic_sink = Some(Box::new(sink));
    }

    /// Whether `id` is part of the focus path.
    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.focus_path.contains(&id)
    }

    // =========================================================================
    // Passes
    // =========================================================================

    /// Lay out the whole tree.
    pub fn perform_layout(&mut self) -> LayoutResult<()> {
        let _span = PerfSpan::new("perform_layout");
        let root = self.root();
        self.tree.perform_layout(root, self.surface.as_ref())
    }

    /// Lay out one subtree.
    pub fn perform_layout_of(&mut self, id: WidgetId) -> LayoutResult<()> {
        self.tree.perform_layout(id, self.surface.as_ref())
    }

    /// Preferred size of `id` as measured on this screen's surface.
    pub fn preferred_size(&self, id: WidgetId) -> LayoutResult<Vector2i> {
        self.tree.preferred_size(id, self.surface.as_ref())
    }

    /// Draw the tree and, after the idle delay, the hovered widget's tooltip.
    pub fn draw_all(&mut self) {
        self.draw_all_at(Instant::now());
    }

    /// [`draw_all`](Self::draw_all) with an explicit clock reading.
    pub fn draw_all_at(&mut self, now: Instant) {
        let _perf = PerfSpan::new("draw_all");
        let _span = tracing::trace_span!(target: "trellis::screen", span_names::DRAW, handle = ?self.handle).entered();
        self.refresh_popups();

        let root = self.root();
        self.tree.draw(root, self.surface.as_mut());

        let elapsed = now.saturating_duration_since(self.last_interaction);
        if elapsed > self.tooltip_delay {
            let over = (elapsed - self.tooltip_delay).as_secs_f32();
            self.draw_tooltip((2.0 * over).min(1.0) * 0.8);
        }
    }

    fn draw_tooltip(&mut self, alpha: f32) {
        let root = self.root();
        let Some(widget) = self.tree.find_at(root, self.pointer.pos) else {
            return;
        };
        let Some(node) = self.tree.node(widget) else {
            return;
        };
        let Some(text) = node.tooltip().filter(|t| !t.is_empty()) else {
            return;
        };

        let theme = node.theme();
        let size = node.size();
        let bounds = self
            .surface
            .text_bounds(&theme.font_normal, theme.tooltip_font_size, text);
        let half = bounds.x / 2;
        let pos = self.tree.absolute_position(widget) + Vector2i::new(size.x / 2, size.y + 10);

        let background = theme.tooltip_background;
        let background = background.with_alpha(background.a * alpha);
        let body = Rect::new(pos.x - half - 4, pos.y - 4, bounds.x + 8, bounds.y + 8);
        self.surface.fill_rounded_rect(body, 3, background);

        let tip = Vector2i::new(pos.x, pos.y - 10);
        self.surface.draw_line(tip, Vector2i::new(pos.x + 7, pos.y + 1), background);
        self.surface.draw_line(tip, Vector2i::new(pos.x - 7, pos.y + 1), background);

        let color = theme.tooltip_text;
        let color = color.with_alpha(color.a * alpha);
        self.surface.draw_text(
            Vector2i::new(pos.x - half, pos.y),
            &theme.font_normal,
            theme.tooltip_font_size,
            text,
            color,
        );
    }

    // =========================================================================
    // Deferred work
    // =========================================================================

    /// Whether an event handler is running.
    pub fn is_dispatching(&self) -> bool {
        self.dispatch_depth > 0
    }

    /// Run `action` once the current dispatch has fully returned, or right
    /// away when no dispatch is active.
    pub fn defer(&mut self, action: impl FnOnce(&mut Screen) + 'static) {
        if self.dispatch_depth > 0 {
            self.deferred.push(Box::new(action));
        } else {
            self.dispatching(action);
        }
    }

    /// Run `f` as part of a dispatch; queued work runs when the outermost
    /// dispatch returns.
    pub(crate) fn dispatching<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.dispatch_depth += 1;
        let result = f(self);
        if self.dispatch_depth == 1 {
            while !self.deferred.is_empty() {
                let queued = std::mem::take(&mut self.deferred);
                for action in queued {
                    action(self);
                }
            }
        }
        self.dispatch_depth -= 1;
        result
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        ScreenRegistry::global().unregister(self.handle);
    }
}

impl std::fmt::Debug for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Screen")
            .field("handle", &self.handle)
            .field("caption", &self.caption)
            .field("widgets", &self.tree.len())
            .field("focus_path", &self.focus_path)
            .field("drag_target", &self.drag_target)
            .field("pointer", &self.pointer)
            .finish_non_exhaustive()
    }
}
