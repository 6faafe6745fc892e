//! Logging and debugging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation. Nothing is printed
//! unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis::screen=debug")
//!     .init();
//! ```
//!
//! Every subsystem logs under one of the fixed [`targets`], so filters can be
//! written against stable names.

/// Span names used throughout Trellis for tracing.
pub mod span_names {
    /// Layout pass span.
    pub const LAYOUT: &str = "trellis::layout";
    /// Draw pass span.
    pub const DRAW: &str = "trellis::draw";
    /// Input dispatch span.
    pub const DISPATCH: &str = "trellis::dispatch";
}

/// Target names for log filtering.
pub mod targets {
    /// Core target.
    pub const CORE: &str = "trellis_core";
    /// Widget tree edits.
    pub const TREE: &str = "trellis::tree";
    /// Layout strategies.
    pub const LAYOUT: &str = "trellis::layout";
    /// Screen routing, focus and z-order.
    pub const SCREEN: &str = "trellis::screen";
    /// Windows, popups and dialogs.
    pub const WINDOW: &str = "trellis::window";
    /// Performance spans.
    pub const PERF: &str = "trellis::perf";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

impl TreeStyle {
    /// Branch glyphs as `(continuation, tee, last)`.
    pub fn glyphs(self) -> (&'static str, &'static str, &'static str) {
        match self {
            TreeStyle::Ascii => ("|", "+-- ", "`-- "),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500} ", "\u{2514}\u{2500}\u{2500} "),
            TreeStyle::Compact => ("", "- ", "- "),
        }
    }
}

/// Configuration for tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// The style of tree visualization.
    pub style: TreeStyle,
    /// Whether to show arena handles.
    pub show_ids: bool,
    /// Whether to show node kinds.
    pub show_kinds: bool,
    /// Whether to show position and size.
    pub show_geometry: bool,
    /// Whether hidden nodes are listed.
    pub show_hidden: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_kinds: true,
            show_geometry: true,
            show_hidden: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_kinds: false,
            show_geometry: false,
            ..Default::default()
        }
    }
}

/// A guard that keeps a performance span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "trellis::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_options() {
        let options = TreeFormatOptions::minimal();
        assert!(!options.show_ids);
        assert!(!options.show_geometry);
        assert_eq!(options.style, TreeStyle::Unicode);
    }

    #[test]
    fn test_ascii_glyphs() {
        let (branch, tee, last) = TreeStyle::Ascii.glyphs();
        assert_eq!(branch, "|");
        assert!(tee.starts_with("+--"));
        assert!(last.starts_with("`--"));
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
        tracing::debug!(target: targets::CORE, "inside perf span");
    }
}
