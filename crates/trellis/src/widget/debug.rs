//! Printable dumps of the widget tree.
//!
//! ```ignore
//! use trellis::widget::WidgetTreeDebug;
//!
//! println!("{}", WidgetTreeDebug::new(&tree, tree.root()));
//! ```
//!
//! ```text
//! root [WidgetId(1v1)] (Widget) @(0, 0) 800x600
//! └── main [WidgetId(2v1)] (Window) @(15, 15) 240x180
//!     ├── (unnamed) [WidgetId(3v1)] (Label) @(10, 40) 60x16
//! ```

use std::fmt;

use trellis_core::{TreeFormatOptions, TreeStyle};

use super::{WidgetId, WidgetTree};

/// Formats a subtree according to [`TreeFormatOptions`].
pub struct WidgetTreeDebug<'a> {
    tree: &'a WidgetTree,
    root: WidgetId,
    options: TreeFormatOptions,
}

impl<'a> WidgetTreeDebug<'a> {
    /// Dump the subtree at `root` with default options.
    pub fn new(tree: &'a WidgetTree, root: WidgetId) -> Self {
        Self::with_options(tree, root, TreeFormatOptions::default())
    }

    pub fn with_options(tree: &'a WidgetTree, root: WidgetId, options: TreeFormatOptions) -> Self {
        Self {
            tree,
            root,
            options,
        }
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: WidgetId,
        prefix: &str,
        connector: &str,
        depth: usize,
    ) -> fmt::Result {
        let Some(node) = self.tree.node(id) else {
            return Ok(());
        };

        write!(f, "{prefix}{connector}{}", node.id().unwrap_or("(unnamed)"))?;
        if self.options.show_ids {
            write!(f, " [{id:?}]")?;
        }
        if self.options.show_kinds {
            write!(f, " ({})", node.kind().name())?;
        }
        if self.options.show_geometry {
            let size = node.size();
            write!(f, " @{} {}x{}", node.position(), size.x, size.y)?;
        }
        if !node.is_visible() {
            write!(f, " hidden")?;
        }
        writeln!(f)?;

        if self.options.max_depth.is_some_and(|max| depth >= max) {
            return Ok(());
        }

        let children: Vec<WidgetId> = node
            .children()
            .iter()
            .copied()
            .filter(|&c| {
                self.options.show_hidden || self.tree.node(c).is_some_and(|n| n.is_visible())
            })
            .collect();

        let (branch, tee, last) = self.options.style.glyphs();
        let child_prefix = match (depth, self.options.style) {
            (0, _) => String::new(),
            (_, TreeStyle::Compact) => format!("{prefix}{}", " ".repeat(self.options.indent_size)),
            _ if connector == last => format!("{prefix}{}", " ".repeat(self.options.indent_size + 2)),
            _ => format!("{prefix}{branch}{}", " ".repeat(self.options.indent_size + 1)),
        };
        for (index, &child) in children.iter().enumerate() {
            let connector = if index + 1 == children.len() { last } else { tee };
            self.write_node(f, child, &child_prefix, connector, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for WidgetTreeDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root, "", "", 0)
    }
}
