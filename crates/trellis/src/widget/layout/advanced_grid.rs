//! Anchor-based grid layout with explicit rows, columns and stretch factors.
//!
//! Every column and row has a declared size and a stretch factor. A declared
//! size of zero means the line grows to fit the single-cell widgets placed in
//! it. Widgets are registered with an [`Anchor`] giving their cell, span and
//! per-axis alignment.
//!
//! Line sizes are resolved per axis in three steps:
//!
//! 1. single-span widgets grow auto-sized lines;
//! 2. spanning widgets that still do not fit distribute the shortfall over
//!    their lines in proportion to stretch;
//! 3. leftover container space is distributed over all lines by stretch.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::layout::{AdvancedGridLayout, Anchor};
//!
//! let mut form = AdvancedGridLayout::new(vec![0, 10, 0], vec![], 10);
//! form.set_col_stretch(2, 1.0)?;
//! form.append_row(0, 0.0);
//! form.set_anchor(label, Anchor::cell(0, 0));
//! form.set_anchor(field, Anchor::cell(2, 0));
//! tree.set_layout(panel, form)?;
//! ```

use std::collections::HashMap;
use std::fmt;

use trellis_core::{Alignment, LayoutError, LayoutResult, Vector2i};

use super::{Layout, container_size, visible_children};
use crate::surface::DrawSurface;
use crate::widget::{WidgetId, WidgetTree};

/// Cell position, span and alignment of a widget in an [`AdvancedGridLayout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Column and row of the top-left cell.
    pub pos: [usize; 2],
    /// Number of columns and rows spanned.
    pub size: [usize; 2],
    /// Horizontal and vertical alignment inside the spanned cells.
    pub align: [Alignment; 2],
}

impl Anchor {
    /// A single cell, filled on both axes.
    pub fn cell(x: usize, y: usize) -> Self {
        Self::span(x, y, 1, 1)
    }

    /// A block of cells, filled on both axes.
    pub fn span(x: usize, y: usize, w: usize, h: usize) -> Self {
        Self {
            pos: [x, y],
            size: [w, h],
            align: [Alignment::Fill; 2],
        }
    }

    /// Override the alignment on both axes.
    pub fn with_align(mut self, horizontal: Alignment, vertical: Alignment) -> Self {
        self.align = [horizontal, vertical];
        self
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Anchor(pos=({}, {}), size=({}, {}), align=({:?}, {:?}))",
            self.pos[0], self.pos[1], self.size[0], self.size[1], self.align[0], self.align[1]
        )
    }
}

/// A grid of declared columns and rows with anchored children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AdvancedGridLayout {
    cols: Vec<i32>,
    rows: Vec<i32>,
    col_stretch: Vec<f32>,
    row_stretch: Vec<f32>,
    anchors: HashMap<WidgetId, Anchor>,
    margin: i32,
}

impl AdvancedGridLayout {
    /// Create a layout with declared line sizes and zero stretch everywhere.
    pub fn new(cols: Vec<i32>, rows: Vec<i32>, margin: i32) -> Self {
        let col_stretch = vec![0.0; cols.len()];
        let row_stretch = vec![0.0; rows.len()];
        Self {
            cols,
            rows,
            col_stretch,
            row_stretch,
            anchors: HashMap::new(),
            margin,
        }
    }

    #[inline]
    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.margin = margin;
    }

    #[inline]
    pub fn col_count(&self) -> usize {
        self.cols.len()
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Add a row; a `size` of zero grows to fit.
    pub fn append_row(&mut self, size: i32, stretch: f32) {
        self.rows.push(size);
        self.row_stretch.push(stretch);
    }

    /// Add a column; a `size` of zero grows to fit.
    pub fn append_col(&mut self, size: i32, stretch: f32) {
        self.cols.push(size);
        self.col_stretch.push(stretch);
    }

    pub fn set_row_stretch(&mut self, index: usize, stretch: f32) -> LayoutResult<()> {
        let count = self.row_stretch.len();
        let slot = self
            .row_stretch
            .get_mut(index)
            .ok_or(LayoutError::LineOutOfRange { index, count })?;
        *slot = stretch;
        Ok(())
    }

    pub fn set_col_stretch(&mut self, index: usize, stretch: f32) -> LayoutResult<()> {
        let count = self.col_stretch.len();
        let slot = self
            .col_stretch
            .get_mut(index)
            .ok_or(LayoutError::LineOutOfRange { index, count })?;
        *slot = stretch;
        Ok(())
    }

    /// Register or replace the anchor of a child widget.
    pub fn set_anchor(&mut self, widget: WidgetId, anchor: Anchor) {
        self.anchors.insert(widget, anchor);
    }

    pub fn anchor(&self, widget: WidgetId) -> Option<Anchor> {
        self.anchors.get(&widget).copied()
    }

    pub fn remove_anchor(&mut self, widget: WidgetId) -> Option<Anchor> {
        self.anchors.remove(&widget)
    }

    fn extra(&self, tree: &WidgetTree, node: WidgetId) -> Vector2i {
        let mut extra = Vector2i::splat(2 * self.margin);
        if let Some(header) = tree.header_height(node) {
            extra.y += header - self.margin / 2;
        }
        extra
    }

    /// Visible children paired with their anchors, in child order.
    fn anchored_children(
        &self,
        tree: &WidgetTree,
        node: WidgetId,
    ) -> LayoutResult<Vec<(WidgetId, Anchor)>> {
        visible_children(tree, node)
            .into_iter()
            .map(|child| {
                self.anchor(child)
                    .map(|anchor| (child, anchor))
                    .ok_or(LayoutError::MissingAnchor)
            })
            .collect()
    }

    /// Resolve the size of every column (`[0]`) and row (`[1]`).
    fn compute(
        &self,
        tree: &WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<[Vec<i32>; 2]> {
        let container = container_size(tree, node)? - self.extra(tree, node);
        let children = self.anchored_children(tree, node)?;
        let mut targets = Vec::with_capacity(children.len());
        for &(child, _) in &children {
            targets.push(tree.target_size(child, surface)?);
        }

        let mut result = [Vec::new(), Vec::new()];
        for axis in 0..2 {
            let (sizes, stretch) = if axis == 0 {
                (&self.cols, &self.col_stretch)
            } else {
                (&self.rows, &self.row_stretch)
            };
            let mut grid = sizes.clone();

            for single_span in [true, false] {
                for (&(_, anchor), target) in children.iter().zip(&targets) {
                    if (anchor.size[axis] == 1) != single_span {
                        continue;
                    }
                    let target = target[axis];
                    let start = anchor.pos[axis];
                    let end = start + anchor.size[axis];
                    if end > grid.len() {
                        return Err(LayoutError::AnchorOutOfBounds {
                            axis,
                            anchor: anchor.to_string(),
                            lines: grid.len(),
                        });
                    }

                    let mut current = 0;
                    let mut total_stretch = 0.0f32;
                    for i in start..end {
                        if sizes[i] == 0 && anchor.size[axis] == 1 {
                            grid[i] = grid[i].max(target);
                        }
                        current += grid[i];
                        total_stretch += stretch[i];
                    }
                    if target <= current {
                        continue;
                    }
                    if total_stretch == 0.0 {
                        return Err(LayoutError::NoStretchAvailable {
                            axis,
                            anchor: anchor.to_string(),
                        });
                    }
                    let amount = (target - current) as f32 / total_stretch;
                    for i in start..end {
                        grid[i] += (amount * stretch[i]).round() as i32;
                    }
                }
            }

            let current: i32 = grid.iter().sum();
            let total_stretch: f32 = stretch.iter().sum();
            if current < container[axis] && total_stretch != 0.0 {
                let amount = (container[axis] - current) as f32 / total_stretch;
                for (line, s) in grid.iter_mut().zip(stretch) {
                    *line += (amount * s).round() as i32;
                }
            }
            result[axis] = grid;
        }
        Ok(result)
    }
}

impl Layout for AdvancedGridLayout {
    fn preferred_size(
        &self,
        tree: &WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i> {
        let grid = self.compute(tree, node, surface)?;
        let size = Vector2i::new(grid[0].iter().sum(), grid[1].iter().sum());
        Ok(size + self.extra(tree, node))
    }

    fn perform_layout(
        &self,
        tree: &mut WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<()> {
        let grid = self.compute(tree, node, surface)?;
        let children = self.anchored_children(tree, node)?;

        let top = match tree.header_height(node) {
            Some(header) => header + self.margin / 2,
            None => self.margin,
        };
        // Prefix sums: offsets[axis][i] is where line i starts.
        let mut offsets = [vec![self.margin], vec![top]];
        for axis in 0..2 {
            for &line in &grid[axis] {
                let last = offsets[axis][offsets[axis].len() - 1];
                offsets[axis].push(last + line);
            }
        }

        for (child, anchor) in children {
            let fixed = tree.get(child)?.fixed_size();
            let preferred = tree.preferred_size(child, surface)?;
            let mut pos = Vector2i::ZERO;
            let mut size = Vector2i::ZERO;
            for axis in 0..2 {
                let start = anchor.pos[axis];
                let mut item_pos = offsets[axis][start];
                let cell = offsets[axis][start + anchor.size[axis]] - item_pos;
                let mut target = if fixed[axis] != 0 { fixed[axis] } else { preferred[axis] };
                match anchor.align[axis] {
                    Alignment::Minimum => {}
                    Alignment::Middle => item_pos += (cell - target) / 2,
                    Alignment::Maximum => item_pos += cell - target,
                    Alignment::Fill => target = if fixed[axis] != 0 { fixed[axis] } else { cell },
                }
                pos[axis] = item_pos;
                size[axis] = target;
            }
            let child_node = tree.get_mut(child)?;
            child_node.position = pos;
            child_node.size = size;
        }

        for child in visible_children(tree, node) {
            tree.perform_layout(child, surface)?;
        }
        Ok(())
    }
}
