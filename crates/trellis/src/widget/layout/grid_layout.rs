//! Uniform grid layout.
//!
//! `GridLayout` fills a fixed number of cells per line (`resolution`). With
//! horizontal orientation children fill rows left to right; with vertical
//! orientation they fill columns top to bottom. Every column is as wide as
//! its widest child and every row as tall as its tallest child.
//!
//! When the container is larger than the grid, the surplus is spread evenly
//! over the lines of that axis, with the integer remainder going one pixel at
//! a time to the earliest lines.
//!
//! # Example
//!
//! ```ignore
//! use trellis::widget::layout::GridLayout;
//! use trellis_core::{Alignment, Orientation};
//!
//! // A numeric keypad: three keys per row.
//! let mut keypad = GridLayout::new(Orientation::Horizontal, 3, Alignment::Middle, 5, 5);
//! keypad.set_col_alignments(vec![Alignment::Maximum, Alignment::Fill]);
//! tree.set_layout(panel, keypad)?;
//! ```

use trellis_core::{Alignment, LayoutError, LayoutResult, Orientation, Vector2i};

use super::{Layout, container_size, place, visible_children};
use crate::surface::DrawSurface;
use crate::widget::{WidgetId, WidgetTree};

/// A grid with a fixed number of cells per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridLayout {
    orientation: Orientation,
    resolution: usize,
    default_alignment: [Alignment; 2],
    alignment: [Vec<Alignment>; 2],
    margin: i32,
    spacing: Vector2i,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(Orientation::Horizontal, 2, Alignment::Middle, 0, 0)
    }
}

impl GridLayout {
    /// Create a grid with the same alignment and spacing on both axes.
    pub fn new(
        orientation: Orientation,
        resolution: usize,
        alignment: Alignment,
        margin: i32,
        spacing: i32,
    ) -> Self {
        Self {
            orientation,
            resolution,
            default_alignment: [alignment; 2],
            alignment: [Vec::new(), Vec::new()],
            margin,
            spacing: Vector2i::splat(spacing),
        }
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    /// Cells per line.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn set_resolution(&mut self, resolution: usize) {
        self.resolution = resolution;
    }

    #[inline]
    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn set_margin(&mut self, margin: i32) {
        self.margin = margin;
    }

    #[inline]
    pub fn spacing(&self) -> Vector2i {
        self.spacing
    }

    /// Set the gap between lines on one axis.
    pub fn set_axis_spacing(&mut self, axis: usize, spacing: i32) {
        self.spacing[axis] = spacing;
    }

    pub fn set_spacing(&mut self, spacing: i32) {
        self.spacing = Vector2i::splat(spacing);
    }

    /// Alignment used for lines without an explicit entry.
    pub fn set_default_alignment(&mut self, axis: usize, alignment: Alignment) {
        self.default_alignment[axis] = alignment;
    }

    /// Per-column horizontal alignment, in column order.
    pub fn set_col_alignments(&mut self, alignments: Vec<Alignment>) {
        self.alignment[0] = alignments;
    }

    /// Per-row vertical alignment, in row order.
    pub fn set_row_alignments(&mut self, alignments: Vec<Alignment>) {
        self.alignment[1] = alignments;
    }

    /// Alignment of line `item` along `axis`.
    pub fn alignment(&self, axis: usize, item: usize) -> Alignment {
        self.alignment[axis]
            .get(item)
            .copied()
            .unwrap_or(self.default_alignment[axis])
    }

    fn extra_height(&self, tree: &WidgetTree, node: WidgetId) -> i32 {
        tree.header_height(node)
            .map_or(0, |header| header - self.margin / 2)
    }

    /// Line extents per axis, plus the visible children in fill order.
    fn compute(
        &self,
        tree: &WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<([Vec<i32>; 2], Vec<GridCell>)> {
        if self.resolution == 0 {
            return Err(LayoutError::ZeroResolution);
        }
        let axis1 = self.orientation.axis();
        let axis2 = self.orientation.cross().axis();
        let children = visible_children(tree, node);

        let mut dim = [0usize; 2];
        dim[axis1] = self.resolution;
        dim[axis2] = children.len().div_ceil(self.resolution);
        let mut grid = [vec![0; dim[0]], vec![0; dim[1]]];

        let mut cells = Vec::with_capacity(children.len());
        for (index, child) in children.into_iter().enumerate() {
            let i1 = index % self.resolution;
            let i2 = index / self.resolution;
            let target = tree.target_size(child, surface)?;
            grid[axis1][i1] = grid[axis1][i1].max(target[axis1]);
            grid[axis2][i2] = grid[axis2][i2].max(target[axis2]);
            cells.push(GridCell { child, i1, i2, target });
        }
        Ok((grid, cells))
    }
}

struct GridCell {
    child: WidgetId,
    i1: usize,
    i2: usize,
    target: Vector2i,
}

impl Layout for GridLayout {
    fn preferred_size(
        &self,
        tree: &WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<Vector2i> {
        let (grid, _) = self.compute(tree, node, surface)?;
        let mut size = Vector2i::ZERO;
        for axis in 0..2 {
            let gaps = grid[axis].len().saturating_sub(1) as i32;
            size[axis] = 2 * self.margin + grid[axis].iter().sum::<i32>() + gaps * self.spacing[axis];
        }
        size.y += self.extra_height(tree, node);
        Ok(size)
    }

    fn perform_layout(
        &self,
        tree: &mut WidgetTree,
        node: WidgetId,
        surface: &dyn DrawSurface,
    ) -> LayoutResult<()> {
        let container = container_size(tree, node)?;
        let (mut grid, cells) = self.compute(tree, node, surface)?;
        let extra = Vector2i::new(0, self.extra_height(tree, node));

        for axis in 0..2 {
            let lines = grid[axis].len();
            if lines == 0 {
                continue;
            }
            let gaps = (lines - 1) as i32;
            let grid_size = 2 * self.margin + extra[axis] + grid[axis].iter().sum::<i32>() + gaps * self.spacing[axis];
            if grid_size < container[axis] {
                let surplus = container[axis] - grid_size;
                let share = surplus / lines as i32;
                let remainder = (surplus - share * lines as i32) as usize;
                for (index, line) in grid[axis].iter_mut().enumerate() {
                    *line += share + i32::from(index < remainder);
                }
            }
        }

        let axis1 = self.orientation.axis();
        let axis2 = self.orientation.cross().axis();
        let start = Vector2i::splat(self.margin) + extra;

        // Line start offsets along each axis.
        let mut offsets = [Vec::new(), Vec::new()];
        for axis in 0..2 {
            let mut cursor = start[axis];
            for &line in &grid[axis] {
                offsets[axis].push(cursor);
                cursor += line + self.spacing[axis];
            }
        }

        for cell in cells {
            let fixed = tree.get(cell.child)?.fixed_size();
            let mut target = cell.target;
            let mut pos = Vector2i::ZERO;
            for (axis, item) in [(axis1, cell.i1), (axis2, cell.i2)] {
                pos[axis] = offsets[axis][item];
                let line = grid[axis][item];
                match self.alignment(axis, item) {
                    Alignment::Minimum => {}
                    Alignment::Middle => pos[axis] += (line - target[axis]) / 2,
                    Alignment::Maximum => pos[axis] += line - target[axis],
                    Alignment::Fill => {
                        target[axis] = if fixed[axis] != 0 { fixed[axis] } else { line };
                    }
                }
            }
            place(tree, cell.child, pos, target, surface)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use crate::widget::WidgetNode;

    fn setup(layout: GridLayout, sizes: &[(i32, i32)]) -> (WidgetTree, WidgetId, Vec<WidgetId>) {
        let mut tree = WidgetTree::default();
        let root = tree.root();
        let panel = tree.insert(root, WidgetNode::new().with_layout(layout)).unwrap();
        let children = sizes
            .iter()
            .map(|&size| tree.insert(panel, WidgetNode::new().with_size(size)).unwrap())
            .collect();
        (tree, panel, children)
    }

    #[test]
    fn test_row_major_line_sizes() {
        let layout = GridLayout::new(Orientation::Horizontal, 2, Alignment::Minimum, 3, 4);
        let (tree, panel, _) = setup(layout, &[(10, 5), (20, 8), (15, 12)]);
        let surface = RecordingSurface::new();
        // columns [15, 20], rows [8, 12]
        assert_eq!(
            tree.preferred_size(panel, &surface).unwrap(),
            Vector2i::new(6 + 35 + 4, 6 + 20 + 4)
        );
    }

    #[test]
    fn test_column_major_placement() {
        let layout = GridLayout::new(Orientation::Vertical, 2, Alignment::Minimum, 0, 0);
        let (mut tree, panel, children) = setup(layout, &[(10, 10), (10, 20), (30, 10)]);
        let surface = RecordingSurface::new();
        tree.perform_layout(panel, &surface).unwrap();
        let pos = |id| tree.node(id).unwrap().position();
        assert_eq!(pos(children[0]), Vector2i::new(0, 0));
        assert_eq!(pos(children[1]), Vector2i::new(0, 10));
        assert_eq!(pos(children[2]), Vector2i::new(10, 0));
    }

    #[test]
    fn test_surplus_remainder_goes_to_first_lines() {
        let layout = GridLayout::new(Orientation::Horizontal, 3, Alignment::Fill, 0, 0);
        let (mut tree, panel, children) = setup(layout, &[(10, 10), (10, 10), (10, 10)]);
        tree.node_mut(panel).unwrap().set_size((32, 10));
        let surface = RecordingSurface::new();
        tree.perform_layout(panel, &surface).unwrap();

        let geometry = |id| {
            let n = tree.node(id).unwrap();
            (n.position().x, n.size().x)
        };
        assert_eq!(geometry(children[0]), (0, 11));
        assert_eq!(geometry(children[1]), (11, 11));
        assert_eq!(geometry(children[2]), (22, 10));
    }

    #[test]
    fn test_per_line_alignment() {
        let mut layout = GridLayout::new(Orientation::Horizontal, 2, Alignment::Minimum, 0, 0);
        layout.set_col_alignments(vec![Alignment::Maximum, Alignment::Middle]);
        let (mut tree, panel, children) = setup(layout, &[(10, 10), (10, 10), (30, 10), (20, 10)]);
        let surface = RecordingSurface::new();
        tree.perform_layout(panel, &surface).unwrap();
        let pos = |id| tree.node(id).unwrap().position();
        // columns are 30 and 20 wide
        assert_eq!(pos(children[0]), Vector2i::new(20, 0));
        assert_eq!(pos(children[1]), Vector2i::new(35, 0));
        assert_eq!(pos(children[3]), Vector2i::new(30, 10));
    }

    #[test]
    fn test_zero_resolution_is_an_error() {
        let layout = GridLayout::new(Orientation::Horizontal, 0, Alignment::Middle, 0, 0);
        let (tree, panel, _) = setup(layout, &[(10, 10)]);
        let surface = RecordingSurface::new();
        assert_eq!(
            tree.preferred_size(panel, &surface),
            Err(LayoutError::ZeroResolution)
        );
    }

    #[test]
    fn test_empty_grid_lays_out() {
        let layout = GridLayout::default();
        let (mut tree, panel, _) = setup(layout, &[]);
        tree.node_mut(panel).unwrap().set_size((100, 100));
        let surface = RecordingSurface::new();
        assert!(tree.perform_layout(panel, &surface).is_ok());
    }
}
