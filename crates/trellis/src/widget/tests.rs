//! Tests spanning the tree, the layouts and the draw pass.

use trellis_core::{Alignment, Orientation, Vector2i};

use super::{BoxLayout, GridLayout, WidgetId, WidgetNode, WidgetTree};
use crate::surface::{DrawCommand, RecordingSurface};

fn geometry(tree: &WidgetTree, id: WidgetId) -> (Vector2i, Vector2i) {
    let node = tree.node(id).unwrap();
    (node.position(), node.size())
}

#[test]
fn test_layout_honors_fixed_and_preferred_sizes() {
    let mut tree = WidgetTree::default();
    let surface = RecordingSurface::new();
    let root = tree.root();
    let panel = tree
        .insert(
            root,
            WidgetNode::new().with_layout(BoxLayout::new(Orientation::Vertical, Alignment::Middle, 10, 5)),
        )
        .unwrap();
    let text = tree.add_label(panel, "abcd").unwrap();
    let wide = tree
        .insert(panel, WidgetNode::label("x").with_fixed_size((80, 0)))
        .unwrap();
    let tall = tree
        .insert(panel, WidgetNode::new().with_size((30, 5)).with_fixed_size((0, 25)))
        .unwrap();

    let preferred = tree.preferred_size(panel, &surface).unwrap();
    tree.node_mut(panel).unwrap().set_size(preferred);
    tree.perform_layout(panel, &surface).unwrap();

    assert_eq!(geometry(&tree, wide).1.x, 80);
    assert_eq!(geometry(&tree, tall).1.y, 25);
    for child in [text, wide, tall] {
        let (pos, size) = geometry(&tree, child);
        let fixed = tree.node(child).unwrap().fixed_size();
        let wanted = tree.preferred_size(child, &surface).unwrap();
        for axis in 0..2 {
            if fixed[axis] != 0 {
                assert_eq!(size[axis], fixed[axis]);
            } else {
                assert!(size[axis] >= wanted[axis]);
            }
        }
        // Middle alignment centers on the cross axis.
        assert_eq!(pos.x, (preferred.x - size.x) / 2);
    }
    // Stacked top to bottom with the spacing in between.
    assert_eq!(geometry(&tree, text).0.y, 10);
    assert_eq!(geometry(&tree, wide).0.y, 10 + 16 + 5);
    assert_eq!(geometry(&tree, tall).0.y, 10 + 16 + 5 + 16 + 5);
}

#[test]
fn test_find_at_prefers_later_sibling() {
    let mut tree = WidgetTree::default();
    let root = tree.root();
    let below = tree
        .insert(root, WidgetNode::new().with_position((0, 0)).with_size((100, 100)))
        .unwrap();
    let above = tree
        .insert(root, WidgetNode::new().with_position((50, 50)).with_size((100, 100)))
        .unwrap();

    assert_eq!(tree.find_at(root, Vector2i::new(60, 60)), Some(above));
    assert_eq!(tree.find_at(root, Vector2i::new(10, 10)), Some(below));

    tree.node_mut(above).unwrap().set_visible(false);
    assert_eq!(tree.find_at(root, Vector2i::new(60, 60)), Some(below));
}

#[test]
fn test_overlapping_siblings_draw_in_insertion_order() {
    let mut tree = WidgetTree::default();
    let root = tree.root();
    for caption in ["back", "middle", "front"] {
        tree.insert(root, WidgetNode::label(caption).with_size((60, 16)))
            .unwrap();
    }
    let mut surface = RecordingSurface::new();
    tree.draw(root, &mut surface);
    let texts: Vec<String> = surface
        .commands()
        .iter()
        .filter_map(DrawCommand::text)
        .map(str::to_owned)
        .collect();
    assert_eq!(texts, ["back", "middle", "front"]);
}

#[test]
fn test_grid_layout_is_idempotent() {
    let mut tree = WidgetTree::default();
    let surface = RecordingSurface::new();
    let root = tree.root();
    let grid = tree
        .insert(
            root,
            WidgetNode::new().with_layout(GridLayout::new(Orientation::Horizontal, 3, Alignment::Middle, 5, 5)),
        )
        .unwrap();
    let cells: Vec<WidgetId> = ["one", "two", "three", "four", "five"]
        .into_iter()
        .map(|caption| tree.add_label(grid, caption).unwrap())
        .collect();
    let preferred = tree.preferred_size(grid, &surface).unwrap();
    tree.node_mut(grid).unwrap().set_size(preferred);

    tree.perform_layout(grid, &surface).unwrap();
    let first: Vec<_> = cells.iter().map(|&id| geometry(&tree, id)).collect();
    tree.perform_layout(grid, &surface).unwrap();
    let second: Vec<_> = cells.iter().map(|&id| geometry(&tree, id)).collect();
    assert_eq!(first, second);
    assert_eq!(tree.preferred_size(grid, &surface).unwrap(), preferred);
}

#[test]
fn test_nested_layouts_recurse() {
    let mut tree = WidgetTree::default();
    let surface = RecordingSurface::new();
    let root = tree.root();
    let outer = tree
        .insert(
            root,
            WidgetNode::new().with_layout(BoxLayout::new(Orientation::Horizontal, Alignment::Minimum, 0, 0)),
        )
        .unwrap();
    let inner = tree
        .insert(
            outer,
            WidgetNode::new().with_layout(BoxLayout::new(Orientation::Vertical, Alignment::Minimum, 4, 0)),
        )
        .unwrap();
    let label = tree.add_label(inner, "ab").unwrap();

    let preferred = tree.preferred_size(outer, &surface).unwrap();
    assert_eq!(preferred, Vector2i::new(16 + 8, 16 + 8));
    tree.node_mut(outer).unwrap().set_size(preferred);
    tree.perform_layout(outer, &surface).unwrap();

    assert_eq!(geometry(&tree, inner), (Vector2i::ZERO, preferred));
    assert_eq!(geometry(&tree, label), (Vector2i::new(4, 4), Vector2i::new(16, 16)));
}
