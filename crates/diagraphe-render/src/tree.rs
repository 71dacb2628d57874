//! Probability-tree layout.
//!
//! Positions are computed in (depth, cross) coordinates and mapped to (x, y) at the end:
//! horizontal trees grow rightwards (depth = x), vertical trees grow downwards (depth = y).
//!
//! Layout runs in two passes. The first walks the tree depth-first and fills an index table of
//! node positions; a parent is re-centred on its children's span once they are placed. The second pass
//! generates one branch per `(parent, child)` index pair against the finished table, so branch
//! endpoints always agree with the final node positions.

use diagraphe_core::geom::Bounds;
use diagraphe_core::geom::{Point, point};
use diagraphe_core::{ProbabilityTreeSpec, TreeDirection, TreeNode};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeLayoutOptions {
    pub direction: TreeDirection,
    pub node_spacing: f64,
    pub level_spacing: f64,
    pub leaf_spacing: f64,
}

impl Default for TreeLayoutOptions {
    fn default() -> Self {
        Self {
            direction: TreeDirection::Horizontal,
            node_spacing: 50.0,
            level_spacing: 100.0,
            leaf_spacing: 20.0,
        }
    }
}

impl From<&ProbabilityTreeSpec> for TreeLayoutOptions {
    fn from(spec: &ProbabilityTreeSpec) -> Self {
        Self {
            direction: spec.direction,
            node_spacing: spec.node_spacing,
            level_spacing: spec.level_spacing,
            leaf_spacing: spec.leaf_spacing,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

impl LayoutPoint {
    pub fn to_point(self) -> Point {
        point(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub depth: usize,
    pub is_leaf: bool,
    /// Index of the parent in [`TreeLayout::nodes`].
    pub parent: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedBranch {
    pub start: LayoutPoint,
    pub end: LayoutPoint,
    /// Label of the child node.
    pub label: String,
    /// Probability of the child node; `None` draws an unlabeled branch.
    pub probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeLayout {
    /// Nodes in pre-order (root first).
    pub nodes: Vec<PositionedNode>,
    /// One branch per parent/child pair, in child pre-order.
    pub branches: Vec<PositionedBranch>,
    pub extent: Option<Bounds>,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    depth_coord: f64,
    cross: f64,
}

struct Walker<'a> {
    opts: &'a TreeLayoutOptions,
    slots: Vec<Slot>,
    nodes: Vec<PositionedNode>,
    edges: Vec<(usize, usize)>,
    probabilities: Vec<Option<f64>>,
}

impl Walker<'_> {
    /// Places `node` and its subtree with the cross cursor at `cursor`.
    ///
    /// Returns the node's index and its subtree's cross span.
    fn place(
        &mut self,
        node: &TreeNode,
        depth_coord: f64,
        cursor: f64,
        depth: usize,
        parent: Option<usize>,
    ) -> (usize, f64, f64) {
        let idx = self.slots.len();
        self.slots.push(Slot {
            depth_coord,
            cross: cursor,
        });
        self.nodes.push(PositionedNode {
            label: node.label.clone(),
            x: 0.0,
            y: 0.0,
            depth,
            is_leaf: node.is_leaf(),
            parent,
        });
        self.probabilities.push(node.probability);

        if node.is_leaf() {
            return (idx, cursor, cursor);
        }

        let child_depth = depth_coord + self.opts.leaf_spacing + self.opts.level_spacing;
        let mut cursor = cursor;
        let mut span_min: Option<f64> = None;
        let mut span_max = cursor;
        for child in &node.children {
            let (ci, min, max) = self.place(child, child_depth, cursor, depth + 1, Some(idx));
            self.edges.push((idx, ci));
            span_min.get_or_insert(min);
            span_max = max;
            cursor = max + self.opts.node_spacing;
        }

        // Midpoint of the first child's span min and the last child's span max.
        let span_min = span_min.unwrap_or(span_max);
        self.slots[idx].cross = (span_min + span_max) / 2.0;
        (idx, span_min, span_max)
    }
}

/// Lays out `root` and its descendants.
pub fn layout_tree(root: &TreeNode, options: &TreeLayoutOptions) -> TreeLayout {
    let mut walker = Walker {
        opts: options,
        slots: Vec::with_capacity(root.count()),
        nodes: Vec::with_capacity(root.count()),
        edges: Vec::new(),
        probabilities: Vec::with_capacity(root.count()),
    };
    walker.place(root, 0.0, 0.0, 0, None);

    let Walker {
        slots,
        mut nodes,
        edges,
        probabilities,
        ..
    } = walker;

    let offset = options.leaf_spacing;
    let to_xy = |depth_coord: f64, cross: f64| {
        let (d, c) = (depth_coord + offset, cross + offset);
        match options.direction {
            TreeDirection::Horizontal => LayoutPoint { x: d, y: c },
            TreeDirection::Vertical => LayoutPoint { x: c, y: d },
        }
    };

    for (node, slot) in nodes.iter_mut().zip(&slots) {
        let p = to_xy(slot.depth_coord, slot.cross);
        node.x = p.x;
        node.y = p.y;
    }

    let branches: Vec<PositionedBranch> = edges
        .iter()
        .map(|&(parent, child)| {
            let ps = slots[parent];
            let cs = slots[child];
            PositionedBranch {
                start: to_xy(ps.depth_coord + options.leaf_spacing, ps.cross),
                end: to_xy(cs.depth_coord, cs.cross),
                label: nodes[child].label.clone(),
                probability: probabilities[child],
            }
        })
        .collect();

    let extent = Bounds::from_points(
        nodes
            .iter()
            .map(|n| point(n.x, n.y))
            .chain(branches.iter().map(|b| b.start.to_point())),
    );

    tracing::debug!(
        nodes = nodes.len(),
        branches = branches.len(),
        "laid out probability tree"
    );
    TreeLayout {
        nodes,
        branches,
        extent,
    }
}
