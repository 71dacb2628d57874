use diagraphe_core::{MathBounds, TreeDirection, TreeNode};
use diagraphe_render::{CoordinateMapper, TreeLayoutOptions, layout_tree};
use proptest::prelude::*;

fn bounds() -> impl Strategy<Value = MathBounds> {
    (-1e3..1e3f64, 1e-3..1e3f64, -1e3..1e3f64, 1e-3..1e3f64)
        .prop_map(|(x0, dx, y0, dy)| MathBounds::new(x0, x0 + dx, y0, y0 + dy))
}

fn tree(depth: u32) -> impl Strategy<Value = TreeNode> {
    let leaf = "[a-z]{0,3}".prop_map(TreeNode::new);
    leaf.prop_recursive(depth, 32, 4, |inner| {
        ("[a-z]{0,3}", prop::collection::vec(inner, 1..4))
            .prop_map(|(label, children)| TreeNode::new(label).with_children(children))
    })
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

proptest! {
    #[test]
    fn mapper_sends_window_edges_to_box_edges(
        b in bounds(),
        w in 1.0..2000.0f64,
        h in 1.0..2000.0f64,
    ) {
        let m = CoordinateMapper::new(b, w, h).unwrap();
        prop_assert!(close(m.to_device_x(b.x_min), 0.0));
        prop_assert!(close(m.to_device_x(b.x_max), w));
        prop_assert!(close(m.to_device_y(b.y_min), h));
        prop_assert!(close(m.to_device_y(b.y_max), 0.0));
    }

    #[test]
    fn mapper_is_monotonic(b in bounds(), t in 0.0..1.0f64) {
        let m = CoordinateMapper::new(b, 100.0, 100.0).unwrap();
        let x = b.x_min + t * (b.x_max - b.x_min);
        let y = b.y_min + t * (b.y_max - b.y_min);
        prop_assert!(m.to_device_x(x) >= m.to_device_x(b.x_min) - 1e-9);
        prop_assert!(m.to_device_y(y) <= m.to_device_y(b.y_min) + 1e-9);
    }

    #[test]
    fn tree_layout_is_deterministic(root in tree(4)) {
        let opts = TreeLayoutOptions::default();
        prop_assert_eq!(layout_tree(&root, &opts), layout_tree(&root, &opts));
    }

    #[test]
    fn parents_are_centred_on_their_subtree_span(root in tree(4)) {
        let layout = layout_tree(&root, &TreeLayoutOptions::default());
        prop_assert_eq!(layout.nodes.len(), root.count());
        prop_assert_eq!(layout.branches.len(), root.count() - 1);

        let in_subtree = |mut i: usize, of: usize| loop {
            if i == of {
                return true;
            }
            match layout.nodes[i].parent {
                Some(p) => i = p,
                None => return false,
            }
        };
        for (i, node) in layout.nodes.iter().enumerate() {
            if node.is_leaf {
                continue;
            }
            let ys: Vec<f64> = (0..layout.nodes.len())
                .filter(|&j| j != i && in_subtree(j, i))
                .map(|j| layout.nodes[j].y)
                .collect();
            let lo = ys.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(close(node.y, (lo + hi) / 2.0));
            for (j, child) in layout.nodes.iter().enumerate() {
                if child.parent == Some(i) {
                    prop_assert!(close(child.x, node.x + 120.0), "child {}", j);
                }
            }
        }
    }

    #[test]
    fn vertical_layout_transposes_horizontal(root in tree(3)) {
        let h = layout_tree(&root, &TreeLayoutOptions::default());
        let v = layout_tree(&root, &TreeLayoutOptions {
            direction: TreeDirection::Vertical,
            ..TreeLayoutOptions::default()
        });
        for (a, b) in h.nodes.iter().zip(&v.nodes) {
            prop_assert_eq!((a.x, a.y), (b.y, b.x));
        }
    }

    #[test]
    fn siblings_never_overlap(root in tree(4)) {
        let opts = TreeLayoutOptions::default();
        let layout = layout_tree(&root, &opts);
        let mut leaves: Vec<f64> = layout
            .nodes
            .iter()
            .filter(|n| n.is_leaf)
            .map(|n| n.y)
            .collect();
        let sorted = {
            let mut s = leaves.clone();
            s.sort_by(f64::total_cmp);
            s
        };
        // Leaves come out in pre-order, which is also their cross-axis order.
        prop_assert_eq!(&leaves, &sorted);
        leaves.dedup();
        for pair in leaves.windows(2) {
            prop_assert!(pair[1] - pair[0] >= opts.node_spacing - 1e-9);
        }
    }
}
