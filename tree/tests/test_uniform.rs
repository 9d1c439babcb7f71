//! Invariant checks on uniform trees.
use hyperoct_traits::tree::Tree;
use hyperoct_tree::implementations::helpers::points_fixture;
use hyperoct_tree::types::element::ElementType;
use hyperoct_tree::types::single_node::HyperOctree;

#[test]
fn test_uniform_tree() {
    let npoints = 800;
    let points = points_fixture(npoints, 3, None, None);
    let tree = HyperOctree::new(
        &points,
        3,
        ElementType::Point,
        None,
        Some(32),
        None,
        None,
        false,
    )
    .unwrap();

    // Test that the tree really is uniform: every leaf sits at the final
    // level.
    let depth = tree.get_depth();
    assert!(depth > 0);
    for k in 0..tree.node_count() {
        if tree.is_leaf(k) {
            assert_eq!(tree.level_of(k), depth);
        }
    }

    // And no node at the final level would still trigger a split.
    for k in tree.get_nodes(depth).unwrap() {
        assert!(tree.xi_len[k] <= 32);
    }
}

#[test]
fn test_uniform_depth_cap() {
    let points = points_fixture(500, 2, None, None);
    let tree = HyperOctree::new(
        &points,
        2,
        ElementType::Point,
        None,
        Some(1),
        Some(3),
        None,
        false,
    )
    .unwrap();

    // Refinement would go on but the level cap cuts it short.
    assert_eq!(tree.get_depth(), 3);
    for k in 0..tree.node_count() {
        if tree.is_leaf(k) {
            assert_eq!(tree.level_of(k), 3);
        }
    }
}
