//! Traits
use std::ops::Range;

/// Tree is the trait interface for d-dimensional hierarchical trees. It makes no
/// assumptions about the downstream usage of a struct implementing Tree, it simply
/// provides methods for accessing nodes in breadth-first order and the objects
/// they hold.
///
/// Nodes are identified by their position in the breadth-first enumeration, with
/// the root at index 0. Objects are identified by their position in the input
/// coordinate buffer.
pub trait Tree {
    // Get the spatial dimension of the tree.
    fn get_dim(&self) -> usize;

    // Get depth of tree, in levels beyond the root.
    fn get_depth(&self) -> usize;

    // Get the total number of nodes.
    fn get_node_count(&self) -> usize;

    // Get the contiguous range of node indices at a given level.
    fn get_nodes(&self, level: usize) -> Option<Range<usize>>;

    // Get the level of a node.
    fn get_level(&self, node: usize) -> Option<usize>;

    // Get the parent of a node, `None` for the root.
    fn get_parent(&self, node: usize) -> Option<usize>;

    // Get the child position of a node within its parent, as a bitmask with bit
    // `j` set if the node lies in the upper half along axis `j`.
    fn get_octant(&self, node: usize) -> Option<u32>;

    // Get the indices of the objects held in the subtree rooted at a node,
    // including any objects retained at the node itself.
    fn get_objects(&self, node: usize) -> Option<&[usize]>;

    // Checks whether a given index corresponds to a node of the tree.
    fn is_node(&self, node: usize) -> bool;

    // Checks whether a given node was left unsubdivided.
    fn is_leaf(&self, node: usize) -> bool;
}
