//! Construction of hyperoctrees over a single memory space.
use std::ops::Range;

use itertools::Itertools;
use tracing::debug;

use hyperoct_traits::tree::Tree;

use crate::{
    constants::{DEEPEST_LEVEL, MAX_DIM, NCRIT, ROOT},
    implementations::impl_octant::{child_center, octant_of},
    types::{
        domain::Domain, element::ElementType, error::TreeError, octant::OctantMask,
        single_node::HyperOctree,
    },
};

impl HyperOctree {
    /// Build a tree over a set of objects, level by level from the root.
    ///
    /// At each level, a node is subdivided when its occupancy exceeds the leaf
    /// occupancy bound, its level lies below `max_depth`, and its cell has
    /// positive extent along some axis. With `adaptive` unset, every node of a
    /// level is subdivided as soon as any single node qualifies. One child is
    /// emitted per populated octant, in ascending octant-mask order.
    ///
    /// For element types, an object whose radius no longer fits the child cell
    /// selected by its center is retained at the current node and excluded
    /// from every descendant range.
    ///
    /// # Arguments
    /// * `coordinates` - Object coordinates, `dim` interleaved entries per object.
    /// * `dim` - Spatial dimension.
    /// * `element_type` - The kind of object held; element types require `sizes`.
    /// * `sizes` - Per-object radius (half-extent along every axis); ignored for points.
    /// * `occupancy` - Maximum leaf occupancy, defaults to `NCRIT`.
    /// * `max_depth` - Cap on levels beyond the root; `None` leaves the depth unbounded.
    /// * `extents` - Per-axis root extents; entries not greater than zero are derived
    ///   from the size-inflated bounding box of the data.
    /// * `adaptive` - Subdivide per node when `true`, per level when `false`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        coordinates: &[f64],
        dim: usize,
        element_type: ElementType,
        sizes: Option<&[f64]>,
        occupancy: Option<usize>,
        max_depth: Option<usize>,
        extents: Option<&[f64]>,
        adaptive: bool,
    ) -> Result<HyperOctree, TreeError> {
        if dim < 1 || dim > MAX_DIM {
            return Err(TreeError::InvalidDimension(dim));
        }
        if coordinates.is_empty() {
            return Err(TreeError::NoObjects);
        }
        if coordinates.len() % dim != 0 {
            return Err(TreeError::CoordinateShape {
                len: coordinates.len(),
                dim,
            });
        }
        let npoints = coordinates.len() / dim;

        let occupancy = occupancy.unwrap_or(NCRIT);
        if occupancy < 1 {
            return Err(TreeError::InvalidOccupancy);
        }

        if let Some(siz) = sizes {
            if siz.len() != npoints {
                return Err(TreeError::SizeShape {
                    expected: npoints,
                    got: siz.len(),
                });
            }
            for (index, &size) in siz.iter().enumerate() {
                if size < 0.0 {
                    return Err(TreeError::NegativeSize { index, size });
                }
            }
        }
        if element_type.is_element() && sizes.is_none() {
            return Err(TreeError::MissingSizes);
        }

        if let Some(ext) = extents {
            if ext.len() != dim {
                return Err(TreeError::ExtentShape {
                    expected: dim,
                    got: ext.len(),
                });
            }
        }

        let radii = if element_type.is_element() { sizes } else { None };
        let mut domain = Domain::from_points(coordinates, radii, dim);
        if let Some(ext) = extents {
            domain = domain.with_extents(ext);
        }

        if domain.extent.iter().all(|&e| e <= 0.0) {
            let first = &coordinates[..dim];
            let distinct =
                (1..npoints).any(|i| coordinates[i * dim..(i + 1) * dim] != *first);
            if distinct {
                return Err(TreeError::DegenerateExtent);
            }
        }

        let mut parent = vec![ROOT];
        let mut octant: Vec<OctantMask> = vec![0];
        let mut xi = (0..npoints).collect_vec();
        let mut xi_off = vec![0];
        let mut xi_len = vec![npoints];
        let mut lvlx = vec![0, 1];
        let mut leaf = vec![true];

        let mut depth = 0;
        let mut level_ctr = domain.center.clone();
        let mut level_ext = domain.extent.clone();

        loop {
            if let Some(cap) = max_depth {
                if depth >= cap {
                    break;
                }
            }
            if !level_ext.iter().any(|&e| e > 0.0) {
                break;
            }

            let level_begin = lvlx[depth];
            let level_end = lvlx[depth + 1];
            let over = (level_begin..level_end)
                .map(|k| xi_len[k] > occupancy)
                .collect_vec();
            if !over.iter().any(|&o| o) {
                break;
            }
            if depth + 1 > DEEPEST_LEVEL {
                return Err(TreeError::DepthOverflow(DEEPEST_LEVEL));
            }

            let mut next_ctr: Vec<f64> = Vec::new();
            let nodes_before = parent.len();

            for k in level_begin..level_end {
                if adaptive && !over[k - level_begin] {
                    continue;
                }

                let ctr_k = &level_ctr[(k - level_begin) * dim..(k - level_begin + 1) * dim];
                let off = xi_off[k];
                let len = xi_len[k];

                // Tag every object in the range with its octant; oversized
                // elements get key 0 and stay behind at this node.
                let mut tagged = xi[off..off + len]
                    .iter()
                    .map(|&i| {
                        let x = &coordinates[i * dim..(i + 1) * dim];
                        let mask = octant_of(ctr_k, x);
                        let key = match radii {
                            None => u64::from(mask) + 1,
                            Some(siz) => {
                                let fits = (0..dim).all(|j| {
                                    let e = level_ext[j];
                                    let cc = if mask >> j & 1 == 1 {
                                        ctr_k[j] + 0.25 * e
                                    } else {
                                        ctr_k[j] - 0.25 * e
                                    };
                                    (x[j] - cc).abs() + siz[i] <= 0.25 * e
                                });
                                if fits {
                                    u64::from(mask) + 1
                                } else {
                                    0
                                }
                            }
                        };
                        (key, i)
                    })
                    .collect_vec();
                tagged.sort_by_key(|&(key, _)| key);

                for (slot, &(_, i)) in tagged.iter().enumerate() {
                    xi[off + slot] = i;
                }

                // One child per populated octant, in ascending mask order.
                let mut begin = 0;
                while begin < tagged.len() {
                    let key = tagged[begin].0;
                    let mut end = begin + 1;
                    while end < tagged.len() && tagged[end].0 == key {
                        end += 1;
                    }
                    if key > 0 {
                        let mask = (key - 1) as OctantMask;
                        parent.push(k);
                        octant.push(mask);
                        xi_off.push(off + begin);
                        xi_len.push(end - begin);
                        leaf.push(true);
                        leaf[k] = false;
                        next_ctr.extend(child_center(ctr_k, &level_ext, mask));
                    }
                    begin = end;
                }
            }

            if parent.len() == nodes_before {
                break;
            }
            depth += 1;
            lvlx.push(parent.len());
            for e in level_ext.iter_mut() {
                *e *= 0.5;
            }
            level_ctr = next_ctr;
        }

        debug!(dim, nodes = parent.len(), depth, "built hyperoctree");

        Ok(HyperOctree {
            dim,
            element_type,
            adaptive,
            occupancy,
            domain,
            depth,
            parent,
            octant,
            xi,
            xi_off,
            xi_len,
            lvlx,
            leaf,
            has_child_data: false,
            chldp: Vec::new(),
            chld: Vec::new(),
            has_geometry_data: false,
            ctr: Vec::new(),
            ext: Vec::new(),
            has_neighbor_data: false,
            periods: 0,
            nborp: Vec::new(),
            nbori: Vec::new(),
            has_interaction_lists: false,
            ilstp: Vec::new(),
            ilsti: Vec::new(),
        })
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.parent.len()
    }

    /// Level of a node, found from the breadth-first level index.
    pub fn level_of(&self, node: usize) -> usize {
        self.lvlx.partition_point(|&begin| begin <= node) - 1
    }

    /// Whether `anc` equals `node` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, anc: usize, node: usize) -> bool {
        let target = self.level_of(anc);
        let mut level = self.level_of(node);
        if target > level {
            return false;
        }
        let mut k = node;
        while level > target {
            k = self.parent[k];
            level -= 1;
        }
        k == anc
    }

    /// Object indices held in the subtree rooted at a node, including any
    /// objects retained at the node itself.
    pub fn objects_in(&self, node: usize) -> &[usize] {
        &self.xi[self.xi_off[node]..self.xi_off[node] + self.xi_len[node]]
    }

    /// Children of a node in ascending octant order, once [`Self::child_data`]
    /// has run.
    pub fn children_of(&self, node: usize) -> Option<&[usize]> {
        if self.has_child_data {
            Some(&self.chld[self.chldp[node]..self.chldp[node + 1]])
        } else {
            None
        }
    }

    /// Center of a node's cell, once [`Self::geometry_data`] has run.
    pub fn center_of(&self, node: usize) -> Option<&[f64]> {
        if self.has_geometry_data {
            Some(&self.ctr[node * self.dim..(node + 1) * self.dim])
        } else {
            None
        }
    }

    /// Extent of a node's cell, once [`Self::geometry_data`] has run.
    pub fn extent_of(&self, node: usize) -> Option<&[f64]> {
        if self.has_geometry_data {
            Some(&self.ext[node * self.dim..(node + 1) * self.dim])
        } else {
            None
        }
    }

    /// Neighbors of a node in ascending order, once [`Self::neighbors`] has
    /// run.
    pub fn neighbors_of(&self, node: usize) -> Option<&[usize]> {
        if self.has_neighbor_data {
            Some(&self.nbori[self.nborp[node]..self.nborp[node + 1]])
        } else {
            None
        }
    }

    /// Interaction list of a node in ascending order, once
    /// [`Self::interaction_lists`] has run.
    pub fn interaction_list_of(&self, node: usize) -> Option<&[usize]> {
        if self.has_interaction_lists {
            Some(&self.ilsti[self.ilstp[node]..self.ilstp[node + 1]])
        } else {
            None
        }
    }

    /// The legacy two-row levels table of width `depth + 2`: row 0 holds the
    /// cumulative node-count offsets per level, row 1 is opaque metadata
    /// `(depth, dim, dim, ...)` kept for compatibility with older front ends.
    pub fn levels_table(&self) -> Vec<usize> {
        let width = self.depth + 2;
        let mut table = vec![0; 2 * width];
        table[..width].copy_from_slice(&self.lvlx);
        table[width] = self.depth;
        for entry in table[width + 1..].iter_mut() {
            *entry = self.dim;
        }
        table
    }
}

impl Tree for HyperOctree {
    fn get_dim(&self) -> usize {
        self.dim
    }

    fn get_depth(&self) -> usize {
        self.depth
    }

    fn get_node_count(&self) -> usize {
        self.node_count()
    }

    fn get_nodes(&self, level: usize) -> Option<Range<usize>> {
        if level <= self.depth {
            Some(self.lvlx[level]..self.lvlx[level + 1])
        } else {
            None
        }
    }

    fn get_level(&self, node: usize) -> Option<usize> {
        self.is_node(node).then(|| self.level_of(node))
    }

    fn get_parent(&self, node: usize) -> Option<usize> {
        (node != ROOT && self.is_node(node)).then(|| self.parent[node])
    }

    fn get_octant(&self, node: usize) -> Option<OctantMask> {
        self.is_node(node).then(|| self.octant[node])
    }

    fn get_objects(&self, node: usize) -> Option<&[usize]> {
        if self.is_node(node) {
            Some(self.objects_in(node))
        } else {
            None
        }
    }

    fn is_node(&self, node: usize) -> bool {
        node < self.node_count()
    }

    fn is_leaf(&self, node: usize) -> bool {
        self.is_node(node) && self.leaf[node]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_line_of_four() {
        let coordinates = [0.1, 0.4, 0.6, 0.9];
        let tree = HyperOctree::new(
            &coordinates,
            1,
            ElementType::Point,
            None,
            Some(1),
            None,
            Some(&[1.0]),
            true,
        )
        .unwrap();

        assert_eq!(tree.depth, 2);
        assert_eq!(tree.lvlx, vec![0, 1, 3, 7]);
        assert!((tree.domain.center[0] - 0.5).abs() < 1e-12);

        // Level 1 splits the points across the two halves.
        assert_eq!(tree.octant[1..3], [0, 1]);
        assert_eq!(tree.objects_in(1), &[0, 1]);
        assert_eq!(tree.objects_in(2), &[2, 3]);

        // Level 2 holds one point per leaf, in coordinate order.
        for k in 3..7 {
            assert_eq!(tree.xi_len[k], 1);
            assert!(tree.is_leaf(k));
        }
        assert_eq!(tree.xi, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_retained_elements() {
        // Four unit disks in the corners of a 4x4 box are too large to fit any
        // child cell, so the root is never subdivided.
        let coordinates = [0.0, 0.0, 4.0, 0.0, 0.0, 4.0, 4.0, 4.0];
        let sizes = [1.0; 4];
        for element_type in [ElementType::Element, ElementType::SparseElement] {
            let tree = HyperOctree::new(
                &coordinates,
                2,
                element_type,
                Some(&sizes),
                Some(1),
                None,
                Some(&[4.0, 4.0]),
                true,
            )
            .unwrap();

            assert_eq!(tree.depth, 0);
            assert_eq!(tree.node_count(), 1);
            assert!(tree.is_leaf(ROOT));
            assert_eq!(tree.objects_in(ROOT).len(), 4);
        }
    }

    #[test]
    fn test_partial_retention() {
        // One oversized disk stays at the root while the two small ones
        // descend; the retained index is excluded from every child range.
        let coordinates = [0.5, 0.5, 3.5, 3.5, 2.0, 2.0];
        let sizes = [0.1, 0.1, 1.5];
        let tree = HyperOctree::new(
            &coordinates,
            2,
            ElementType::Element,
            Some(&sizes),
            Some(1),
            None,
            Some(&[4.0, 4.0]),
            true,
        )
        .unwrap();

        assert_eq!(tree.depth, 1);
        assert_eq!(tree.node_count(), 3);
        let held: Vec<usize> = (1..3).flat_map(|k| tree.objects_in(k).to_vec()).collect();
        assert_eq!(held, vec![0, 1]);

        // Object 2 sits at the front of the root range.
        assert_eq!(tree.xi[0], 2);
    }

    #[test]
    fn test_max_depth_cap() {
        let coordinates = [0.1, 0.4, 0.6, 0.9];
        let tree = HyperOctree::new(
            &coordinates,
            1,
            ElementType::Point,
            None,
            Some(1),
            Some(1),
            Some(&[1.0]),
            true,
        )
        .unwrap();

        assert_eq!(tree.depth, 1);
        assert_eq!(tree.node_count(), 3);
    }

    #[test]
    fn test_coincident_points() {
        // Coincident points derive a zero extent and stop subdividing without
        // an error.
        let coordinates = [0.5, 0.5, 0.5, 0.5];
        let tree = HyperOctree::new(
            &coordinates,
            2,
            ElementType::Point,
            None,
            Some(1),
            None,
            None,
            true,
        )
        .unwrap();

        assert_eq!(tree.depth, 0);
        assert_eq!(tree.objects_in(ROOT).len(), 2);
    }

    #[test]
    fn test_invalid_input() {
        let coordinates = [0.1, 0.2, 0.3];

        assert_eq!(
            HyperOctree::new(&coordinates, 0, ElementType::Point, None, None, None, None, true)
                .err(),
            Some(TreeError::InvalidDimension(0))
        );
        assert_eq!(
            HyperOctree::new(&coordinates, 2, ElementType::Point, None, None, None, None, true)
                .err(),
            Some(TreeError::CoordinateShape { len: 3, dim: 2 })
        );
        assert_eq!(
            HyperOctree::new(&[], 1, ElementType::Point, None, None, None, None, true).err(),
            Some(TreeError::NoObjects)
        );
        assert_eq!(
            HyperOctree::new(&coordinates, 1, ElementType::Point, None, Some(0), None, None, true)
                .err(),
            Some(TreeError::InvalidOccupancy)
        );
        assert_eq!(
            HyperOctree::new(&coordinates, 1, ElementType::Element, None, None, None, None, true)
                .err(),
            Some(TreeError::MissingSizes)
        );
        assert_eq!(
            HyperOctree::new(
                &coordinates,
                1,
                ElementType::Element,
                Some(&[0.1, 0.1]),
                None,
                None,
                None,
                true
            )
            .err(),
            Some(TreeError::SizeShape { expected: 3, got: 2 })
        );
        assert_eq!(
            HyperOctree::new(
                &coordinates,
                1,
                ElementType::Element,
                Some(&[0.1, -0.2, 0.1]),
                None,
                None,
                None,
                true
            )
            .err(),
            Some(TreeError::NegativeSize { index: 1, size: -0.2 })
        );
        assert_eq!(
            HyperOctree::new(
                &coordinates,
                1,
                ElementType::Point,
                None,
                None,
                None,
                Some(&[1.0, 1.0]),
                true
            )
            .err(),
            Some(TreeError::ExtentShape { expected: 1, got: 2 })
        );
    }

    #[test]
    fn test_levels_table() {
        let coordinates = [0.1, 0.4, 0.6, 0.9];
        let tree = HyperOctree::new(
            &coordinates,
            1,
            ElementType::Point,
            None,
            Some(1),
            None,
            Some(&[1.0]),
            true,
        )
        .unwrap();

        let table = tree.levels_table();
        assert_eq!(table[..4], [0, 1, 3, 7]);
        assert_eq!(table[4], 2);
        assert_eq!(table[5..], [1, 1, 1]);
    }
}
