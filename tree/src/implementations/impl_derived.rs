//! Derived data over a constructed tree: child pointers, per-node geometry,
//! neighbor lists, and interaction lists.
//!
//! Every pass is idempotent and caches its output on the tree value, pulling
//! in its prerequisites on demand. Neighbor and interaction lists are emitted
//! per node in ascending node-index order into CSR form.
use rayon::prelude::*;
use tracing::debug;

use crate::{
    constants::ROOT,
    implementations::impl_octant::{adjacent, wrap_adjacent},
    types::{error::TreeError, single_node::HyperOctree},
};

/// Pack per-node lists into CSR offsets and indices.
fn flatten_csr(lists: &[Vec<usize>]) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = Vec::with_capacity(lists.len() + 1);
    offsets.push(0);
    let mut indices = Vec::new();
    for list in lists {
        indices.extend_from_slice(list);
        offsets.push(indices.len());
    }
    (offsets, indices)
}

impl HyperOctree {
    /// Materialize the CSR child pointers `(chldp, chld)`. Children of node
    /// `p` are the node indices `chld[chldp[p]..chldp[p + 1]]`, in ascending
    /// octant order. Idempotent.
    pub fn child_data(&mut self) -> (&[usize], &[usize]) {
        if !self.has_child_data {
            let nk = self.node_count();
            let mut counts = vec![0usize; nk];
            for k in 1..nk {
                counts[self.parent[k]] += 1;
            }

            let mut chldp = vec![0usize; nk + 1];
            for k in 0..nk {
                chldp[k + 1] = chldp[k] + counts[k];
            }

            // Breadth-first node order makes each parent's children land in
            // ascending index order, which is ascending octant order.
            let mut cursor = chldp[..nk].to_vec();
            let mut chld = vec![0usize; chldp[nk]];
            for k in 1..nk {
                let p = self.parent[k];
                chld[cursor[p]] = k;
                cursor[p] += 1;
            }

            debug!(entries = chld.len(), "materialized child data");
            self.chldp = chldp;
            self.chld = chld;
            self.has_child_data = true;
        }
        (&self.chldp, &self.chld)
    }

    /// Materialize per-node centers and extents `(ctr, ext)`, top down from
    /// the root geometry along each node's octant chain. Extents halve once
    /// per level; zero extents stay zero. Idempotent.
    pub fn geometry_data(&mut self) -> (&[f64], &[f64]) {
        if !self.has_geometry_data {
            let nk = self.node_count();
            let dim = self.dim;
            let mut ctr = vec![0.0; nk * dim];
            let mut ext = vec![0.0; nk * dim];
            ctr[..dim].copy_from_slice(&self.domain.center);
            ext[..dim].copy_from_slice(&self.domain.extent);

            for k in 1..nk {
                let p = self.parent[k];
                for j in 0..dim {
                    let parent_ext = ext[p * dim + j];
                    ext[k * dim + j] = 0.5 * parent_ext;
                    let shift = 0.25 * parent_ext;
                    ctr[k * dim + j] = if self.octant[k] >> j & 1 == 1 {
                        ctr[p * dim + j] + shift
                    } else {
                        ctr[p * dim + j] - shift
                    };
                }
            }

            debug!(nodes = nk, "materialized node geometry");
            self.ctr = ctr;
            self.ext = ext;
            self.has_geometry_data = true;
        }
        (&self.ctr, &self.ext)
    }

    /// Materialize the CSR neighbor lists `(nborp, nbori)` under the given
    /// per-axis periodicity flags; `None` marks every axis aperiodic. The
    /// period along a periodic axis is the root extent.
    ///
    /// In point mode the neighbors of a node are the same-level nodes whose
    /// cells touch or overlap it. In element modes they additionally include
    /// coarser non-ancestor nodes adjacent to the node's cell, since objects
    /// retained on a coarser node may influence it. Under periodicity all
    /// displacements are reduced to their minimum image, and a node whose
    /// cell reaches the period (or an ancestor reappearing across the wrap)
    /// is included as well.
    ///
    /// Idempotent per flag value; a different value replaces the previous
    /// lists and drops interaction lists derived from them.
    pub fn neighbors(&mut self, per: Option<&[bool]>) -> Result<(&[usize], &[usize]), TreeError> {
        let mask = match per {
            None => 0u32,
            Some(flags) => {
                if flags.len() != self.dim {
                    return Err(TreeError::PeriodicityShape {
                        expected: self.dim,
                        got: flags.len(),
                    });
                }
                flags
                    .iter()
                    .enumerate()
                    .fold(0u32, |acc, (j, &p)| if p { acc | 1 << j } else { acc })
            }
        };

        if !self.has_neighbor_data || self.periods != mask {
            self.build_neighbor_lists(mask);
        }
        Ok((&self.nborp, &self.nbori))
    }

    fn build_neighbor_lists(&mut self, mask: u32) {
        self.child_data();
        self.geometry_data();

        let this = &*self;
        let dim = this.dim;
        let elem = this.element_type.is_element();
        let chldp = this.chldp.as_slice();
        let chld = this.chld.as_slice();
        let ctr = this.ctr.as_slice();
        let ext = this.ext.as_slice();
        let periods = (0..dim)
            .map(|j| {
                if mask >> j & 1 == 1 {
                    this.domain.extent[j]
                } else {
                    0.0
                }
            })
            .collect::<Vec<_>>();

        let cell = |k: usize| (&ctr[k * dim..(k + 1) * dim], &ext[k * dim..(k + 1) * dim]);
        let kids = |k: usize| &chld[chldp[k]..chldp[k + 1]];

        let mut lists: Vec<Vec<usize>> = Vec::with_capacity(this.node_count());
        let (root_ctr, root_ext) = cell(ROOT);
        lists.push(
            if wrap_adjacent(root_ctr, root_ext, root_ctr, root_ext, &periods) {
                vec![ROOT]
            } else {
                Vec::new()
            },
        );

        // Candidates at each level come from the parent's list: children of
        // its same-level entries plus the node's own siblings, and for
        // element modes the entries themselves as coarser colleagues. Levels
        // depend only on coarser ones, so each level maps in parallel.
        for level in 1..=this.depth {
            let begin = this.lvlx[level];
            let end = this.lvlx[level + 1];
            let level_lists: Vec<Vec<usize>> = (begin..end)
                .into_par_iter()
                .map(|a| {
                    let p = this.parent[a];
                    let mut cand: Vec<usize> = Vec::new();
                    cand.extend_from_slice(kids(p));
                    for &n in &lists[p] {
                        if this.level_of(n) + 1 == level {
                            cand.extend_from_slice(kids(n));
                        }
                        if elem {
                            cand.push(n);
                        }
                    }
                    cand.sort_unstable();
                    cand.dedup();

                    let (ctr_a, ext_a) = cell(a);
                    cand.retain(|&b| {
                        let (ctr_b, ext_b) = cell(b);
                        if this.is_ancestor_or_self(b, a) {
                            wrap_adjacent(ctr_a, ext_a, ctr_b, ext_b, &periods)
                        } else {
                            adjacent(ctr_a, ext_a, ctr_b, ext_b, &periods)
                        }
                    });
                    cand
                })
                .collect();
            lists.extend(level_lists);
        }

        let (nborp, nbori) = flatten_csr(&lists);
        debug!(
            entries = nbori.len(),
            periodicity = mask,
            "materialized neighbor lists"
        );
        self.nborp = nborp;
        self.nbori = nbori;
        self.periods = mask;
        self.has_neighbor_data = true;
        // Interaction lists derived from the previous periodicity are stale.
        self.has_interaction_lists = false;
        self.ilstp = Vec::new();
        self.ilsti = Vec::new();
    }

    /// Materialize the CSR interaction lists `(ilstp, ilsti)`: for each node,
    /// the children of its parent's neighbors (the parent included) that are
    /// not neighbors of the node itself, and in element modes additionally
    /// the coarser neighbors of the parent that are not neighbors of the
    /// node. The root has an empty list.
    ///
    /// Idempotent; builds aperiodic neighbor data first if none is present.
    pub fn interaction_lists(&mut self) -> (&[usize], &[usize]) {
        if !self.has_interaction_lists {
            if !self.has_neighbor_data {
                self.build_neighbor_lists(0);
            }
            self.build_interaction_lists();
        }
        (&self.ilstp, &self.ilsti)
    }

    fn build_interaction_lists(&mut self) {
        self.child_data();

        let this = &*self;
        let elem = this.element_type.is_element();
        let chldp = this.chldp.as_slice();
        let chld = this.chld.as_slice();
        let nborp = this.nborp.as_slice();
        let nbori = this.nbori.as_slice();

        let kids = |k: usize| &chld[chldp[k]..chldp[k + 1]];
        let nbrs = |k: usize| &nbori[nborp[k]..nborp[k + 1]];

        let lists: Vec<Vec<usize>> = (0..this.node_count())
            .into_par_iter()
            .map(|a| {
                if a == ROOT {
                    return Vec::new();
                }
                let p = this.parent[a];
                let mut cand: Vec<usize> = Vec::new();
                cand.extend_from_slice(kids(p));
                for &n in nbrs(p) {
                    cand.extend_from_slice(kids(n));
                    if elem {
                        cand.push(n);
                    }
                }
                cand.sort_unstable();
                cand.dedup();
                cand.retain(|&b| {
                    b != a
                        && nbrs(a).binary_search(&b).is_err()
                        && !this.is_ancestor_or_self(b, a)
                });
                cand
            })
            .collect();

        let (ilstp, ilsti) = flatten_csr(&lists);
        debug!(entries = ilsti.len(), "materialized interaction lists");
        self.ilstp = ilstp;
        self.ilsti = ilsti;
        self.has_interaction_lists = true;
    }
}

#[cfg(test)]
mod test {
    use crate::constants::ROOT;
    use crate::types::element::ElementType;
    use crate::types::single_node::HyperOctree;

    fn line_tree(per_cell: &[f64], occupancy: usize) -> HyperOctree {
        HyperOctree::new(
            per_cell,
            1,
            ElementType::Point,
            None,
            Some(occupancy),
            None,
            Some(&[1.0]),
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_child_data() {
        let mut tree = line_tree(&[0.1, 0.4, 0.6, 0.9], 1);
        let (chldp, chld) = tree.child_data();

        assert_eq!(chldp, &[0, 2, 4, 6, 6, 6, 6, 6]);
        assert_eq!(chld, &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_geometry_data() {
        let mut tree = line_tree(&[0.1, 0.4, 0.6, 0.9], 1);
        let (ctr, ext) = tree.geometry_data();

        assert_eq!(ctr, &[0.5, 0.25, 0.75, 0.125, 0.375, 0.625, 0.875]);
        assert_eq!(ext, &[1.0, 0.5, 0.5, 0.25, 0.25, 0.25, 0.25]);
    }

    #[test]
    fn test_neighbors_line() {
        let mut tree = line_tree(&[0.1, 0.4, 0.6, 0.9], 1);
        tree.neighbors(None).unwrap();

        assert_eq!(tree.neighbors_of(ROOT).unwrap(), &[] as &[usize]);
        assert_eq!(tree.neighbors_of(1).unwrap(), &[2]);
        assert_eq!(tree.neighbors_of(2).unwrap(), &[1]);
        // Interior leaves see both sides, the outermost only one.
        assert_eq!(tree.neighbors_of(3).unwrap(), &[4]);
        assert_eq!(tree.neighbors_of(4).unwrap(), &[3, 5]);
        assert_eq!(tree.neighbors_of(5).unwrap(), &[4, 6]);
        assert_eq!(tree.neighbors_of(6).unwrap(), &[5]);
    }

    #[test]
    fn test_neighbors_periodic_wrap() {
        let coordinates = [0.01, 0.26, 0.74, 0.99];
        let mut tree = line_tree(&coordinates, 1);

        tree.neighbors(Some(&[false])).unwrap();
        let plain: Vec<usize> = tree.neighbors_of(3).unwrap().to_vec();
        assert_eq!(plain, vec![4]);

        tree.neighbors(Some(&[true])).unwrap();
        // The outermost leaves meet through the wrap, and the root sees its
        // own image.
        assert_eq!(tree.neighbors_of(ROOT).unwrap(), &[ROOT]);
        assert_eq!(tree.neighbors_of(3).unwrap(), &[4, 6]);
        assert_eq!(tree.neighbors_of(6).unwrap(), &[3, 5]);
    }

    #[test]
    fn test_neighbors_rebuild_on_new_periods() {
        let mut tree = line_tree(&[0.01, 0.26, 0.74, 0.99], 1);

        tree.neighbors(Some(&[true])).unwrap();
        tree.interaction_lists();
        assert!(tree.has_interaction_lists);

        // Changing the periodicity replaces the lists and drops the stale
        // interaction data.
        tree.neighbors(None).unwrap();
        assert!(!tree.has_interaction_lists);
        assert!(tree.ilsti.is_empty());
        assert_eq!(tree.neighbors_of(3).unwrap(), &[4]);
    }

    #[test]
    fn test_interaction_lists_line() {
        let mut tree = line_tree(&[0.1, 0.4, 0.6, 0.9], 1);
        tree.interaction_lists();

        // Nothing is well separated at the root or its children.
        assert_eq!(tree.interaction_list_of(ROOT).unwrap(), &[] as &[usize]);
        assert_eq!(tree.interaction_list_of(1).unwrap(), &[] as &[usize]);
        assert_eq!(tree.interaction_list_of(2).unwrap(), &[] as &[usize]);
        // At level 2 the far cousins appear.
        assert_eq!(tree.interaction_list_of(3).unwrap(), &[5, 6]);
        assert_eq!(tree.interaction_list_of(4).unwrap(), &[6]);
        assert_eq!(tree.interaction_list_of(5).unwrap(), &[3]);
        assert_eq!(tree.interaction_list_of(6).unwrap(), &[3, 4]);
    }

    #[test]
    fn test_element_neighbors_include_coarse() {
        // A large disk pins object 2 at the root; the small disks descend one
        // level. The level-1 cells see the root as a coarser colleague.
        let coordinates = [0.5, 0.5, 3.5, 3.5, 2.0, 2.0];
        let sizes = [0.1, 0.1, 1.5];
        let mut tree = HyperOctree::new(
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

        tree.neighbors(None).unwrap();
        assert_eq!(tree.node_count(), 3);
        // Aperiodic ancestors stay out of the lists; the two level-1 cells
        // only touch each other.
        assert_eq!(tree.neighbors_of(1).unwrap(), &[2]);
        assert_eq!(tree.neighbors_of(2).unwrap(), &[1]);

        tree.neighbors(Some(&[true, true])).unwrap();
        // Across the wrap the root reappears next to its own children.
        assert_eq!(tree.neighbors_of(1).unwrap(), &[ROOT, 2]);
        assert_eq!(tree.neighbors_of(2).unwrap(), &[ROOT, 1]);
    }

    #[test]
    fn test_retained_root_self_neighbor() {
        let coordinates = [0.0, 0.0, 4.0, 0.0, 0.0, 4.0, 4.0, 4.0];
        let sizes = [1.0; 4];
        let mut tree = HyperOctree::new(
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

        tree.neighbors(Some(&[true, true])).unwrap();
        assert_eq!(tree.neighbors_of(ROOT).unwrap(), &[ROOT]);

        tree.neighbors(None).unwrap();
        assert_eq!(tree.neighbors_of(ROOT).unwrap(), &[] as &[usize]);
    }
}
