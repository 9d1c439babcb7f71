//! Mapping query objects onto their containing nodes, level by level.
use rayon::prelude::*;
use tracing::debug;

use crate::{
    constants::ROOT,
    implementations::impl_octant::{contains, octant_of},
    types::{
        error::TreeError,
        single_node::{HyperOctree, Traversal},
    },
};

impl HyperOctree {
    /// Locate each query object at every level of the tree.
    ///
    /// The walk starts at the root and descends, per level, into the unique
    /// child selected by the query's octant, as long as that child's cell
    /// fully contains the query under its optional radius. Once no such child
    /// exists, because the object straddles an octant boundary or the branch
    /// ends, the remaining levels map to `None`. The walk stops at the tree
    /// depth or at `max_level`, whichever is smaller.
    ///
    /// # Arguments
    /// * `queries` - Query coordinates, `dim` interleaved entries per object.
    /// * `sizes` - Optional per-query radius.
    /// * `max_level` - Optional cap on the deepest level searched.
    pub fn search(
        &mut self,
        queries: &[f64],
        sizes: Option<&[f64]>,
        max_level: Option<usize>,
    ) -> Result<Traversal, TreeError> {
        let dim = self.dim;
        if queries.len() % dim != 0 {
            return Err(TreeError::CoordinateShape {
                len: queries.len(),
                dim,
            });
        }
        let nqueries = queries.len() / dim;

        if let Some(siz) = sizes {
            if siz.len() != nqueries {
                return Err(TreeError::SizeShape {
                    expected: nqueries,
                    got: siz.len(),
                });
            }
            for (index, &size) in siz.iter().enumerate() {
                if size < 0.0 {
                    return Err(TreeError::NegativeSize { index, size });
                }
            }
        }

        self.child_data();
        self.geometry_data();

        let this = &*self;
        let chldp = this.chldp.as_slice();
        let chld = this.chld.as_slice();
        let ctr = this.ctr.as_slice();
        let ext = this.ext.as_slice();

        let cell = |k: usize| (&ctr[k * dim..(k + 1) * dim], &ext[k * dim..(k + 1) * dim]);
        let kids = |k: usize| &chld[chldp[k]..chldp[k + 1]];

        let levels = max_level.map_or(this.depth, |cap| cap.min(this.depth)) + 1;

        let rows: Vec<Vec<Option<usize>>> = (0..nqueries)
            .into_par_iter()
            .map(|i| {
                let mut row = vec![None; levels];
                let y = &queries[i * dim..(i + 1) * dim];
                let radius = sizes.map_or(0.0, |s| s[i]);

                let (root_ctr, root_ext) = cell(ROOT);
                if !contains(root_ctr, root_ext, y, radius) {
                    return row;
                }
                row[0] = Some(ROOT);

                let mut node = ROOT;
                for slot in row.iter_mut().skip(1) {
                    let children = kids(node);
                    let (node_ctr, _) = cell(node);
                    let target = octant_of(node_ctr, y);
                    let child = match children
                        .binary_search_by_key(&target, |&c| this.octant[c])
                    {
                        Ok(pos) => children[pos],
                        Err(_) => break,
                    };
                    let (child_ctr, child_ext) = cell(child);
                    if !contains(child_ctr, child_ext, y, radius) {
                        break;
                    }
                    *slot = Some(child);
                    node = child;
                }
                row
            })
            .collect();

        let data = rows.into_iter().flatten().collect();
        debug!(queries = nqueries, levels, "searched tree");
        Ok(Traversal { levels, data })
    }
}

impl Traversal {
    /// Number of query rows held.
    pub fn num_queries(&self) -> usize {
        if self.levels == 0 {
            0
        } else {
            self.data.len() / self.levels
        }
    }

    /// The level-by-level assignment of one query.
    pub fn row(&self, query: usize) -> &[Option<usize>] {
        &self.data[query * self.levels..(query + 1) * self.levels]
    }

    /// The node holding a query at a given level, if any.
    pub fn node_at(&self, query: usize, level: usize) -> Option<usize> {
        self.row(query)[level]
    }
}
