//! Data structures for hyperoctrees held in memory on a single node.
use crate::types::{domain::Domain, element::ElementType, octant::OctantMask};

/// An adaptive hyperoctree over a set of geometric objects in `dim`-space.
///
/// Nodes are stored in breadth-first order, with the root at index 0 and
/// siblings emitted in ascending octant-mask order. The base representation is
/// a set of parallel arrays over nodes, plus the permutation `xi` of object
/// indices that every node's `xi_off`/`xi_len` range points into. Derived data
/// (child pointers, per-node geometry, neighbor and interaction lists) are
/// materialized lazily into plain buffers, each guarded by a `has_*` flag that
/// records whether its pass has run.
#[derive(Debug, Clone)]
pub struct HyperOctree {
    /// Spatial dimension.
    pub dim: usize,

    /// The kind of object the tree was built over.
    pub element_type: ElementType,

    /// Whether subdivision was adaptive (per node) or uniform (per level).
    pub adaptive: bool,

    /// Maximum leaf occupancy used during construction.
    pub occupancy: usize,

    /// The computational domain covered by the root cell.
    pub domain: Domain,

    /// Depth of the tree in levels beyond the root.
    pub depth: usize,

    /// Parent node index per node; 0 for the root by convention.
    pub parent: Vec<usize>,

    /// Child octant within the parent per node; 0 for the root by convention.
    pub octant: Vec<OctantMask>,

    /// Permutation of object indices. Each node's range below points into this
    /// buffer, and child ranges are carved from their parent's range.
    pub xi: Vec<usize>,

    /// Start of each node's object range within `xi`.
    pub xi_off: Vec<usize>,

    /// Length of each node's object range within `xi`.
    pub xi_len: Vec<usize>,

    /// Cumulative node counts per level: level `l` holds the node indices
    /// `lvlx[l]..lvlx[l + 1]`, and the last entry is the total node count.
    pub lvlx: Vec<usize>,

    /// Whether each node was left unsubdivided.
    pub leaf: Vec<bool>,

    /// Whether `chldp`/`chld` have been materialized.
    pub has_child_data: bool,

    /// CSR offsets into `chld`; empty until `child_data` runs.
    pub chldp: Vec<usize>,

    /// Children of node `p`, in ascending octant order, at
    /// `chld[chldp[p]..chldp[p + 1]]`; empty until `child_data` runs.
    pub chld: Vec<usize>,

    /// Whether `ctr`/`ext` have been materialized.
    pub has_geometry_data: bool,

    /// Node centers, `dim` entries per node; empty until `geometry_data` runs.
    pub ctr: Vec<f64>,

    /// Node extents (full side lengths), `dim` entries per node; empty until
    /// `geometry_data` runs.
    pub ext: Vec<f64>,

    /// Whether `nborp`/`nbori` have been materialized.
    pub has_neighbor_data: bool,

    /// Periodicity bitmask the neighbor data was built for; bit `j` marks axis
    /// `j` as periodic with period equal to the root extent. Meaningful once
    /// neighbor data is present.
    pub periods: u32,

    /// CSR offsets into `nbori`; empty until `neighbors` runs.
    pub nborp: Vec<usize>,

    /// Neighbor node indices in ascending order per node; empty until
    /// `neighbors` runs.
    pub nbori: Vec<usize>,

    /// Whether `ilstp`/`ilsti` have been materialized.
    pub has_interaction_lists: bool,

    /// CSR offsets into `ilsti`; empty until `interaction_lists` runs.
    pub ilstp: Vec<usize>,

    /// Interaction-list node indices in ascending order per node; empty until
    /// `interaction_lists` runs.
    pub ilsti: Vec<usize>,
}

/// Level-by-level node assignments for a batch of query objects, as produced
/// by [`HyperOctree::search`].
///
/// Row `i` holds, for each stored level, the node containing query `i`, or
/// `None` once no cell at that level fully contains it. A `None` is never
/// followed by a `Some` within a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Traversal {
    /// Number of stored levels per query (capped depth plus one for the root).
    pub levels: usize,

    /// Row-major assignments, one row of `levels` entries per query.
    pub data: Vec<Option<usize>>,
}
