//! Crate level constants.
use crate::types::octant::OctantMask;

/// Widest supported spatial dimension, fixed by the octant mask representation.
pub const MAX_DIM: usize = 8 * std::mem::size_of::<OctantMask>();

/// Default maximum leaf occupancy.
pub const NCRIT: usize = 150;

/// Node index of the root.
pub const ROOT: usize = 0;

/// Hard cap on subdivision depth. Extents halve once per level, so levels past
/// this point carry no usable floating point resolution.
pub const DEEPEST_LEVEL: usize = 1024;

/// Relative padding applied to root extents derived from a bounding box, so
/// that no object sits exactly on the boundary of the computational domain.
pub const DOMAIN_PADDING: f64 = 1e-10;

/// Relative slack in cell adjacency tests, absorbing roundoff in centers
/// obtained by repeated halving.
pub const ADJACENCY_TOL: f64 = 1e-12;
