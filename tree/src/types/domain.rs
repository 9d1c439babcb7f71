//! Data structures and methods for defining the computational domain.
use crate::types::element::PointType;

/// The computational domain covered by the root cell, defined by its center and
/// its full side length along each Cartesian axis. Zero extents are permitted
/// and mark axes the tree never subdivides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    /// Center coordinate of the root cell.
    pub center: Vec<PointType>,
    /// Full side length of the root cell along each axis.
    pub extent: Vec<PointType>,
}
