//! Data structures describing the geometric objects a tree is built over.

/// Coordinate scalar type.
pub type PointType = f64;

/// The kind of geometric object held by a tree.
///
/// The element type controls subdivision and adjacency: point-like objects
/// always descend to finer levels, while finite-size elements whose radius no
/// longer fits a child cell are retained at the coarsest node that resolves
/// them, and adjacency at coarser levels becomes relevant for neighbor data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ElementType {
    /// Zero-size objects; per-object sizes are ignored.
    #[default]
    Point,
    /// Finite-size objects bounded by a per-object radius.
    Element,
    /// Finite-size objects represented only at their highest containing node.
    SparseElement,
}

impl ElementType {
    /// Whether objects of this type carry a finite radius.
    pub fn is_element(&self) -> bool {
        !matches!(self, ElementType::Point)
    }
}
