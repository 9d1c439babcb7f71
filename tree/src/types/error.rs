//! Error types surfaced by tree construction and queries.
/// Failure modes of tree construction and search. Invalid inputs are reported
/// at call entry; a failed construction yields no tree.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// Dimension outside the supported range `1..=MAX_DIM`.
    #[error("unsupported dimension {0}")]
    InvalidDimension(usize),

    /// Coordinate buffer length is empty or not a multiple of the dimension.
    #[error("coordinate buffer of length {len} does not hold d = {dim} entries per object")]
    CoordinateShape {
        /// Length of the offending buffer.
        len: usize,
        /// Requested dimension.
        dim: usize,
    },

    /// A tree needs at least one object.
    #[error("at least one object is required")]
    NoObjects,

    /// Maximum leaf occupancy below one.
    #[error("leaf occupancy must be at least 1")]
    InvalidOccupancy,

    /// Element modes need a size per object.
    #[error("element types carry a radius, but no sizes were supplied")]
    MissingSizes,

    /// Size buffer does not match the number of objects.
    #[error("expected {expected} sizes, got {got}")]
    SizeShape {
        /// Number of objects.
        expected: usize,
        /// Length of the supplied size buffer.
        got: usize,
    },

    /// A negative per-object radius.
    #[error("object {index} has negative size {size}")]
    NegativeSize {
        /// Offending object index.
        index: usize,
        /// The supplied radius.
        size: f64,
    },

    /// Root extent buffer does not match the dimension.
    #[error("expected {expected} root extent entries, got {got}")]
    ExtentShape {
        /// The tree dimension.
        expected: usize,
        /// Length of the supplied extent buffer.
        got: usize,
    },

    /// Periodicity flags do not match the dimension.
    #[error("expected {expected} periodicity flags, got {got}")]
    PeriodicityShape {
        /// The tree dimension.
        expected: usize,
        /// Length of the supplied flag buffer.
        got: usize,
    },

    /// Zero root extent along every axis while the objects are not coincident.
    #[error("root extent is zero along every axis but the objects are not coincident")]
    DegenerateExtent,

    /// Subdivision ran past the hard depth cap.
    #[error("subdivision exceeded the maximum supported depth {0}")]
    DepthOverflow(usize),
}
