//! Methods for computing the computational domain from object data.
use crate::constants::DOMAIN_PADDING;
use crate::types::domain::Domain;

impl Domain {
    /// Compute the domain spanned by a set of objects with optional radii.
    /// The bounding box is inflated by each object's radius and padded by a
    /// small relative margin, so that no object sits exactly on the domain
    /// boundary. Axes along which every object coincides get zero extent and
    /// are never subdivided.
    pub fn from_points(coordinates: &[f64], sizes: Option<&[f64]>, dim: usize) -> Domain {
        let npoints = coordinates.len() / dim;
        let mut center = vec![0.0; dim];
        let mut extent = vec![0.0; dim];

        for j in 0..dim {
            let mut lo = f64::INFINITY;
            let mut hi = f64::NEG_INFINITY;
            for i in 0..npoints {
                let radius = sizes.map_or(0.0, |s| s[i]);
                let v = coordinates[i * dim + j];
                lo = lo.min(v - radius);
                hi = hi.max(v + radius);
            }
            center[j] = 0.5 * (lo + hi);
            extent[j] = (hi - lo) * (1.0 + DOMAIN_PADDING);
        }

        Domain { center, extent }
    }

    /// Merge user root extents into a derived domain. Entries greater than
    /// zero replace the derived extent along their axis; the rest keep the
    /// derived value.
    pub fn with_extents(mut self, extents: &[f64]) -> Domain {
        for (e, &user) in self.extent.iter_mut().zip(extents) {
            if user > 0.0 {
                *e = user;
            }
        }
        self
    }
}
