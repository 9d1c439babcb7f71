//! Geometric primitives over axis-aligned cells in d dimensions.
use itertools::izip;

use crate::constants::ADJACENCY_TOL;
use crate::types::octant::OctantMask;

/// Octant of `x` within a cell centered at `center`: bit `j` is set iff
/// `x[j] >= center[j]`, so objects on a center plane go to the upper half.
pub fn octant_of(center: &[f64], x: &[f64]) -> OctantMask {
    let mut mask: OctantMask = 0;
    for (j, (c, v)) in center.iter().zip(x).enumerate() {
        if v >= c {
            mask |= 1 << j;
        }
    }
    mask
}

/// Center of the child cell selected by `mask` within the given parent cell.
pub fn child_center(parent_center: &[f64], parent_extent: &[f64], mask: OctantMask) -> Vec<f64> {
    izip!(parent_center, parent_extent)
        .enumerate()
        .map(|(j, (c, e))| {
            if mask >> j & 1 == 1 {
                c + 0.25 * e
            } else {
                c - 0.25 * e
            }
        })
        .collect()
}

/// Whether the cell fully contains the ball of the given radius centered at
/// `x`, boundary included.
pub fn contains(center: &[f64], extent: &[f64], x: &[f64], radius: f64) -> bool {
    izip!(center, extent, x).all(|(c, e, v)| (v - c).abs() + radius <= 0.5 * e)
}

/// Whether two cells touch or overlap. Displacements along periodic axes
/// (entries of `periods` greater than zero) are reduced to their minimum
/// image first.
pub fn adjacent(
    ctr_a: &[f64],
    ext_a: &[f64],
    ctr_b: &[f64],
    ext_b: &[f64],
    periods: &[f64],
) -> bool {
    izip!(ctr_a, ext_a, ctr_b, ext_b, periods).all(|(ca, ea, cb, eb, &period)| {
        let reach = 0.5 * (ea + eb) * (1.0 + ADJACENCY_TOL);
        let mut delta = cb - ca;
        if period > 0.0 {
            delta -= (delta / period).round() * period;
        }
        delta.abs() <= reach
    })
}

/// Whether some nonzero periodic image of cell `b` touches or overlaps cell
/// `a`. This decides membership for a cell neighboring itself, or a cell
/// reappearing next to one of its own descendants across the wrap; the
/// identity image is excluded.
pub fn wrap_adjacent(
    ctr_a: &[f64],
    ext_a: &[f64],
    ctr_b: &[f64],
    ext_b: &[f64],
    periods: &[f64],
) -> bool {
    let mut shifted = false;
    for (ca, ea, cb, eb, &period) in izip!(ctr_a, ext_a, ctr_b, ext_b, periods) {
        let reach = 0.5 * (ea + eb) * (1.0 + ADJACENCY_TOL);
        let delta = cb - ca;
        let direct = delta.abs() <= reach;
        let wrapped = period > 0.0
            && ((delta + period).abs() <= reach || (delta - period).abs() <= reach);
        if !direct && !wrapped {
            return false;
        }
        if wrapped {
            shifted = true;
        }
    }
    shifted
}
