//! Helper functions for generating object distributions used in tests.
use rand::prelude::*;
use rand::SeedableRng;

/// Points fixture for testing, uniformly sampling each axis from min to max
/// (defaulting to the unit cube) with a fixed seed. Returns `dim` interleaved
/// entries per object.
pub fn points_fixture(npoints: usize, dim: usize, min: Option<f64>, max: Option<f64>) -> Vec<f64> {
    let mut range = StdRng::seed_from_u64(0);

    let between;
    if let (Some(min), Some(max)) = (min, max) {
        between = rand::distributions::Uniform::from(min..max);
    } else {
        between = rand::distributions::Uniform::from(0.0_f64..1.0_f64);
    }

    let mut points = Vec::with_capacity(npoints * dim);
    for _ in 0..npoints * dim {
        points.push(between.sample(&mut range));
    }

    points
}

/// Points fixture placing objects on the unit circle in the plane.
pub fn points_on_circle(npoints: usize) -> Vec<f64> {
    let mut points = Vec::with_capacity(2 * npoints);
    for i in 0..npoints {
        let theta = 2.0 * std::f64::consts::PI * (i as f64) / (npoints as f64);
        points.push(theta.cos());
        points.push(theta.sin());
    }

    points
}
