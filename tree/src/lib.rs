//! # Adaptive Hyperoctrees in Rust
//!
//! Construction and querying of adaptive, axis-aligned spatial trees in
//! arbitrary dimension, together with the derived data (child pointers, node
//! geometry, neighbor lists, interaction lists) consumed by fast multipole and
//! related hierarchical algorithms.
//!
//! ## References
//! \[1\] Greengard, Leslie, and Vladimir Rokhlin. "A fast algorithm for particle
//! simulations." Journal of Computational Physics 73.2 (1987): 325-348.
//!
//! \[2\] Sundar, Hari, Rahul S. Sampath, and George Biros. "Bottom-up construction
//! and 2:1 balance refinement of linear octrees in parallel." SIAM Journal on
//! Scientific Computing 30.5 (2008): 2675-2708.
//!
//! \[3\] Carrier, J., Leslie Greengard, and Vladimir Rokhlin. "A fast adaptive
//! multipole algorithm for particle simulations." SIAM Journal on Scientific and
//! Statistical Computing 9.4 (1988): 669-686.
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod constants;
pub mod implementations;
pub mod types;
