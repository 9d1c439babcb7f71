//! # Type declaration
pub mod domain;
pub mod element;
pub mod error;
pub mod octant;
pub mod single_node;
