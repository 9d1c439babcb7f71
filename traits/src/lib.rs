//! Trait definitions for the hyperoct library
#![cfg_attr(feature = "strict", deny(warnings))]
pub mod tree;
