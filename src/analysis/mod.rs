//! Analysis modules.
//!
//! Grouping of raw labels and the per-group statistics built from them.

pub mod aggregator;

pub use aggregator::*;
