//! # kdcrate Index
//!
//! A static k-d tree for 3D points.
//!
//! The tree is built once over any [`kdcrate_core::SpatialDataset`] and then
//! answers k-nearest-neighbor and radius queries, single or batched, by
//! branch-and-bound traversal over per-node bounding boxes.

pub mod config;
pub mod result_set;
pub mod kdtree;
pub mod brute_force;
pub mod store_ops;

// Re-export commonly used items
pub use config::*;
pub use result_set::*;
pub use kdtree::*;
pub use brute_force::*;
pub use store_ops::*;
