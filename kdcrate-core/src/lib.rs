//! Core data structures and traits for kdcrate
//!
//! This crate provides the point types, immutable point stores, bounding
//! boxes and the dataset/search traits shared by the index implementations.

pub mod point;
pub mod point_store;
pub mod bbox;
pub mod dataset;
pub mod traits;
pub mod error;

pub use point::*;
pub use point_store::*;
pub use bbox::*;
pub use dataset::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::Point3;
