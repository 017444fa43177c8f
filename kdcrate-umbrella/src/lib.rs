//! # kdcrate
//!
//! Static k-d tree neighbor search over 3D point sets.
//!
//! This is the umbrella crate that provides convenient access to all kdcrate functionality.
//! You can use this crate to get everything in one place, or use individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Point types, point stores, bounding boxes and search traits
//! - **Index**: k-d tree build, k-nearest and radius queries, brute-force reference search
//!
//! ## Quick Start
//!
//! ```rust
//! use kdcrate::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     // Build a store from a flat x, y, z buffer
//!     let store = PointStore::from_flat(&[
//!         0.0f32, 0.0, 0.0,
//!         1.0, 0.0, 0.0,
//!         0.0, 1.0, 0.0,
//!         5.0, 5.0, 5.0,
//!     ])?;
//!
//!     // Index it once, query many times
//!     let tree = KdTree::build(&store, 10)?;
//!     let nearest = tree.knn_search(&Point3f::new(0.0, 0.0, 0.1), 2);
//!     assert_eq!(nearest[0].index, 0);
//!
//!     let within = tree.radius_search(&Point3f::origin(), 1.0);
//!     assert_eq!(within.len(), 3);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core and index
//! - `index`: k-d tree and search algorithms

// Re-export core functionality
pub use kdcrate_core::*;

// Re-export sub-crates
#[cfg(feature = "index")]
pub use kdcrate_index as index;

/// Convenient imports for common use cases
pub mod prelude {
    pub use kdcrate_core::*;

    #[cfg(feature = "index")]
    pub use kdcrate_index::*;
}
