//! Core traits for kdcrate

use crate::point::Real;
use nalgebra::Point3;

/// Trait for nearest neighbor search functionality.
///
/// Distances are squared Euclidean distances; take the square root of the
/// final results if true distances are needed.
pub trait NearestNeighborSearch<T: Real> {
    /// Find the k nearest neighbors to a query point, closest first
    fn find_k_nearest(&self, query: &Point3<T>, k: usize) -> Vec<(usize, T)>;

    /// Find all neighbors whose squared distance to `query` is at most `radius_squared`
    fn find_radius_neighbors(&self, query: &Point3<T>, radius_squared: T) -> Vec<(usize, T)>;
}
