//! Neighborhood queries over every point of a store

use crate::kdtree::KdTree;
use crate::result_set::Neighbor;
use kdcrate_core::{PointStore, Real, Result};
use rayon::prelude::*;

/// Extension trait for PointStore to compute per-point neighborhoods
pub trait PointStoreNeighbors<T: Real> {
    /// For every point, its `k` nearest other points, closest first.
    ///
    /// Builds a temporary index with the default configuration. The point
    /// itself is excluded, so each entry holds `min(k, N - 1)` neighbors.
    ///
    /// # Example
    /// ```rust
    /// use kdcrate_core::{Point3f, PointStore};
    /// use kdcrate_index::PointStoreNeighbors;
    ///
    /// let store = PointStore::from_points(vec![
    ///     Point3f::new(0.0, 0.0, 0.0),
    ///     Point3f::new(1.0, 0.0, 0.0),
    ///     Point3f::new(0.0, 1.0, 0.0),
    /// ]);
    ///
    /// let neighbors = store.k_nearest_neighbors(1).unwrap();
    /// assert_eq!(neighbors[1][0].index, 0);
    /// ```
    fn k_nearest_neighbors(&self, k: usize) -> Result<Vec<Vec<Neighbor<T>>>>;

    /// For every point, the other points within `radius_squared`, in no particular order
    fn radius_neighbors(&self, radius_squared: T) -> Result<Vec<Vec<Neighbor<T>>>>;
}

impl<T: Real> PointStoreNeighbors<T> for PointStore<T> {
    fn k_nearest_neighbors(&self, k: usize) -> Result<Vec<Vec<Neighbor<T>>>> {
        if self.is_empty() || k == 0 {
            return Ok(vec![Vec::new(); self.len()]);
        }

        let tree = KdTree::build_with_config(self, &Default::default())?;

        Ok(self
            .points()
            .par_iter()
            .enumerate()
            .map(|(i, query)| {
                // +1 to make room for the point itself
                let mut neighbors = tree.knn_search(query, k.saturating_add(1));
                neighbors.retain(|n| n.index != i);
                neighbors.truncate(k);
                neighbors
            })
            .collect())
    }

    fn radius_neighbors(&self, radius_squared: T) -> Result<Vec<Vec<Neighbor<T>>>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }

        let tree = KdTree::build_with_config(self, &Default::default())?;

        Ok(self
            .points()
            .par_iter()
            .enumerate()
            .map(|(i, query)| {
                let mut neighbors = tree.radius_search(query, radius_squared);
                neighbors.retain(|n| n.index != i);
                neighbors
            })
            .collect())
    }
}
