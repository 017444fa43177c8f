//! Exhaustive nearest neighbor search

use crate::result_set::Neighbor;
use kdcrate_core::{NearestNeighborSearch, Real, SpatialDataset};
use nalgebra::Point3;
use std::cmp::Ordering;

/// Simple brute force nearest neighbor search for small datasets, and the
/// reference the k-d tree is checked against
pub struct BruteForceSearch<'a, D> {
    dataset: &'a D,
}

impl<'a, D> BruteForceSearch<'a, D> {
    pub fn new(dataset: &'a D) -> Self {
        Self { dataset }
    }

    /// Every point with its squared distance to `query`, ascending by (distance, index)
    pub fn sorted_by_distance<T>(&self, query: &Point3<T>) -> Vec<Neighbor<T>>
    where
        T: Real,
        D: SpatialDataset<T>,
    {
        let mut distances: Vec<Neighbor<T>> = (0..self.dataset.len())
            .map(|idx| Neighbor::new(idx, self.dataset.squared_distance_to(query, idx)))
            .collect();

        distances.sort_by(|a, b| {
            a.distance_squared
                .partial_cmp(&b.distance_squared)
                .unwrap_or(Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        distances
    }
}

impl<'a, T, D> NearestNeighborSearch<T> for BruteForceSearch<'a, D>
where
    T: Real,
    D: SpatialDataset<T>,
{
    fn find_k_nearest(&self, query: &Point3<T>, k: usize) -> Vec<(usize, T)> {
        let mut distances = self.sorted_by_distance(query);
        distances.truncate(k);
        distances.into_iter().map(Into::into).collect()
    }

    fn find_radius_neighbors(&self, query: &Point3<T>, radius_squared: T) -> Vec<(usize, T)> {
        (0..self.dataset.len())
            .filter_map(|idx| {
                let distance_squared = self.dataset.squared_distance_to(query, idx);
                if distance_squared <= radius_squared {
                    Some((idx, distance_squared))
                } else {
                    None
                }
            })
            .collect()
    }
}
