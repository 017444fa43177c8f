//! Result sets collecting candidates during a tree traversal

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use kdcrate_core::Real;
use serde::{Deserialize, Serialize};

/// A stored point found by a query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor<T: Real> {
    /// Position of the point in the dataset
    pub index: usize,
    /// Squared Euclidean distance to the query point
    pub distance_squared: T,
}

impl<T: Real> Neighbor<T> {
    pub fn new(index: usize, distance_squared: T) -> Self {
        Self { index, distance_squared }
    }

    /// True Euclidean distance
    pub fn distance(&self) -> T {
        self.distance_squared.sqrt()
    }

    /// Ordering by distance, then by index
    #[inline]
    fn precedes(&self, distance_squared: T, index: usize) -> bool {
        self.distance_squared < distance_squared
            || (self.distance_squared == distance_squared && self.index < index)
    }
}

/// Heap entry ordered by (distance, index); NaN never enters the heap
#[derive(Debug, Clone, Copy)]
struct Ranked<T: Real>(Neighbor<T>);

impl<T: Real> PartialEq for Ranked<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: Real> Eq for Ranked<T> {}

impl<T: Real> PartialOrd for Ranked<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Real> Ord for Ranked<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .distance_squared
            .partial_cmp(&other.0.distance_squared)
            .unwrap_or(Ordering::Equal)
            .then(self.0.index.cmp(&other.0.index))
    }
}

impl<T: Real> From<Neighbor<T>> for (usize, T) {
    fn from(n: Neighbor<T>) -> Self {
        (n.index, n.distance_squared)
    }
}

/// Receives candidate points while the tree is searched.
///
/// The traversal only visits subtrees whose closest possible distance is at
/// most [`ResultSet::bound`], and stops once [`ResultSet::add`] returns `false`.
pub trait ResultSet<T: Real> {
    /// Offer a candidate; return `false` to end the search
    fn add(&mut self, index: usize, distance_squared: T) -> bool;

    /// Current pruning bound on the squared distance, `None` while unbounded
    fn bound(&self) -> Option<T>;
}

/// Keeps the `k` closest candidates, ordered by (distance, index).
///
/// Candidates live in a max-heap keyed on the worst accepted entry, so each
/// insertion costs `O(log k)` even when `k` covers the whole dataset.
#[derive(Debug, Clone)]
pub struct KnnResultSet<T: Real> {
    capacity: usize,
    items: BinaryHeap<Ranked<T>>,
}

impl<T: Real> KnnResultSet<T> {
    pub fn new(k: usize) -> Self {
        Self {
            capacity: k,
            // k may be far larger than anything offered
            items: BinaryHeap::with_capacity(k.min(1024)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Worst accepted distance, once `k` candidates are held
    pub fn worst_distance(&self) -> Option<T> {
        if self.items.len() < self.capacity {
            None
        } else {
            self.items.peek().map(|r| r.0.distance_squared)
        }
    }

    /// Candidates in ascending distance order
    pub fn into_sorted_vec(self) -> Vec<Neighbor<T>> {
        self.items.into_sorted_vec().into_iter().map(|r| r.0).collect()
    }
}

impl<T: Real> ResultSet<T> for KnnResultSet<T> {
    fn add(&mut self, index: usize, distance_squared: T) -> bool {
        // NaN distances never compare, drop them
        if self.capacity == 0 || distance_squared.partial_cmp(&distance_squared).is_none() {
            return true;
        }
        if self.items.len() == self.capacity {
            match self.items.peek() {
                Some(worst) if !worst.0.precedes(distance_squared, index) => {}
                _ => return true,
            }
            self.items.pop();
        }
        self.items.push(Ranked(Neighbor::new(index, distance_squared)));
        true
    }

    fn bound(&self) -> Option<T> {
        self.worst_distance()
    }
}

/// Collects every candidate within a fixed squared radius
#[derive(Debug, Clone)]
pub struct RadiusResultSet<T: Real> {
    radius_squared: T,
    items: Vec<Neighbor<T>>,
}

impl<T: Real> RadiusResultSet<T> {
    pub fn new(radius_squared: T) -> Self {
        Self {
            radius_squared,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Candidates in visiting order
    pub fn into_vec(self) -> Vec<Neighbor<T>> {
        self.items
    }

    /// Candidates ordered by (distance, index)
    pub fn into_sorted_vec(mut self) -> Vec<Neighbor<T>> {
        self.items.sort_by(|a, b| {
            a.distance_squared
                .partial_cmp(&b.distance_squared)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.index.cmp(&b.index))
        });
        self.items
    }
}

impl<T: Real> ResultSet<T> for RadiusResultSet<T> {
    fn add(&mut self, index: usize, distance_squared: T) -> bool {
        if distance_squared <= self.radius_squared {
            self.items.push(Neighbor::new(index, distance_squared));
        }
        true
    }

    fn bound(&self) -> Option<T> {
        Some(self.radius_squared)
    }
}

/// Counts candidates within a fixed squared radius without storing them
#[derive(Debug, Clone, Copy)]
pub struct RadiusCounter<T: Real> {
    radius_squared: T,
    count: usize,
}

impl<T: Real> RadiusCounter<T> {
    pub fn new(radius_squared: T) -> Self {
        Self { radius_squared, count: 0 }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl<T: Real> ResultSet<T> for RadiusCounter<T> {
    fn add(&mut self, _index: usize, distance_squared: T) -> bool {
        if distance_squared <= self.radius_squared {
            self.count += 1;
        }
        true
    }

    fn bound(&self) -> Option<T> {
        Some(self.radius_squared)
    }
}
