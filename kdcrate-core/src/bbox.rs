//! Axis-aligned bounding boxes

use crate::dataset::SpatialDataset;
use crate::point::{Real, DIMENSIONS};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box given by its minimum and maximum corners
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb<T: Real> {
    pub min: Point3<T>,
    pub max: Point3<T>,
}

impl<T: Real> Aabb<T> {
    /// Create a box from two corners. The corners are taken as given.
    pub fn new(min: Point3<T>, max: Point3<T>) -> Self {
        Self { min, max }
    }

    /// Degenerate box holding a single point
    pub fn from_point(point: &Point3<T>) -> Self {
        Self { min: *point, max: *point }
    }

    /// Smallest box containing every point yielded by `points`, or `None` when empty
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<T>>,
        T: 'a,
    {
        let mut iter = points.into_iter();
        let mut bbox = Self::from_point(iter.next()?);
        for point in iter {
            bbox.extend(point);
        }
        Some(bbox)
    }

    /// Box of the dataset points referenced by `indices`, or `None` when `indices` is empty
    pub fn of_dataset<D>(dataset: &D, indices: &[usize]) -> Option<Self>
    where
        D: SpatialDataset<T> + ?Sized,
    {
        let (&first, rest) = indices.split_first()?;
        let mut min = [
            dataset.coordinate(first, 0),
            dataset.coordinate(first, 1),
            dataset.coordinate(first, 2),
        ];
        let mut max = min;

        for &idx in rest {
            for dim in 0..DIMENSIONS {
                let v = dataset.coordinate(idx, dim);
                if v < min[dim] {
                    min[dim] = v;
                }
                if v > max[dim] {
                    max[dim] = v;
                }
            }
        }

        Some(Self {
            min: Point3::new(min[0], min[1], min[2]),
            max: Point3::new(max[0], max[1], max[2]),
        })
    }

    /// Grow the box so it contains `point`
    pub fn extend(&mut self, point: &Point3<T>) {
        for dim in 0..DIMENSIONS {
            if point[dim] < self.min[dim] {
                self.min[dim] = point[dim];
            }
            if point[dim] > self.max[dim] {
                self.max[dim] = point[dim];
            }
        }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Self) -> Self {
        let mut merged = *self;
        merged.extend(&other.min);
        merged.extend(&other.max);
        merged
    }

    /// Extent of the box along `dim`
    #[inline]
    pub fn spread(&self, dim: usize) -> T {
        self.max[dim] - self.min[dim]
    }

    /// Dimension with the largest extent; the lowest dimension wins ties
    pub fn widest_dimension(&self) -> usize {
        let mut best = 0;
        for dim in 1..DIMENSIONS {
            if self.spread(dim) > self.spread(best) {
                best = dim;
            }
        }
        best
    }

    /// Whether `point` lies inside or on the boundary of the box
    pub fn contains(&self, point: &Point3<T>) -> bool {
        (0..DIMENSIONS).all(|dim| point[dim] >= self.min[dim] && point[dim] <= self.max[dim])
    }

    /// Minimum squared distance from `point` to any point of the box (zero inside)
    #[inline]
    pub fn squared_distance_to(&self, point: &Point3<T>) -> T {
        let mut sum = nalgebra::zero::<T>();
        for dim in 0..DIMENSIONS {
            let q = point[dim];
            if q < self.min[dim] {
                let d = self.min[dim] - q;
                sum += d * d;
            } else if q > self.max[dim] {
                let d = q - self.max[dim];
                sum += d * d;
            }
        }
        sum
    }
}
