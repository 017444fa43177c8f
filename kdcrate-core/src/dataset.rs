//! Spatial dataset capability consumed by the index builders and searchers

use crate::bbox::Aabb;
use crate::point::Real;
use nalgebra::Point3;

/// Read-only access to an indexed set of 3D points.
///
/// This is the only view the k-d tree has of its points, so alternative
/// layouts (array of structs, structure of arrays, memory-mapped buffers)
/// can be indexed without touching the tree code.
///
/// `coordinate` and `squared_distance_to` are hot-path accessors: callers
/// guarantee `index < self.len()` and `dim < 3`, and implementations may
/// panic otherwise.
pub trait SpatialDataset<T: Real> {
    /// Number of points
    fn len(&self) -> usize;

    /// Check if the dataset holds no points
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value of coordinate `dim` of point `index`
    fn coordinate(&self, index: usize, dim: usize) -> T;

    /// Squared Euclidean distance between `query` and point `index`
    fn squared_distance_to(&self, query: &Point3<T>, index: usize) -> T {
        let dx = query.x - self.coordinate(index, 0);
        let dy = query.y - self.coordinate(index, 1);
        let dz = query.z - self.coordinate(index, 2);
        dx * dx + dy * dy + dz * dz
    }

    /// Precomputed bounds of the whole dataset, if the dataset keeps them.
    ///
    /// Returning `None` makes the index builder compute the bounds itself.
    fn bounding_box(&self) -> Option<Aabb<T>> {
        None
    }
}

impl<T: Real, D: SpatialDataset<T> + ?Sized> SpatialDataset<T> for &D {
    fn len(&self) -> usize {
        (**self).len()
    }

    fn coordinate(&self, index: usize, dim: usize) -> T {
        (**self).coordinate(index, dim)
    }

    fn squared_distance_to(&self, query: &Point3<T>, index: usize) -> T {
        (**self).squared_distance_to(query, index)
    }

    fn bounding_box(&self) -> Option<Aabb<T>> {
        (**self).bounding_box()
    }
}
