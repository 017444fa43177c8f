//! Point types and related functionality

use nalgebra::{Point3, RealField};

/// Scalar type usable as a point coordinate (`f32` or `f64`)
pub trait Real: RealField + Copy + Send + Sync {}

impl<T: RealField + Copy + Send + Sync> Real for T {}

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// Number of coordinates per point
pub const DIMENSIONS: usize = 3;

/// Squared Euclidean distance between two points
#[inline]
pub fn squared_distance<T: Real>(a: &Point3<T>, b: &Point3<T>) -> T {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    let dz = a.z - b.z;
    dx * dx + dy * dy + dz * dz
}
