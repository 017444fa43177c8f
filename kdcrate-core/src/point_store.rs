//! Immutable point storage built from flat coordinate buffers

use crate::dataset::SpatialDataset;
use crate::error::{Error, Result};
use crate::point::{squared_distance, Real, DIMENSIONS};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::ops::Index;

fn check_flat_len(len: usize) -> Result<()> {
    if len % DIMENSIONS != 0 {
        return Err(Error::InvalidInput(format!(
            "coordinate buffer length {} is not a multiple of {}",
            len, DIMENSIONS
        )));
    }
    Ok(())
}

fn drop_trailing<T>(coords: &[T]) -> &[T] {
    let usable = coords.len() - coords.len() % DIMENSIONS;
    if usable != coords.len() {
        tracing::warn!(
            dropped = coords.len() - usable,
            "coordinate buffer length {} is not a multiple of {}, truncating",
            coords.len(),
            DIMENSIONS
        );
    }
    &coords[..usable]
}

fn check_access(index: usize, dim: usize, len: usize) -> Result<()> {
    if index >= len || dim >= DIMENSIONS {
        return Err(Error::IndexOutOfRange { index, dim, len });
    }
    Ok(())
}

/// An immutable, contiguous collection of 3D points (array of structs).
///
/// Point `i` is the `i`-th triple of the buffer it was built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointStore<T: Real> {
    points: Vec<Point3<T>>,
}

/// A point store with single precision coordinates
pub type PointStore3f = PointStore<f32>;

/// A point store with double precision coordinates
pub type PointStore3d = PointStore<f64>;

impl<T: Real> PointStore<T> {
    /// Build a store from an `x, y, z, x, y, z, ...` buffer.
    ///
    /// Fails with [`Error::InvalidInput`] if the buffer length is not a multiple of 3.
    ///
    /// # Example
    /// ```rust
    /// use kdcrate_core::PointStore;
    ///
    /// let store = PointStore::from_flat(&[0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
    /// assert_eq!(store.count(), 2);
    /// assert!(PointStore::from_flat(&[0.0f32; 7]).is_err());
    /// ```
    pub fn from_flat(coords: &[T]) -> Result<Self> {
        check_flat_len(coords.len())?;
        Ok(Self::collect_flat(coords))
    }

    /// Build a store from a flat buffer, silently dropping trailing coordinates
    /// that do not form a whole point. A warning is logged when anything is dropped.
    pub fn from_flat_truncating(coords: &[T]) -> Self {
        Self::collect_flat(drop_trailing(coords))
    }

    fn collect_flat(coords: &[T]) -> Self {
        let points = coords
            .chunks_exact(DIMENSIONS)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Self { points }
    }

    /// Create a store from a vector of points
    pub fn from_points(points: Vec<Point3<T>>) -> Self {
        Self { points }
    }

    /// Number of stored points
    pub fn count(&self) -> usize {
        self.points.len()
    }

    /// Number of stored points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Point at `index`
    pub fn point(&self, index: usize) -> Result<&Point3<T>> {
        self.points.get(index).ok_or(Error::IndexOutOfRange {
            index,
            dim: 0,
            len: self.points.len(),
        })
    }

    /// Coordinate `dim` (0 = x, 1 = y, 2 = z) of point `index`
    pub fn coordinate(&self, index: usize, dim: usize) -> Result<T> {
        check_access(index, dim, self.points.len())?;
        Ok(self.points[index][dim])
    }

    /// Squared Euclidean distance between `query` and point `index`
    pub fn squared_distance(&self, query: &Point3<T>, index: usize) -> Result<T> {
        self.point(index).map(|p| squared_distance(query, p))
    }

    /// All points as a slice
    pub fn points(&self) -> &[Point3<T>] {
        &self.points
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<'_, Point3<T>> {
        self.points.iter()
    }
}

impl<T> PointStore<T>
where
    T: Real + bytemuck::Pod,
    Point3<T>: bytemuck::Pod,
{
    /// View the points as a flat `x, y, z, ...` buffer without copying
    pub fn as_flat(&self) -> &[T] {
        bytemuck::cast_slice(&self.points)
    }
}

impl<T: Real> Default for PointStore<T> {
    fn default() -> Self {
        Self { points: Vec::new() }
    }
}

impl<T: Real> Index<usize> for PointStore<T> {
    type Output = Point3<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.points[index]
    }
}

impl<'a, T: Real> IntoIterator for &'a PointStore<T> {
    type Item = &'a Point3<T>;
    type IntoIter = std::slice::Iter<'a, Point3<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

impl<T: Real> FromIterator<Point3<T>> for PointStore<T> {
    fn from_iter<I: IntoIterator<Item = Point3<T>>>(iter: I) -> Self {
        Self {
            points: Vec::from_iter(iter),
        }
    }
}

impl<T: Real> SpatialDataset<T> for PointStore<T> {
    fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn coordinate(&self, index: usize, dim: usize) -> T {
        self.points[index][dim]
    }

    #[inline]
    fn squared_distance_to(&self, query: &Point3<T>, index: usize) -> T {
        squared_distance(query, &self.points[index])
    }
}

/// Point storage with one contiguous array per axis (structure of arrays)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoaPointStore<T: Real> {
    xs: Vec<T>,
    ys: Vec<T>,
    zs: Vec<T>,
}

impl<T: Real> SoaPointStore<T> {
    /// Build a store from an `x, y, z, x, y, z, ...` buffer.
    ///
    /// Fails with [`Error::InvalidInput`] if the buffer length is not a multiple of 3.
    pub fn from_flat(coords: &[T]) -> Result<Self> {
        check_flat_len(coords.len())?;
        Ok(Self::collect_flat(coords))
    }

    /// Build a store from a flat buffer, dropping trailing coordinates that do not
    /// form a whole point
    pub fn from_flat_truncating(coords: &[T]) -> Self {
        Self::collect_flat(drop_trailing(coords))
    }

    fn collect_flat(coords: &[T]) -> Self {
        let n = coords.len() / DIMENSIONS;
        let mut store = Self {
            xs: Vec::with_capacity(n),
            ys: Vec::with_capacity(n),
            zs: Vec::with_capacity(n),
        };
        for c in coords.chunks_exact(DIMENSIONS) {
            store.xs.push(c[0]);
            store.ys.push(c[1]);
            store.zs.push(c[2]);
        }
        store
    }

    /// Number of stored points
    pub fn count(&self) -> usize {
        self.xs.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Coordinate `dim` of point `index`
    pub fn coordinate(&self, index: usize, dim: usize) -> Result<T> {
        check_access(index, dim, self.xs.len())?;
        Ok(self.axis(dim)[index])
    }

    /// Point at `index`
    pub fn point(&self, index: usize) -> Result<Point3<T>> {
        check_access(index, 0, self.xs.len())?;
        Ok(Point3::new(self.xs[index], self.ys[index], self.zs[index]))
    }

    /// Squared Euclidean distance between `query` and point `index`
    pub fn squared_distance(&self, query: &Point3<T>, index: usize) -> Result<T> {
        check_access(index, 0, self.xs.len())?;
        Ok(SpatialDataset::squared_distance_to(self, query, index))
    }

    /// All values of one axis
    pub fn axis(&self, dim: usize) -> &[T] {
        match dim {
            0 => &self.xs,
            1 => &self.ys,
            2 => &self.zs,
            _ => panic!("dimension {} out of range", dim),
        }
    }
}

impl<T: Real> From<&PointStore<T>> for SoaPointStore<T> {
    fn from(store: &PointStore<T>) -> Self {
        Self {
            xs: store.iter().map(|p| p.x).collect(),
            ys: store.iter().map(|p| p.y).collect(),
            zs: store.iter().map(|p| p.z).collect(),
        }
    }
}

impl<T: Real> SpatialDataset<T> for SoaPointStore<T> {
    fn len(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    fn coordinate(&self, index: usize, dim: usize) -> T {
        self.axis(dim)[index]
    }

    #[inline]
    fn squared_distance_to(&self, query: &Point3<T>, index: usize) -> T {
        let dx = query.x - self.xs[index];
        let dy = query.y - self.ys[index];
        let dz = query.z - self.zs[index];
        dx * dx + dy * dy + dz * dz
    }
}
