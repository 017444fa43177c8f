//! Static k-d tree over a [`SpatialDataset`]
//!
//! The tree is built once by recursive median splits along the axis of
//! greatest spread and never modified afterwards. Every node keeps the
//! bounding box of its points, which lets queries skip subtrees that cannot
//! contain a candidate better than the current bound.

use crate::config::{KdTreeConfig, SearchParams};
use crate::result_set::{KnnResultSet, Neighbor, RadiusCounter, RadiusResultSet, ResultSet};
use kdcrate_core::{Aabb, Error, NearestNeighborSearch, Real, Result, SpatialDataset};
use nalgebra::Point3;
use rayon::prelude::*;
use std::cmp::Ordering;

#[derive(Debug, Clone)]
enum Node<T: Real> {
    /// Points `indices[start..end]`
    Leaf {
        start: usize,
        end: usize,
        bbox: Aabb<T>,
    },
    /// Left child holds values `<= split` along `dim`, right child `>= split`
    Branch {
        dim: usize,
        split: T,
        bbox: Aabb<T>,
        left: Box<Node<T>>,
        right: Box<Node<T>>,
    },
}

impl<T: Real> Node<T> {
    fn bbox(&self) -> &Aabb<T> {
        match self {
            Node::Leaf { bbox, .. } | Node::Branch { bbox, .. } => bbox,
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

struct Builder<'d, T: Real, D> {
    dataset: &'d D,
    leaf_bucket_size: usize,
    parallel_threshold: Option<usize>,
    _scalar: std::marker::PhantomData<T>,
}

impl<T, D> Builder<'_, T, D>
where
    T: Real,
    D: SpatialDataset<T> + Sync,
{
    /// Build the subtree for `indices`, which sit at `offset` in the full permutation
    fn build(&self, indices: &mut [usize], offset: usize, range_bbox: Aabb<T>) -> Node<T> {
        let count = indices.len();
        let end = offset + count;

        let dim = range_bbox.widest_dimension();
        // coincident points cannot be separated, keep them in one bucket
        if count <= self.leaf_bucket_size || range_bbox.spread(dim) <= nalgebra::zero::<T>() {
            return Node::Leaf {
                start: offset,
                end,
                bbox: range_bbox,
            };
        }

        let mid = count / 2;
        let dataset = self.dataset;
        indices.select_nth_unstable_by(mid, |&a, &b| {
            dataset
                .coordinate(a, dim)
                .partial_cmp(&dataset.coordinate(b, dim))
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
        let split = dataset.coordinate(indices[mid], dim);

        let (lower, upper) = indices.split_at_mut(mid);
        let lower_bbox = self.range_bbox(lower, &range_bbox);
        let upper_bbox = self.range_bbox(upper, &range_bbox);

        let (left, right) = match self.parallel_threshold {
            Some(threshold) if count > threshold => rayon::join(
                || self.build(lower, offset, lower_bbox),
                || self.build(upper, offset + mid, upper_bbox),
            ),
            _ => (
                self.build(lower, offset, lower_bbox),
                self.build(upper, offset + mid, upper_bbox),
            ),
        };

        let bbox = left.bbox().union(right.bbox());
        Node::Branch {
            dim,
            split,
            bbox,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn range_bbox(&self, indices: &[usize], parent: &Aabb<T>) -> Aabb<T> {
        Aabb::of_dataset(self.dataset, indices).unwrap_or(*parent)
    }
}

/// A balanced k-d tree answering k-nearest and radius queries.
///
/// The tree borrows its dataset for coordinate lookups and keeps only a
/// permutation of the point indices plus the node hierarchy. Queries take
/// `&self`, so a built tree can be shared between threads freely.
///
/// # Example
/// ```rust
/// use kdcrate_core::{Point3f, PointStore};
/// use kdcrate_index::KdTree;
///
/// fn main() -> kdcrate_core::Result<()> {
///     let coords = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 5.0, 5.0, 5.0];
///     let store = PointStore::from_flat(&coords)?;
///     let tree = KdTree::build(&store, 10)?;
///
///     let nearest = tree.knn_search(&Point3f::new(0.0, 0.0, 0.1), 2);
///     assert_eq!(nearest[0].index, 0);
///
///     let within = tree.radius_search(&Point3f::origin(), 1.0);
///     assert_eq!(within.len(), 3);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KdTree<'a, T: Real, D: SpatialDataset<T>> {
    dataset: &'a D,
    indices: Vec<usize>,
    root: Option<Node<T>>,
    leaf_bucket_size: usize,
}

impl<'a, T, D> KdTree<'a, T, D>
where
    T: Real,
    D: SpatialDataset<T> + Sync,
{
    /// Build a tree whose leaves hold at most `leaf_bucket_size` points
    pub fn build(dataset: &'a D, leaf_bucket_size: usize) -> Result<Self> {
        Self::build_with_config(
            dataset,
            &KdTreeConfig::default().with_leaf_bucket_size(leaf_bucket_size),
        )
    }

    /// Build a tree with explicit configuration
    pub fn build_with_config(dataset: &'a D, config: &KdTreeConfig) -> Result<Self> {
        config.validate()?;

        let n = dataset.len();
        let _span = tracing::debug_span!("kdtree_build", points = n).entered();

        let mut indices: Vec<usize> = (0..n).collect();
        let root_bbox = match dataset.bounding_box() {
            Some(bbox) => Some(bbox),
            None => Aabb::of_dataset(dataset, &indices),
        };

        let root = root_bbox.map(|bbox| {
            let builder = Builder {
                dataset,
                leaf_bucket_size: config.leaf_bucket_size,
                parallel_threshold: config.parallel_threshold,
                _scalar: std::marker::PhantomData,
            };
            builder.build(&mut indices, 0, bbox)
        });

        let tree = Self {
            dataset,
            indices,
            root,
            leaf_bucket_size: config.leaf_bucket_size,
        };
        tracing::debug!(
            points = n,
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "built k-d tree"
        );
        Ok(tree)
    }
}

impl<'a, T, D> KdTree<'a, T, D>
where
    T: Real,
    D: SpatialDataset<T>,
{
    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if the tree indexes no points
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The dataset the tree was built over
    pub fn dataset(&self) -> &'a D {
        self.dataset
    }

    /// Maximum leaf size requested at build time
    pub fn leaf_bucket_size(&self) -> usize {
        self.leaf_bucket_size
    }

    /// Point indices in tree order; each leaf owns a contiguous range
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Bounding box of all indexed points
    pub fn root_bbox(&self) -> Option<&Aabb<T>> {
        self.root.as_ref().map(Node::bbox)
    }

    /// Number of node levels, zero for an empty tree
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.root.as_ref().map_or(0, Node::leaf_count)
    }

    /// Feed every candidate that can satisfy `result` into it
    pub fn find_neighbors<R>(&self, result: &mut R, query: &Point3<T>, params: &SearchParams<T>)
    where
        R: ResultSet<T>,
    {
        if let Some(root) = &self.root {
            let factor = params.prune_factor();
            let root_dist = root.bbox().squared_distance_to(query);
            if visit(root_dist, factor, &*result) {
                self.search_node(root, query, factor, result);
            }
        }
    }

    /// Returns `false` once the result set asks to stop
    fn search_node<R>(&self, node: &Node<T>, query: &Point3<T>, factor: T, result: &mut R) -> bool
    where
        R: ResultSet<T>,
    {
        match node {
            Node::Leaf { start, end, .. } => {
                for &idx in &self.indices[*start..*end] {
                    let d = self.dataset.squared_distance_to(query, idx);
                    if !result.add(idx, d) {
                        return false;
                    }
                }
                true
            }
            Node::Branch { dim, split, left, right, .. } => {
                let left_dist = left.bbox().squared_distance_to(query);
                let right_dist = right.bbox().squared_distance_to(query);
                let left_first = match left_dist.partial_cmp(&right_dist) {
                    Some(Ordering::Less) => true,
                    Some(Ordering::Greater) => false,
                    // both boxes touch the query, fall back to the split plane
                    _ => query[*dim] <= *split,
                };
                let (near, near_dist, far, far_dist) = if left_first {
                    (left, left_dist, right, right_dist)
                } else {
                    (right, right_dist, left, left_dist)
                };

                if visit(near_dist, factor, &*result)
                    && !self.search_node(near, query, factor, result)
                {
                    return false;
                }
                // the bound may have tightened while searching the near side
                if visit(far_dist, factor, &*result) {
                    return self.search_node(far, query, factor, result);
                }
                true
            }
        }
    }

    /// The `k` closest points, ascending by distance (ties by index)
    pub fn knn_search(&self, query: &Point3<T>, k: usize) -> Vec<Neighbor<T>> {
        self.knn_search_with(query, k, &SearchParams::default())
    }

    pub fn knn_search_with(
        &self,
        query: &Point3<T>,
        k: usize,
        params: &SearchParams<T>,
    ) -> Vec<Neighbor<T>> {
        let k = k.min(self.len());
        if k == 0 {
            return Vec::new();
        }
        let mut result = KnnResultSet::new(k);
        self.find_neighbors(&mut result, query, params);
        result.into_sorted_vec()
    }

    /// All points with squared distance at most `radius_squared`, in no particular order
    pub fn radius_search(&self, query: &Point3<T>, radius_squared: T) -> Vec<Neighbor<T>> {
        self.radius_search_with(query, radius_squared, &SearchParams::default())
    }

    pub fn radius_search_with(
        &self,
        query: &Point3<T>,
        radius_squared: T,
        params: &SearchParams<T>,
    ) -> Vec<Neighbor<T>> {
        let mut result = RadiusResultSet::new(radius_squared);
        self.find_neighbors(&mut result, query, params);
        if params.sorted {
            result.into_sorted_vec()
        } else {
            result.into_vec()
        }
    }

    /// Number of points with squared distance at most `radius_squared`
    pub fn count_within_radius(&self, query: &Point3<T>, radius_squared: T) -> usize {
        let mut counter = RadiusCounter::new(radius_squared);
        self.find_neighbors(&mut counter, query, &SearchParams::default());
        counter.count()
    }

    /// The single closest point
    pub fn nearest(&self, query: &Point3<T>) -> Result<Neighbor<T>> {
        self.knn_search(query, 1)
            .into_iter()
            .next()
            .ok_or(Error::EmptyIndex)
    }
}

impl<'a, T, D> KdTree<'a, T, D>
where
    T: Real,
    D: SpatialDataset<T> + Sync,
{
    /// k-NN for many query points on the rayon pool; output order follows `queries`
    pub fn knn_search_batch(&self, queries: &[Point3<T>], k: usize) -> Vec<Vec<Neighbor<T>>> {
        tracing::trace!(queries = queries.len(), k, "batch knn search");
        queries.par_iter().map(|q| self.knn_search(q, k)).collect()
    }

    /// Radius search for many query points on the rayon pool; output order follows `queries`
    pub fn radius_search_batch(
        &self,
        queries: &[Point3<T>],
        radius_squared: T,
    ) -> Vec<Vec<Neighbor<T>>> {
        tracing::trace!(queries = queries.len(), "batch radius search");
        queries
            .par_iter()
            .map(|q| self.radius_search(q, radius_squared))
            .collect()
    }
}

#[inline]
fn visit<T: Real, R: ResultSet<T>>(box_dist: T, factor: T, result: &R) -> bool {
    match result.bound() {
        None => true,
        Some(bound) => box_dist * factor <= bound,
    }
}

impl<'a, T, D> NearestNeighborSearch<T> for KdTree<'a, T, D>
where
    T: Real,
    D: SpatialDataset<T>,
{
    fn find_k_nearest(&self, query: &Point3<T>, k: usize) -> Vec<(usize, T)> {
        self.knn_search(query, k).into_iter().map(Into::into).collect()
    }

    fn find_radius_neighbors(&self, query: &Point3<T>, radius_squared: T) -> Vec<(usize, T)> {
        self.radius_search(query, radius_squared)
            .into_iter()
            .map(Into::into)
            .collect()
    }
}
