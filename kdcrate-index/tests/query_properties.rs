//! Integration tests for kdcrate-index
//!
//! These tests check the k-d tree answers against exhaustive search over the
//! same point store.

use kdcrate_core::{
    NearestNeighborSearch, Point3d, Point3f, PointStore, SoaPointStore, SpatialDataset,
};
use kdcrate_index::*;
use approx::assert_relative_eq;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The four point example: origin, two unit axis points and a far outlier
fn create_scenario_store() -> PointStore<f32> {
    PointStore::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 5.0, 5.0, 5.0]).unwrap()
}

/// Random cloud in a cube of side 2 * `extent`
fn create_random_store(n: usize, extent: f64, seed: u64) -> PointStore<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            Point3d::new(
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
                rng.gen_range(-extent..extent),
            )
        })
        .collect()
}

/// Grid cloud with many equal distances
fn create_grid_store(side: usize) -> PointStore<f32> {
    let mut points = Vec::new();
    for i in 0..side {
        for j in 0..side {
            for k in 0..side {
                points.push(Point3f::new(i as f32, j as f32, k as f32));
            }
        }
    }
    PointStore::from_points(points)
}

fn sorted_indices<T: kdcrate_core::Real>(neighbors: &[Neighbor<T>]) -> Vec<usize> {
    let mut indices: Vec<usize> = neighbors.iter().map(|n| n.index).collect();
    indices.sort_unstable();
    indices
}

#[test]
fn test_scenario_knn() {
    let store = create_scenario_store();
    let tree = KdTree::build(&store, 10).unwrap();

    let result = tree.knn_search(&Point3f::new(0.0, 0.0, 0.1), 2);
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].index, 0);
    assert_relative_eq!(result[0].distance_squared, 0.01, epsilon = 1e-6);
    assert!(result[1].index == 1 || result[1].index == 2);
    assert_relative_eq!(result[1].distance_squared, 1.01, epsilon = 1e-6);
}

#[test]
fn test_scenario_radius() {
    let store = create_scenario_store();
    let tree = KdTree::build(&store, 1).unwrap();

    let result = tree.radius_search(&Point3f::origin(), 1.0);
    assert_eq!(sorted_indices(&result), vec![0, 1, 2]);
    assert_eq!(tree.count_within_radius(&Point3f::origin(), 1.0), 3);

    let all = tree.radius_search(&Point3f::origin(), 75.0);
    assert_eq!(all.len(), 4);
}

#[test]
fn test_scenario_partial_buffer_is_rejected() {
    let coords = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
    assert!(matches!(
        PointStore::from_flat(&coords),
        Err(kdcrate_core::Error::InvalidInput(_))
    ));
    assert_eq!(PointStore::from_flat_truncating(&coords).count(), 2);
}

#[test]
fn test_empty_buffer_queries() {
    let store = PointStore::<f64>::from_flat(&[]).unwrap();
    let tree = KdTree::build(&store, 10).unwrap();
    assert_eq!(tree.len(), 0);
    assert!(tree.knn_search(&Point3d::origin(), 5).is_empty());
    assert!(tree.radius_search(&Point3d::origin(), 1.0).is_empty());
    assert!(tree.knn_search_batch(&[Point3d::origin()], 5)[0].is_empty());
}

#[test]
fn test_knn_matches_brute_force() {
    let store = create_random_store(3000, 50.0, 42);
    let tree = KdTree::build(&store, 10).unwrap();
    let brute = BruteForceSearch::new(&store);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..100 {
        let q = Point3d::new(
            rng.gen_range(-60.0..60.0),
            rng.gen_range(-60.0..60.0),
            rng.gen_range(-60.0..60.0),
        );
        let k = rng.gen_range(1..40);
        let tree_result = tree.find_k_nearest(&q, k);
        let brute_result = brute.find_k_nearest(&q, k);
        assert_eq!(tree_result, brute_result);
    }
}

#[test]
fn test_knn_sorted_and_distances_match_store() {
    let store = create_random_store(1000, 10.0, 3);
    let tree = KdTree::build(&store, 16).unwrap();
    let q = Point3d::new(0.5, -1.5, 2.0);

    let result = tree.knn_search(&q, 50);
    assert_eq!(result.len(), 50);
    for pair in result.windows(2) {
        assert!(pair[0].distance_squared <= pair[1].distance_squared);
    }
    for n in &result {
        assert_eq!(n.distance_squared, store.squared_distance(&q, n.index).unwrap());
    }
}

#[test]
fn test_each_point_is_its_own_nearest() {
    let store = create_random_store(2000, 100.0, 12);
    let tree = KdTree::build(&store, 10).unwrap();
    for (i, p) in store.iter().enumerate() {
        let nearest = tree.nearest(p).unwrap();
        assert_eq!(nearest.index, i);
        assert_eq!(nearest.distance_squared, 0.0);
    }
}

#[test]
fn test_duplicate_points_tie_to_lowest_index() {
    let mut points = vec![Point3f::new(3.0, 3.0, 3.0); 5];
    points.insert(0, Point3f::new(-1.0, 0.0, 0.0));
    let store = PointStore::from_points(points);
    let tree = KdTree::build(&store, 2).unwrap();
    let nearest = tree.nearest(&Point3f::new(3.0, 3.0, 3.0)).unwrap();
    assert_eq!(nearest.index, 1);
}

#[test]
fn test_grid_ties_match_brute_force_order() {
    let store = create_grid_store(8);
    let tree = KdTree::build(&store, 4).unwrap();
    let brute = BruteForceSearch::new(&store);
    let queries = [
        Point3f::new(3.5, 3.5, 3.5),
        Point3f::new(0.0, 0.0, 0.0),
        Point3f::new(4.0, 2.0, 7.0),
    ];
    for q in queries {
        assert_eq!(tree.find_k_nearest(&q, 20), brute.find_k_nearest(&q, 20));
    }
}

#[test]
fn test_k_at_least_n_returns_everything_sorted() {
    let store = create_random_store(200, 5.0, 8);
    let tree = KdTree::build(&store, 10).unwrap();
    let q = Point3d::new(1.0, 1.0, 1.0);
    for k in [200, 201, 10_000] {
        let result = tree.knn_search(&q, k);
        assert_eq!(result.len(), 200);
        assert_eq!(sorted_indices(&result), (0..200).collect::<Vec<_>>());
        for pair in result.windows(2) {
            assert!(pair[0].distance_squared <= pair[1].distance_squared);
        }
    }
    assert!(tree.knn_search(&q, 0).is_empty());
}

#[test]
fn test_large_k_matches_brute_force_order() {
    let store = create_random_store(20_000, 30.0, 77);
    let tree = KdTree::build(&store, 10).unwrap();
    let brute = BruteForceSearch::new(&store);
    let q = Point3d::new(-4.0, 12.5, 0.25);

    let expected: Vec<Neighbor<f64>> = brute.sorted_by_distance(&q);
    for k in [19_999, 20_000, usize::MAX] {
        let result = tree.knn_search(&q, k);
        let n = k.min(store.len());
        assert_eq!(result.len(), n);
        assert_eq!(result, expected[..n]);
    }
}

#[test]
fn test_radius_matches_brute_force() {
    let store = create_random_store(3000, 20.0, 21);
    let tree = KdTree::build(&store, 10).unwrap();
    let brute = BruteForceSearch::new(&store);
    let mut rng = StdRng::seed_from_u64(22);

    for _ in 0..100 {
        let q = Point3d::new(
            rng.gen_range(-25.0..25.0),
            rng.gen_range(-25.0..25.0),
            rng.gen_range(-25.0..25.0),
        );
        let r: f64 = rng.gen_range(0.0..8.0);
        let mut tree_result = tree.find_radius_neighbors(&q, r * r);
        let mut brute_result = brute.find_radius_neighbors(&q, r * r);
        tree_result.sort_by_key(|&(idx, _)| idx);
        brute_result.sort_by_key(|&(idx, _)| idx);
        assert_eq!(tree_result, brute_result);
        assert_eq!(tree.count_within_radius(&q, r * r), brute_result.len());
    }
}

#[test]
fn test_sorted_radius_search() {
    let store = create_random_store(500, 5.0, 31);
    let tree = KdTree::build(&store, 8).unwrap();
    let params = SearchParams::new().with_sorted(true);
    let result = tree.radius_search_with(&Point3d::origin(), 9.0, &params);
    assert!(!result.is_empty());
    for pair in result.windows(2) {
        assert!(pair[0].distance_squared <= pair[1].distance_squared);
    }
}

#[test]
fn test_soa_store_gives_same_answers() {
    let store = create_random_store(1500, 10.0, 17);
    let soa = SoaPointStore::from(&store);
    let aos_tree = KdTree::build(&store, 10).unwrap();
    let soa_tree = KdTree::build(&soa, 10).unwrap();
    assert_eq!(SpatialDataset::len(&soa), store.count());
    let q = Point3d::new(-2.0, 3.0, 0.25);
    assert_eq!(aos_tree.knn_search(&q, 25), soa_tree.knn_search(&q, 25));
    assert_eq!(
        sorted_indices(&aos_tree.radius_search(&q, 4.0)),
        sorted_indices(&soa_tree.radius_search(&q, 4.0))
    );
}

#[test]
fn test_batch_queries_match_single_queries() {
    let store = create_random_store(4000, 10.0, 55);
    let tree = KdTree::build(&store, 10).unwrap();
    let queries: Vec<Point3d> = store.points()[..300].to_vec();

    let knn = tree.knn_search_batch(&queries, 8);
    let radius = tree.radius_search_batch(&queries, 1.0);
    for (i, q) in queries.iter().enumerate() {
        assert_eq!(knn[i], tree.knn_search(q, 8));
        assert_eq!(sorted_indices(&radius[i]), sorted_indices(&tree.radius_search(q, 1.0)));
    }
}

#[test]
fn test_concurrent_queries_from_threads() {
    let store = create_random_store(2000, 10.0, 77);
    let tree = KdTree::build(&store, 10).unwrap();
    let expected = tree.knn_search(&Point3d::origin(), 10);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..50 {
                    assert_eq!(tree.knn_search(&Point3d::origin(), 10), expected);
                }
            });
        }
    });
}

fn point_strategy() -> impl Strategy<Value = Point3d> {
    (-100.0f64..100.0, -100.0f64..100.0, -100.0f64..100.0)
        .prop_map(|(x, y, z)| Point3d::new(x, y, z))
}

proptest! {
    #[test]
    fn prop_knn_equals_brute_force(
        points in prop::collection::vec(point_strategy(), 0..300),
        query in point_strategy(),
        k in 0usize..50,
        bucket in 1usize..20,
    ) {
        let store = PointStore::from_points(points);
        let tree = KdTree::build(&store, bucket).unwrap();
        let brute = BruteForceSearch::new(&store);
        let result = tree.find_k_nearest(&query, k);
        prop_assert_eq!(result.len(), k.min(store.count()));
        prop_assert_eq!(result, brute.find_k_nearest(&query, k));
    }

    #[test]
    fn prop_radius_equals_brute_force(
        points in prop::collection::vec(point_strategy(), 0..300),
        query in point_strategy(),
        radius in 0.0f64..80.0,
        bucket in 1usize..20,
    ) {
        let store = PointStore::from_points(points);
        let tree = KdTree::build(&store, bucket).unwrap();
        let brute = BruteForceSearch::new(&store);
        let mut result = tree.find_radius_neighbors(&query, radius * radius);
        let mut expected = brute.find_radius_neighbors(&query, radius * radius);
        result.sort_by_key(|&(idx, _)| idx);
        expected.sort_by_key(|&(idx, _)| idx);
        prop_assert_eq!(result, expected);
    }
}
