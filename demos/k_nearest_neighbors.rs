//! Demo of k-nearest neighbor queries
//!
//! Builds a k-d tree over a grid plus random points and compares its answers
//! with brute force search.
//!
//! Run with `RUST_LOG=debug` to see the build summary.

use clap::Parser;
use kdcrate_core::{NearestNeighborSearch, Point3f, PointStore};
use kdcrate_index::{BruteForceSearch, KdTree, KdTreeConfig, PointStoreNeighbors};
use rand::Rng;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "k-nearest neighbor search over a synthetic point cloud")]
struct Args {
    /// Number of random points added to the 5x5x3 grid
    #[arg(long, default_value_t = 20)]
    random_points: usize,

    /// Neighbors per query
    #[arg(short, default_value_t = 3)]
    k: usize,

    /// Leaf bucket size of the tree
    #[arg(long, default_value_t = 10)]
    leaf_size: usize,

    /// Print the tree configuration as JSON
    #[arg(long)]
    show_config: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    println!("=== K-Nearest Neighbors Demo ===\n");

    // Add points in a grid pattern
    let mut coords = Vec::new();
    for x in 0..5 {
        for y in 0..5 {
            for z in 0..3 {
                coords.extend_from_slice(&[x as f32, y as f32, z as f32]);
            }
        }
    }

    // Add some random points for more interesting results
    let mut rng = rand::thread_rng();
    for _ in 0..args.random_points {
        coords.extend_from_slice(&[
            rng.gen_range(-2.0..7.0),
            rng.gen_range(-2.0..7.0),
            rng.gen_range(-1.0..4.0),
        ]);
    }

    let store = PointStore::from_flat(&coords)?;
    println!("Created point store with {} points", store.count());

    let config = KdTreeConfig::new().with_leaf_bucket_size(args.leaf_size);
    if args.show_config {
        println!("Tree config: {}", serde_json::to_string(&config)?);
    }

    let start = Instant::now();
    let tree = KdTree::build_with_config(&store, &config)?;
    println!(
        "Built k-d tree in {:?}: {} leaves, depth {}\n",
        start.elapsed(),
        tree.leaf_count(),
        tree.depth()
    );

    // 1. Neighborhood of every stored point
    println!("1. Finding {}-nearest neighbors for each point:", args.k);
    let neighbors = store.k_nearest_neighbors(args.k)?;
    for (i, point_neighbors) in neighbors.iter().take(5).enumerate() {
        let ids: Vec<usize> = point_neighbors.iter().map(|n| n.index).collect();
        println!("   Point {}: {:?}", i, ids);
    }
    if neighbors.len() > 5 {
        println!("   ... and {} more points", neighbors.len() - 5);
    }

    // 2. Single query point, tree versus brute force
    let query = Point3f::new(2.5, 2.5, 1.0);
    println!("\n2. Query point {:?}:", query);
    let brute = BruteForceSearch::new(&store);
    let tree_result = tree.find_k_nearest(&query, args.k);
    let brute_result = brute.find_k_nearest(&query, args.k);
    for (idx, d2) in &tree_result {
        println!("   index {:3} at distance {:.4}", idx, d2.sqrt());
    }
    println!(
        "   brute force agrees: {}",
        if tree_result == brute_result { "yes" } else { "no" }
    );

    // 3. Batch of queries on the thread pool
    let queries: Vec<Point3f> = (0..1000)
        .map(|_| {
            Point3f::new(
                rng.gen_range(0.0..4.0),
                rng.gen_range(0.0..4.0),
                rng.gen_range(0.0..2.0),
            )
        })
        .collect();
    let start = Instant::now();
    let batch = tree.knn_search_batch(&queries, args.k);
    println!(
        "\n3. Answered {} batched queries in {:?}",
        batch.len(),
        start.elapsed()
    );

    Ok(())
}
