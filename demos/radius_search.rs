//! Demo of radius queries on a flat coordinate buffer

use clap::Parser;
use kdcrate_core::{Aabb, Point3d, PointStore, SoaPointStore};
use kdcrate_index::{KdTree, SearchParams};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Radius search over a helix of points")]
struct Args {
    /// Number of helix points
    #[arg(short, long, default_value_t = 10_000)]
    points: usize,

    /// Search radius
    #[arg(short, long, default_value_t = 0.5)]
    radius: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    println!("=== Radius Search Demo ===\n");

    let coords: Vec<f64> = (0..args.points)
        .flat_map(|i| {
            let t = i as f64 * 0.05;
            [t.cos() * 2.0, t.sin() * 2.0, t * 0.02]
        })
        .collect();

    let store = PointStore::from_flat(&coords)?;
    let soa = SoaPointStore::from_flat(&coords)?;
    let tree = KdTree::build(&store, 16)?;
    let soa_tree = KdTree::build(&soa, 16)?;
    tracing::info!(points = store.count(), "indexed helix");

    if let Some(extent) = Aabb::from_points(store.iter()) {
        println!("Helix extent: {:?} .. {:?}", extent.min, extent.max);
        println!("Index root box matches: {}", tree.root_bbox() == Some(&extent));
    }

    let query = Point3d::new(2.0, 0.0, 0.0);
    let radius_squared = args.radius * args.radius;
    let params = SearchParams::new().with_sorted(true);
    let found = tree.radius_search_with(&query, radius_squared, &params);

    println!("Points within {} of {:?}: {}", args.radius, query, found.len());
    for n in found.iter().take(10) {
        println!("   index {:5} at distance {:.4}", n.index, n.distance());
    }

    let soa_count = soa_tree.count_within_radius(&query, radius_squared);
    println!("\nStructure-of-arrays store finds {} points", soa_count);

    // Malformed buffers are rejected unless truncation is requested
    let malformed = &coords[..coords.len().min(7)];
    match PointStore::from_flat(malformed) {
        Ok(s) => println!("Accepted {} points", s.count()),
        Err(e) => println!("Rejected malformed buffer: {}", e),
    }
    let truncated = PointStore::from_flat_truncating(malformed);
    println!("Truncating constructor kept {} points", truncated.count());

    Ok(())
}
