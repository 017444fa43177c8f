//! Criterion measurements for kdcrate benches
//!
//! The memory benches install [`mem::INSTRUMENTED_SYSTEM`] as the global
//! allocator and measure index builds with [`mem::Allocations`] (allocator
//! calls) and [`mem::AllocationSize`] (gross bytes).

use criterion::measurement::Measurement;

pub mod mem;

/// A criterion measurement with a display name used in benchmark group titles
pub trait KdcrateMeasurement: Measurement {
    const NAME: &'static str;
}
