use criterion::measurement::ValueFormatter;
use criterion::Throughput;
use stats_alloc::Stats;

/// Allocator calls made while the measured routine runs.
///
/// Reallocations are counted alongside fresh allocations, so growing a
/// buffer in place still shows up.
pub struct Allocations;

fn allocation_events(stats: &Stats) -> usize {
    stats.allocations + stats.reallocations
}

stats_counter!(Allocations, "allocation events", allocation_events, &EventFormatter);

struct EventFormatter;

impl ValueFormatter for EventFormatter {
    fn scale_values(&self, _: f64, _: &mut [f64]) -> &'static str {
        "events"
    }

    fn scale_throughputs(&self, _: f64, _: &Throughput, _: &mut [f64]) -> &'static str {
        "events"
    }

    fn scale_for_machines(&self, _: &mut [f64]) -> &'static str {
        "events"
    }
}
