use criterion::measurement::ValueFormatter;
use criterion::Throughput;
use stats_alloc::Stats;

/// Bytes allocated while the measured routine runs
pub struct AllocationSize;

fn bytes_allocated(stats: &Stats) -> usize {
    stats.bytes_allocated
}

stats_counter!(AllocationSize, "allocated bytes", bytes_allocated, &ByteFormatter);

struct ByteFormatter;

impl ByteFormatter {
    fn unit(typical_value: f64) -> (f64, &'static str) {
        const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
        let mut factor = 1.0;
        let mut unit = 0;
        while typical_value * factor >= 1024.0 && unit + 1 < UNITS.len() {
            factor /= 1024.0;
            unit += 1;
        }
        (factor, UNITS[unit])
    }
}

impl ValueFormatter for ByteFormatter {
    fn scale_values(&self, typical_value: f64, values: &mut [f64]) -> &'static str {
        let (factor, unit) = Self::unit(typical_value);
        for value in values {
            *value *= factor;
        }
        unit
    }

    fn scale_throughputs(&self, _: f64, _: &Throughput, _: &mut [f64]) -> &'static str {
        "B"
    }

    fn scale_for_machines(&self, _: &mut [f64]) -> &'static str {
        "B"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_units() {
        assert_eq!(ByteFormatter::unit(512.0).1, "B");
        assert_eq!(ByteFormatter::unit(4096.0).1, "KiB");
        let (factor, unit) = ByteFormatter::unit(3.0 * 1024.0 * 1024.0);
        assert_eq!(unit, "MiB");
        assert!((3.0 * 1024.0 * 1024.0 * factor - 3.0).abs() < 1e-9);
    }
}
