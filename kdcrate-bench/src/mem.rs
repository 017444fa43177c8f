use stats_alloc::StatsAlloc;

pub type InstrumentedSystem = StatsAlloc<std::alloc::System>;
pub use stats_alloc::INSTRUMENTED_SYSTEM;

/// Implements a counter measurement: the growth of one `stats_alloc::Stats`
/// reading between `start` and `end`.
macro_rules! stats_counter {
    ($ty:ty, $name:expr, $read:path, $formatter:expr) => {
        impl $crate::KdcrateMeasurement for $ty {
            const NAME: &'static str = $name;
        }

        impl ::criterion::measurement::Measurement for $ty {
            type Intermediate = usize;
            type Value = usize;

            fn start(&self) -> Self::Intermediate {
                $read(&$crate::mem::INSTRUMENTED_SYSTEM.stats())
            }

            fn end(&self, start: Self::Intermediate) -> Self::Value {
                $read(&$crate::mem::INSTRUMENTED_SYSTEM.stats()) - start
            }

            fn add(&self, &v1: &Self::Value, &v2: &Self::Value) -> Self::Value {
                v1 + v2
            }

            fn zero(&self) -> Self::Value {
                0
            }

            fn to_f64(&self, &value: &Self::Value) -> f64 {
                value as f64
            }

            fn formatter(&self) -> &dyn ::criterion::measurement::ValueFormatter {
                $formatter
            }
        }
    };
}

mod allocations;
mod allocation_size;
pub use allocations::Allocations;
pub use allocation_size::AllocationSize;
