//! Benchmarks for low-level DSP primitives.

mod automation;
mod oscillator;

pub use automation::bench_automation;
pub use oscillator::bench_oscillator;
