//! Benchmarks for gain automation lookups.

use std::hint::black_box;

use criterion::Criterion;
use tonecanvas::dsp::AudioParam;

pub fn bench_automation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/automation");

    // One note's worth of events: fade-in, manual set, fade-out
    let mut param = AudioParam::new(0.0);
    param.set_value_at_time(0.0, 0.0);
    param.linear_ramp_to_value_at_time(0.5, 0.05);
    param.set_value_at_time(0.8, 0.5);
    param.set_value_at_time(0.8, 0.95);
    param.linear_ramp_to_value_at_time(0.0, 1.0);

    group.bench_function("value_at/512", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for i in 0..512 {
                acc += param.value_at(black_box(i as f64 / 512.0));
            }
            acc
        })
    });

    group.finish();
}
