//! Benchmarks for offline rendering of a whole song.

use criterion::Criterion;
use tonecanvas::{
    engine::{offline, PlayOptions},
    Settings,
};

pub fn bench_bounce(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/bounce");
    group.sample_size(10);

    let settings = Settings::default();
    let options = PlayOptions {
        note_duration_ms: 250.0,
        ..settings.play_options()
    };

    group.bench_function("cdefgab_quarter_second", |b| {
        b.iter(|| offline::bounce("CDEFGAB", options, &settings).map(|out| out.samples.len()))
    });

    group.finish();
}
