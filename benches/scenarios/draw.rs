//! Benchmarks for the per-column draw loop.

use criterion::Criterion;
use tonecanvas::{
    dsp::Waveform,
    engine::{PlayOptions, Player},
    synth::Voice,
};

pub fn bench_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/draw");

    group.bench_function("seven_notes_300px", |b| {
        b.iter(|| {
            let voice = Voice::new(48_000.0, Waveform::Sine).into_shared();
            let mut player = Player::new(voice, 300, 150);
            let options = PlayOptions {
                note_duration_ms: 100.0,
                wave_shape: Waveform::Triangle,
                ..Default::default()
            };
            let _ = player.play("CDEFGAB", options);
            player.run_until(2_000.0);
            player.canvas().path().len()
        })
    });

    group.finish();
}
