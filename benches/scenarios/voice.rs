//! Benchmarks for the voice with a live note envelope.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tonecanvas::{
    dsp::Waveform,
    engine::{PlaybackEvent, TimerQueue},
    synth::{EnvelopeDriver, Voice, Volume},
};

use crate::BLOCK_SIZES;

pub fn bench_voice(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voice");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let mut voice = Voice::new(48_000.0, Waveform::Sine);
        let mut timers = TimerQueue::<PlaybackEvent>::new();
        let mut envelope = EnvelopeDriver::new();

        group.bench_with_input(BenchmarkId::new("enveloped_note", size), &size, |b, _| {
            b.iter(|| {
                // a new note every block keeps the automation list busy
                envelope.play_note(&mut voice, &mut timers, 440.0, 1000.0, Volume::new(80));
                voice.render_block(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
