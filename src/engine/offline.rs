//! Offline rendering - play a whole song without an audio device
//!
//! The player's timers and the voice's audio clock normally advance
//! independently (timers from the host loop, audio from the device callback).
//! Here both are stepped together: audio is rendered exactly up to each timer's
//! due time before that timer fires, so every gain change lands on the sample
//! it was scheduled for.

use crate::{
    config::Settings,
    engine::scheduler::{PlayOptions, Player},
    error::PlayError,
    render::CanvasFrame,
    synth::{lock, SharedVoice, Voice},
};

/// Sample rate used when no device dictates one
pub const BOUNCE_SAMPLE_RATE: f32 = 48_000.0;

/// Result of an offline render.
#[derive(Debug, Clone)]
pub struct Bounce {
    pub sample_rate: f32,
    /// Mono samples covering exactly the song duration
    pub samples: Vec<f32>,
    /// Canvas once the last draw loop has finished
    pub canvas: CanvasFrame,
}

impl Bounce {
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }
}

/// Render `input` start to finish.
pub fn bounce(input: &str, options: PlayOptions, settings: &Settings) -> Result<Bounce, PlayError> {
    bounce_at(input, options, settings, BOUNCE_SAMPLE_RATE)
}

pub fn bounce_at(
    input: &str,
    options: PlayOptions,
    settings: &Settings,
    sample_rate: f32,
) -> Result<Bounce, PlayError> {
    let voice = Voice::new(sample_rate, settings.tone_waveform).into_shared();
    let mut player = Player::new(voice.clone(), settings.canvas_width, settings.canvas_height);
    player.set_volume(settings.volume);
    player.play(input, options)?;

    let end_ms = player
        .session()
        .map(|s| s.song_duration_ms())
        .unwrap_or_default();
    let mut samples = Vec::with_capacity(samples_at(end_ms, sample_rate));

    while let Some(due) = player.next_due() {
        render_until(&voice, &mut samples, due.min(end_ms), sample_rate);
        player.run_until(due);
    }
    render_until(&voice, &mut samples, end_ms, sample_rate);

    tracing::info!(
        samples = samples.len(),
        end_ms,
        points = player.canvas().path().len(),
        "bounce finished"
    );

    Ok(Bounce {
        sample_rate,
        samples,
        canvas: player.canvas().snapshot(),
    })
}

fn samples_at(ms: f64, sample_rate: f32) -> usize {
    (ms / 1000.0 * sample_rate as f64).round() as usize
}

fn render_until(voice: &SharedVoice, out: &mut Vec<f32>, ms: f64, sample_rate: f32) {
    let target = samples_at(ms, sample_rate);
    if target > out.len() {
        let start = out.len();
        out.resize(target, 0.0);
        lock(voice).render_block(&mut out[start..]);
    }
}
