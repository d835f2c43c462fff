//! Voice - the one long-lived oscillator → gain chain
//!
//! The player retunes this voice in place for every note and only replaces
//! the oscillator when a new song starts. The audio device callback renders
//! it; the player thread schedules gain automation on it. Both sides reach it
//! through a [`SharedVoice`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dsp::{AudioParam, Oscillator, Waveform};
#[cfg(feature = "rtrb")]
use crate::io::tap::AudioTap;

/// Voice shared between the player and the audio callback
pub type SharedVoice = Arc<Mutex<Voice>>;

/// Lock a shared voice, recovering the guard if a panicking holder poisoned it.
pub fn lock(voice: &SharedVoice) -> MutexGuard<'_, Voice> {
    voice.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Voice {
    sample_rate: f32,
    oscillator: Oscillator,
    gain: AudioParam,
    /// Samples rendered so far; the audio clock
    clock: u64,
    /// Gain of the most recently rendered sample (for meters)
    level: f32,
    #[cfg(feature = "rtrb")]
    tap: Option<AudioTap>,
}

impl Voice {
    /// A running, silent voice at 0 Hz.
    pub fn new(sample_rate: f32, waveform: Waveform) -> Self {
        let mut oscillator = Oscillator::new(waveform);
        oscillator.set_frequency(0.0);
        oscillator.connect();
        oscillator.start();

        Self {
            sample_rate,
            oscillator,
            gain: AudioParam::new(0.0),
            clock: 0,
            level: 0.0,
            #[cfg(feature = "rtrb")]
            tap: None,
        }
    }

    pub fn into_shared(self) -> SharedVoice {
        Arc::new(Mutex::new(self))
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Audio clock in seconds
    pub fn current_time(&self) -> f64 {
        self.clock as f64 / self.sample_rate as f64
    }

    pub fn frequency(&self) -> f32 {
        self.oscillator.frequency()
    }

    pub fn waveform(&self) -> Waveform {
        self.oscillator.waveform()
    }

    pub fn oscillator(&self) -> &Oscillator {
        &self.oscillator
    }

    /// Retune at the current audio time. No glide.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.oscillator.set_frequency(frequency);
    }

    pub fn gain(&self) -> &AudioParam {
        &self.gain
    }

    pub fn gain_mut(&mut self) -> &mut AudioParam {
        &mut self.gain
    }

    /// Gain value right now on the audio clock
    pub fn gain_now(&self) -> f32 {
        self.gain.value_at(self.current_time())
    }

    /// Jump the gain to zero at the current audio time.
    pub fn silence(&mut self) {
        let now = self.current_time();
        self.gain.set_value_at_time(0.0, now);
    }

    /// Replace the oscillator with a fresh one of the same waveform.
    ///
    /// A stopped oscillator cannot be restarted, so a new song always gets a
    /// new one. Stopping an oscillator that is already stopped is fine.
    pub fn reset_oscillator(&mut self) {
        let waveform = self.oscillator.waveform();
        let frequency = self.oscillator.frequency();
        let _ = self.oscillator.stop();
        self.oscillator.disconnect();
        self.silence();

        let mut fresh = Oscillator::new(waveform);
        fresh.set_frequency(frequency);
        fresh.connect();
        fresh.start();
        self.oscillator = fresh;
        tracing::debug!(%waveform, "oscillator recreated");
    }

    #[cfg(feature = "rtrb")]
    pub fn attach_tap(&mut self, tap: AudioTap) {
        self.tap = Some(tap);
    }

    #[cfg(feature = "rtrb")]
    pub fn detach_tap(&mut self) -> Option<AudioTap> {
        self.tap.take()
    }

    /// Render a mono block, advancing the audio clock.
    pub fn render_block(&mut self, out: &mut [f32]) {
        let sr = self.sample_rate as f64;
        for sample in out.iter_mut() {
            let t = self.clock as f64 / sr;
            let gain = self.gain.value_at(t);
            *sample = self.oscillator.next_sample(self.sample_rate) * gain;
            self.level = gain;
            self.clock += 1;
        }
        self.gain.prune(self.current_time());

        #[cfg(feature = "rtrb")]
        if let Some(tap) = self.tap.as_mut() {
            tap.push_block(out);
        }
    }

    /// Gain of the last rendered sample
    pub fn level(&self) -> f32 {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    #[test]
    fn silent_until_gain_is_raised() {
        let mut voice = Voice::new(SAMPLE_RATE, Waveform::Square);
        voice.set_frequency(100.0);

        let mut buf = vec![0.0f32; 64];
        voice.render_block(&mut buf);
        assert!(buf.iter().all(|&s| s == 0.0));
        assert!((voice.current_time() - 0.064).abs() < 1e-9);
    }

    #[test]
    fn gain_scales_output() {
        let mut voice = Voice::new(SAMPLE_RATE, Waveform::Square);
        voice.set_frequency(100.0);
        voice.gain_mut().set_value_at_time(0.5, 0.0);

        let mut buf = vec![0.0f32; 10];
        voice.render_block(&mut buf);
        // first sample sits on the zero crossing, then the square is high
        assert_eq!(buf[0], 0.0);
        assert!((buf[1] - 0.5).abs() < 1e-6);
        assert!((voice.level() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn reset_survives_a_stopped_oscillator_and_keeps_waveform() {
        let mut voice = Voice::new(SAMPLE_RATE, Waveform::Triangle);
        voice.reset_oscillator();
        voice.reset_oscillator();

        assert!(voice.oscillator().is_running());
        assert!(voice.oscillator().is_connected());
        assert_eq!(voice.waveform(), Waveform::Triangle);
        assert_eq!(voice.gain_now(), 0.0);
    }

    #[cfg(feature = "rtrb")]
    #[test]
    fn tap_receives_rendered_blocks() {
        let (tap, mut reader) = crate::io::tap::audio_tap(128);
        let mut voice = Voice::new(SAMPLE_RATE, Waveform::Sine);
        voice.attach_tap(tap);

        let mut buf = vec![0.0f32; 32];
        voice.render_block(&mut buf);

        let mut seen = Vec::new();
        assert_eq!(reader.drain_into(&mut seen), 32);
    }
}
