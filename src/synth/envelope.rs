use serde::{Deserialize, Serialize};

use crate::engine::{timer::TimerId, PlaybackEvent, TimerQueue};
use crate::synth::voice::Voice;

/*
Per-Note Envelope
=================

Every note gets the same three-part gain shape, scaled to the note length:

  gain
  vol ┤      ●━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━●
      │     ╱                                 ╲
      │    ╱    manual volume window           ╲
    0 ┤━━━●                                     ●━━
      └───┬──┬─────────────────────────────────┬─┬──→ time
          0  5%                               95% 100%
          fade-in        sustain               fade-out

The fade-in is scheduled as gain automation on the audio clock when the note
starts. Two one-shot timers on the playback clock then drive the rest:

  ManualVolumeOn  at  5%   open the manual volume window
  FadeOutStart    at 95%   close the window, ramp from the current gain to 0

While the window is open a volume change is applied to the gain at once,
bypassing the scheduled automation. Starting a new note closes the window and
disarms both timers of the previous note before anything new is scheduled.

If the note is so short that the windows overlap, the timers still fire in
scheduling order and the last write to the gain wins. That is accepted.
*/

/// Fraction of a note spent fading in
pub const FADE_IN_FRACTION: f64 = 0.05;
/// Fraction of a note after which the fade-out starts
pub const FADE_OUT_FRACTION: f64 = 0.95;

/// Volume control position, 0-100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Volume(u8);

impl Volume {
    pub const MAX: Volume = Volume(100);

    pub fn new(value: u8) -> Self {
        Self(value.min(100))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Linear gain, `value / 100`
    pub fn gain(self) -> f32 {
        self.0 as f32 / 100.0
    }

    pub fn saturating_add(self, delta: i16) -> Self {
        Self::new((self.0 as i16 + delta).clamp(0, 100) as u8)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(50)
    }
}

impl From<u8> for Volume {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

#[derive(Debug, Default)]
pub struct EnvelopeDriver {
    manual_volume_active: bool,
    manual_volume_timer: Option<TimerId>,
    fade_out_timer: Option<TimerId>,
    note_duration_ms: f64,
}

impl EnvelopeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retune the voice and schedule this note's envelope.
    pub fn play_note(
        &mut self,
        voice: &mut Voice,
        timers: &mut TimerQueue<PlaybackEvent>,
        frequency: f32,
        note_duration_ms: f64,
        volume: Volume,
    ) {
        voice.set_frequency(frequency);
        self.cancel(timers);
        self.note_duration_ms = note_duration_ms;

        let now = voice.current_time();
        let fade_in_secs = note_duration_ms / 1000.0 * FADE_IN_FRACTION;
        let gain = voice.gain_mut();
        gain.cancel_scheduled_values(now);
        gain.set_value_at_time(0.0, now);
        gain.linear_ramp_to_value_at_time(volume.gain(), now + fade_in_secs);

        self.manual_volume_timer = Some(timers.set_timeout(
            note_duration_ms * FADE_IN_FRACTION,
            PlaybackEvent::ManualVolumeOn,
        ));
        self.fade_out_timer = Some(timers.set_timeout(
            note_duration_ms * FADE_OUT_FRACTION,
            PlaybackEvent::FadeOutStart,
        ));
    }

    /// Fade-in has finished: live volume changes now go straight to the gain.
    pub fn enable_manual_volume(&mut self) {
        self.manual_volume_timer = None;
        self.manual_volume_active = true;
    }

    /// Close the manual window and ramp from wherever the gain is down to 0.
    pub fn begin_fade_out(&mut self, voice: &mut Voice) {
        self.fade_out_timer = None;
        self.manual_volume_active = false;

        let now = voice.current_time();
        let fade_out_secs = self.note_duration_ms / 1000.0 * (1.0 - FADE_OUT_FRACTION);
        let current = voice.gain_now();
        let gain = voice.gain_mut();
        gain.cancel_scheduled_values(now);
        gain.set_value_at_time(current, now);
        gain.linear_ramp_to_value_at_time(0.0, now + fade_out_secs);
    }

    /// Apply a volume change if the manual window is open.
    ///
    /// Returns whether the gain was touched.
    pub fn set_volume(&self, voice: &mut Voice, volume: Volume) -> bool {
        if !self.manual_volume_active {
            return false;
        }
        let now = voice.current_time();
        voice.gain_mut().set_value_at_time(volume.gain(), now);
        true
    }

    /// Close the window and disarm both per-note timers.
    pub fn cancel(&mut self, timers: &mut TimerQueue<PlaybackEvent>) {
        self.manual_volume_active = false;
        timers.cancel_handle(&mut self.manual_volume_timer);
        timers.cancel_handle(&mut self.fade_out_timer);
    }

    pub fn is_manual_volume_active(&self) -> bool {
        self.manual_volume_active
    }
}
