//! Low-level DSP primitives used by the voice.
//!
//! These components are allocation-free once constructed and know nothing
//! about notes, songs or timers. The synth layer composes them into the
//! single oscillator → gain chain the player drives.

/// Web-Audio-style scheduled parameter values (set / linear ramp / cancel).
pub mod automation;
/// Tone source and the closed set of waveform shapes.
pub mod oscillator;

pub use automation::AudioParam;
pub use oscillator::{Oscillator, OscillatorError, Waveform};
