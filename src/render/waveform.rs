//! Waveform sampling for the canvas
//!
//! The drawn wavelength is a cosmetic mapping, not the real pitch: it scales
//! with the note frequency and with half the number of notes in the song, so
//! every note of every song looks visibly different across the canvas.
//!
//! ```text
//! period(freq, n) = 1 / ((freq / 10000) * (n / 2))      pixels
//! y(x)            = center + 0.4 * volume * shape(x / period)
//! ```

use crate::dsp::Waveform;

/// Vertical pixels per volume unit at full deflection
pub const AMPLITUDE_PER_VOLUME: f64 = 0.4;

/// Drawn period in pixels for a note frequency within a song of `num_notes`.
pub fn period_for(frequency: f32, num_notes: usize) -> f64 {
    1.0 / ((frequency as f64 / 10_000.0) * (num_notes as f64 / 2.0))
}

/// `f(x, period, shape)`: the shape value at pixel column `x`.
#[inline]
pub fn sample(x: f64, period: f64, shape: Waveform) -> f64 {
    shape.evaluate(x / period)
}

/// Offset from the vertical center for a control volume of 0-100.
#[inline]
pub fn deflection(x: f64, period: f64, shape: Waveform, volume: u8) -> f64 {
    AMPLITUDE_PER_VOLUME * volume as f64 * sample(x, period, shape)
}
