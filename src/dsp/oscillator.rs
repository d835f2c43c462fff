use std::{f64::consts::PI, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/*
Periodic Waveforms
==================

Every shape here is written as a function of `cycles`: how many periods have
elapsed since phase zero. One full period is `cycles` going from 0.0 to 1.0.
The same function feeds two very different consumers:

  - the audio oscillator, where `cycles` is the running phase accumulator
  - the canvas renderer, where `cycles = x / period` for a pixel column x

  Shape      Formula (t = cycles)                 Range
  --------   -----------------------------------  ------------
  Sine       sin(2πt)                              [-1, 1]
  Square     sign(sin(2πt))                        {-1, 0, 1}
  Triangle   (2/π) · asin(sin(2πt))                [-1, 1]
  Sawtooth   2 · (t − floor(0.5 + t))              [-1, 1)

Square uses a sign function that maps exactly 0.0 to 0.0. `f64::signum`
returns 1.0 for +0.0, which would break the {-1, 0, 1} contract.
*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
}

impl Waveform {
    pub const ALL: [Waveform; 4] = [
        Waveform::Sine,
        Waveform::Square,
        Waveform::Triangle,
        Waveform::Sawtooth,
    ];

    /// Evaluate the shape after `cycles` periods.
    #[inline]
    pub fn evaluate(self, cycles: f64) -> f64 {
        match self {
            Waveform::Sine => (2.0 * PI * cycles).sin(),
            Waveform::Square => sign((2.0 * PI * cycles).sin()),
            Waveform::Triangle => (2.0 / PI) * (2.0 * PI * cycles).sin().asin(),
            Waveform::Sawtooth => 2.0 * (cycles - (0.5 + cycles).floor()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Waveform::Sine => "sine",
            Waveform::Square => "square",
            Waveform::Triangle => "triangle",
            Waveform::Sawtooth => "sawtooth",
        }
    }

    /// Next shape in selector order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&w| w == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|&w| w == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[inline]
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown selector values fall back to sine, never fail.
impl FromStr for Waveform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "square" => Waveform::Square,
            "triangle" => Waveform::Triangle,
            "sawtooth" | "saw" => Waveform::Sawtooth,
            _ => Waveform::Sine,
        })
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorError {
    #[error("oscillator was already stopped")]
    AlreadyStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OscState {
    Created,
    Running,
    Stopped,
}

/// A single phase-accumulating tone source.
///
/// Like a platform oscillator node it is one-shot: once stopped it stays
/// silent forever and has to be replaced, not restarted.
#[derive(Debug, Clone)]
pub struct Oscillator {
    waveform: Waveform,
    frequency: f32,
    /// Phase in cycles, kept in [0, 1)
    phase: f64,
    state: OscState,
    connected: bool,
}

impl Oscillator {
    pub fn new(waveform: Waveform) -> Self {
        Self {
            waveform,
            frequency: 0.0,
            phase: 0.0,
            state: OscState::Created,
            connected: false,
        }
    }

    pub fn start(&mut self) {
        if self.state == OscState::Created {
            self.state = OscState::Running;
        }
    }

    pub fn stop(&mut self) -> Result<(), OscillatorError> {
        match self.state {
            OscState::Stopped => Err(OscillatorError::AlreadyStopped),
            _ => {
                self.state = OscState::Stopped;
                Ok(())
            }
        }
    }

    pub fn connect(&mut self) {
        self.connected = true;
    }

    pub fn disconnect(&mut self) {
        self.connected = false;
    }

    /// Retune immediately; phase is preserved so there is no discontinuity.
    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = frequency.max(0.0);
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> Waveform {
        self.waveform
    }

    pub fn is_running(&self) -> bool {
        self.state == OscState::Running
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Produce one sample and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, sample_rate: f32) -> f32 {
        if !self.is_running() || !self.connected {
            return 0.0;
        }
        let out = self.waveform.evaluate(self.phase) as f32;
        self.phase += self.frequency as f64 / sample_rate as f64;
        self.phase -= self.phase.floor();
        out
    }

    pub fn render(&mut self, out: &mut [f32], sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(sample_rate);
        }
    }
}
