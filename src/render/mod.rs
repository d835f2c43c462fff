//! Waveform drawing: the logical canvas, the sampling function and the
//! per-pixel draw loop.

pub mod canvas;
pub mod renderer;
pub mod waveform;

pub use canvas::{Canvas, CanvasFrame, Gradient, Point, Rgb};
pub use renderer::{tick_period_ms, WaveformRenderer};
