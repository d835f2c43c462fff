//! Waveform renderer - the per-pixel draw loop
//!
//! Each note change restarts a repeating draw tick. One tick draws one pixel
//! column, and the tick period is chosen so that `canvas width` ticks span the
//! whole song:
//!
//! ```text
//! tick_period = song_duration / canvas_width        (ms per column)
//! ```
//!
//! The column cursor is not reset between notes, so consecutive notes extend
//! one unbroken stroke. Only a new song clears the canvas.

use super::{
    canvas::{Canvas, Gradient},
    waveform::{deflection, period_for},
};
use crate::{
    dsp::Waveform,
    engine::{PlaybackEvent, PlaybackSession, TimerQueue},
    synth::Volume,
};

/// Milliseconds per drawn column for a song of `song_duration_ms`.
pub fn tick_period_ms(song_duration_ms: f64, canvas_width: u32) -> f64 {
    song_duration_ms / canvas_width as f64
}

#[derive(Debug, Clone)]
pub struct WaveformRenderer {
    canvas: Canvas,
    shape: Waveform,
    /// Next pixel column to draw
    column: f64,
    /// Ticks drawn by the current loop
    ticks: u32,
    tick_period_ms: f64,
    /// Drawn wavelength for the current note, in pixels
    period: f64,
}

impl WaveformRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        let mut canvas = Canvas::new(width, height);
        canvas.move_to(0.0, canvas.height() as f64 / 2.0);
        Self {
            canvas,
            shape: Waveform::Sine,
            column: 0.0,
            ticks: 0,
            tick_period_ms: 0.0,
            period: 1.0,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn shape(&self) -> Waveform {
        self.shape
    }

    /// Takes effect from the next tick, mid-note included.
    pub fn set_shape(&mut self, shape: Waveform) {
        self.shape = shape;
    }

    pub fn set_gradient(&mut self, gradient: Gradient) {
        self.canvas.set_gradient(gradient);
    }

    pub fn tick_period(&self) -> f64 {
        self.tick_period_ms
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn column(&self) -> f64 {
        self.column
    }

    /// Cancel the running draw loop and start a fresh one for the session's
    /// current note. Clears the canvas only when the session is a new song.
    pub fn restart_draw(
        &mut self,
        session: &mut PlaybackSession,
        timers: &mut TimerQueue<PlaybackEvent>,
    ) {
        timers.cancel_handle(&mut session.draw_tick);

        if session.reset {
            let center = self.canvas.height() as f64 / 2.0;
            self.canvas.clear();
            self.canvas.move_to(0.0, center);
            self.column = 0.0;
        }

        self.tick_period_ms = tick_period_ms(session.song_duration_ms(), self.canvas.width());
        self.period = period_for(session.frequency, session.song.len());
        self.ticks = 0;

        session.draw_tick = Some(timers.set_interval(self.tick_period_ms, PlaybackEvent::DrawTick));
        session.reset = false;
    }

    /// Draw one column. Returns true once this loop has drawn a full canvas
    /// width and must stop.
    pub fn draw_tick(&mut self, volume: Volume) -> bool {
        let center = self.canvas.height() as f64 / 2.0;
        let y = center + deflection(self.column, self.period, self.shape, volume.value());
        self.canvas.line_to(self.column, y);

        self.column += 1.0;
        self.ticks += 1;
        self.ticks >= self.canvas.width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_period_spans_canvas() {
        assert_eq!(tick_period_ms(3000.0, 300), 10.0);
        assert_eq!(tick_period_ms(600.0, 300), 2.0);
    }

    #[test]
    fn loop_finishes_after_canvas_width_ticks() {
        let mut renderer = WaveformRenderer::new(40, 20);
        let done: Vec<bool> = (0..40).map(|_| renderer.draw_tick(Volume::new(50))).collect();
        assert!(done[..39].iter().all(|d| !d));
        assert!(done[39]);
        assert_eq!(renderer.column(), 40.0);
    }

    #[test]
    fn silent_volume_draws_flat_line() {
        let mut renderer = WaveformRenderer::new(10, 20);
        for _ in 0..10 {
            renderer.draw_tick(Volume::new(0));
        }
        assert!(renderer.canvas().path().iter().all(|p| p.y == 10.0));
    }
}
