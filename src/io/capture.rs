//! Capture - record the audio output and the canvas together
//!
//! The recorder is a start/stop toggle fed by the host loop: audio arrives as
//! blocks (usually drained from the audio tap), canvas frames as snapshots
//! offered on every UI tick and kept at a fixed frame rate. Stopping writes a
//! WAV file and a JSON frame log side by side:
//!
//! ```text
//! <dir>/recording.wav          32-bit float, mono
//! <dir>/recording.frames.json  { fps, width, height, gradient, frames: [[{x,y}..]..] }
//! ```

use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use hound::{SampleFormat, WavSpec, WavWriter};
use serde::{Deserialize, Serialize};

use crate::{
    error::CaptureError,
    render::{Canvas, Gradient, Point},
};

/// Canvas frames kept per second
pub const CAPTURE_FPS: u32 = 20;
pub const WAV_FILE: &str = "recording.wav";
pub const FRAMES_FILE: &str = "recording.frames.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLog {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub gradient: Gradient,
    pub frames: Vec<Vec<Point>>,
}

/// Paths written by a finished recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub wav: PathBuf,
    pub frames: PathBuf,
}

#[derive(Debug)]
struct Take {
    started_ms: f64,
    samples: Vec<f32>,
    frames: FrameLog,
}

#[derive(Debug)]
pub struct Recorder {
    dir: PathBuf,
    sample_rate: u32,
    take: Option<Take>,
}

impl Recorder {
    pub fn new(dir: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            dir: dir.into(),
            sample_rate,
            take: None,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.take.is_some()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Start, or stop and write. Returns the files written when stopping.
    pub fn toggle(&mut self, now_ms: f64, canvas: &Canvas) -> Result<Option<Recording>, CaptureError> {
        if self.is_recording() {
            self.stop().map(Some)
        } else {
            self.start(now_ms, canvas);
            Ok(None)
        }
    }

    pub fn start(&mut self, now_ms: f64, canvas: &Canvas) {
        let mut take = Take {
            started_ms: now_ms,
            samples: Vec::new(),
            frames: FrameLog {
                fps: CAPTURE_FPS,
                width: canvas.width(),
                height: canvas.height(),
                gradient: *canvas.gradient(),
                frames: Vec::new(),
            },
        };
        take.frames.frames.push(canvas.path().to_vec());
        self.take = Some(take);
        tracing::info!(dir = %self.dir.display(), "recording started");
    }

    /// Append rendered audio. Ignored when not recording.
    pub fn push_audio(&mut self, block: &[f32]) {
        if let Some(take) = self.take.as_mut() {
            take.samples.extend_from_slice(block);
        }
    }

    /// Offer the canvas at `now_ms`; keeps one frame per 1/fps, repeating the
    /// latest snapshot if the host fell behind.
    pub fn offer_frame(&mut self, now_ms: f64, canvas: &Canvas) {
        let Some(take) = self.take.as_mut() else {
            return;
        };
        let frame_ms = 1000.0 / CAPTURE_FPS as f64;
        let due = ((now_ms - take.started_ms) / frame_ms).floor() as usize + 1;
        while take.frames.frames.len() < due {
            take.frames.frames.push(canvas.path().to_vec());
        }
    }

    pub fn frame_count(&self) -> usize {
        self.take.as_ref().map_or(0, |t| t.frames.frames.len())
    }

    /// Finish the take and write both files.
    pub fn stop(&mut self) -> Result<Recording, CaptureError> {
        let take = self.take.take().ok_or(CaptureError::NotRecording)?;
        fs::create_dir_all(&self.dir)?;

        let recording = Recording {
            wav: self.dir.join(WAV_FILE),
            frames: self.dir.join(FRAMES_FILE),
        };
        write_wav(&recording.wav, &take.samples, self.sample_rate)?;
        let writer = BufWriter::new(File::create(&recording.frames)?);
        serde_json::to_writer(writer, &take.frames)?;

        tracing::info!(
            samples = take.samples.len(),
            frames = take.frames.frames.len(),
            wav = %recording.wav.display(),
            "recording saved"
        );
        Ok(recording)
    }
}

/// Write mono float samples as a 32-bit float WAV.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), CaptureError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}
