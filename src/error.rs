//! Error types for the library.
//!
//! Playback has exactly one recoverable failure: the user typed something
//! that is not a melody. Everything else in the audio path is best-effort
//! and swallowed where it happens. Persistence and capture get their own
//! error enums so the binary can report them.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("enter at least one note")]
    Empty,

    #[error("'{found}' at position {position} is not a note (use C, D, E, F, G, A or B)")]
    BadNote { found: char, position: usize },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("not recording")]
    NotRecording,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("wav encoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error("frame encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
