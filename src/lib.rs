pub mod config; // Persisted user settings
pub mod dsp;
pub mod engine; // Timers, song scheduling, offline rendering
pub mod error;
pub mod io;
pub mod render; // Canvas and the waveform draw loop
pub mod sequencing; // Notes and songs
pub mod synth; // The voice and its per-note envelope

pub use config::Settings;
pub use engine::{NoteChange, PlayOptions, PlaybackState, Player};
pub use error::PlayError;

/// Largest block the audio callback renders in one go
pub const MAX_BLOCK_SIZE: usize = 2048;
