//! Playback engine: the cooperative timer queue, the song scheduler that
//! coordinates voice and canvas, and offline rendering on top of both.

pub mod offline;
pub mod scheduler;
pub mod timer;

pub use scheduler::{NoteChange, PlayOptions, PlaybackSession, PlaybackState, Player};
pub use timer::{TimerId, TimerQueue};

/// Everything a playback timer can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Repeating: move to the next note of the song
    NoteAdvance,
    /// One-shot at song end: silence the output
    SongStop,
    /// Repeating: draw one canvas column
    DrawTick,
    /// One-shot at 5% of a note: open the manual volume window
    ManualVolumeOn,
    /// One-shot at 95% of a note: close the window and fade out
    FadeOutStart,
}
