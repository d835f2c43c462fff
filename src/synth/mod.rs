// Purpose: the single voice and the per-note envelope that drives its gain
// This layer sits between the raw DSP blocks and the playback engine

pub mod envelope;
pub mod voice;

pub use envelope::{EnvelopeDriver, Volume, FADE_IN_FRACTION, FADE_OUT_FRACTION};
pub use voice::{lock, SharedVoice, Voice};
