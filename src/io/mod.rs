// Purpose - everything that leaves the process: persistence, capture, taps

pub mod capture;
pub mod prefs;
#[cfg(feature = "rtrb")]
pub mod tap;

pub use capture::{write_wav, Recorder, Recording, CAPTURE_FPS};
pub use prefs::Preferences;
#[cfg(feature = "rtrb")]
pub use tap::{audio_tap, AudioTap, TapReader};
