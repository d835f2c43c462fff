//! Musical input: the note table and songs parsed from text.

pub mod notes;
pub mod song;

pub use notes::Note;
pub use song::Song;
