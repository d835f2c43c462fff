//! Song - an ordered run of notes parsed from user input

use std::str::FromStr;

use super::notes::Note;
use crate::error::{InvalidInput, PlayError};

/// A validated, non-empty melody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    notes: Vec<Note>,
}

impl Song {
    /// Accepts exactly `^[CDEFGAB]+$`; no trimming, no lowercase.
    pub fn parse(input: &str) -> Result<Self, PlayError> {
        if input.is_empty() {
            return Err(InvalidInput::Empty.into());
        }

        let notes = input
            .chars()
            .enumerate()
            .map(|(position, found)| {
                Note::from_letter(found).ok_or(InvalidInput::BadNote { found, position })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { notes })
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Always false for a parsed song.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, index: usize) -> Option<Note> {
        self.notes.get(index).copied()
    }

    /// Total length when every note lasts `note_duration_ms`.
    pub fn duration_ms(&self, note_duration_ms: f64) -> f64 {
        note_duration_ms * self.notes.len() as f64
    }
}

impl FromStr for Song {
    type Err = PlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
