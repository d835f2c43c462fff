/*
Note Table
==========

Seven natural notes of the octave starting at middle C. Each letter maps to a
fixed frequency rounded to one decimal place:

  C 261.6   D 293.7   E 329.6   F 349.2   G 392.0   A 440.0   B 493.9

There are no sharps, flats, octaves or rests: a song is nothing but a string
of these letters, one letter per note slot.
*/

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Note {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Note {
    pub const ALL: [Note; 7] = [Note::C, Note::D, Note::E, Note::F, Note::G, Note::A, Note::B];

    /// Uppercase letters only; lowercase input is not a note.
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'C' => Some(Note::C),
            'D' => Some(Note::D),
            'E' => Some(Note::E),
            'F' => Some(Note::F),
            'G' => Some(Note::G),
            'A' => Some(Note::A),
            'B' => Some(Note::B),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Note::C => 'C',
            Note::D => 'D',
            Note::E => 'E',
            Note::F => 'F',
            Note::G => 'G',
            Note::A => 'A',
            Note::B => 'B',
        }
    }

    /// Frequency in Hz
    pub fn frequency(self) -> f32 {
        match self {
            Note::C => 261.6,
            Note::D => 293.7,
            Note::E => 329.6,
            Note::F => 349.2,
            Note::G => 392.0,
            Note::A => 440.0,
            Note::B => 493.9,
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
