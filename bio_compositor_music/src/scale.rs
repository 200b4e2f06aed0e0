// Pitch table and chord construction.
//
// A bio number is reduced to a note by indexing a fixed ascending pitch table
// with `num mod len`. The default table is two octaves of C major starting at
// middle C. Chords are root-position triads built on the chosen scale degree.
//
// `Scale` validates its contents on construction so every pitch (and every
// triad built on it) is a legal MIDI note number. Downstream code can index
// and offset without further range checks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MusicError;

/// C major from middle C (MIDI 60) up two octaves to C6 (MIDI 84).
pub const MAJOR_SCALE: [u8; 15] = [60, 62, 64, 65, 67, 69, 71, 72, 74, 76, 77, 79, 81, 83, 84];

/// Highest MIDI note number.
const MAX_PITCH: u16 = 127;

/// Semitones from root to fifth; the top of every supported triad.
const TRIAD_SPAN: u16 = 7;

/// Triad quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordType {
    /// Root, major third, perfect fifth.
    #[default]
    Major,
    /// Root, minor third, perfect fifth.
    Minor,
}

impl ChordType {
    /// Semitone offsets from the root for each chord tone.
    pub fn intervals(self) -> [u8; 3] {
        match self {
            ChordType::Major => [0, 4, 7],
            ChordType::Minor => [0, 3, 7],
        }
    }

    /// Build the triad on `root`. Callers must ensure `root + 7 <= 127`,
    /// which `Scale` guarantees for all of its degrees.
    pub fn chord(self, root: u8) -> [u8; 3] {
        self.intervals().map(|offset| root + offset)
    }
}

impl FromStr for ChordType {
    type Err = MusicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "major" => Ok(ChordType::Major),
            "minor" => Ok(ChordType::Minor),
            _ => Err(MusicError::UnknownChordType(s.to_string())),
        }
    }
}

impl fmt::Display for ChordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordType::Major => f.write_str("major"),
            ChordType::Minor => f.write_str("minor"),
        }
    }
}

/// A non-empty pitch table whose every entry can carry a triad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Scale {
    pitches: Vec<u8>,
}

impl Scale {
    pub fn new(pitches: Vec<u8>) -> Result<Self, MusicError> {
        if pitches.is_empty() {
            return Err(MusicError::EmptyScale);
        }
        if let Some(&bad) = pitches.iter().find(|&&p| p as u16 + TRIAD_SPAN > MAX_PITCH) {
            return Err(MusicError::PitchOutOfRange(bad as u16));
        }
        Ok(Self { pitches })
    }

    /// The default two-octave C major table.
    pub fn major() -> Self {
        Self {
            pitches: MAJOR_SCALE.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn pitches(&self) -> &[u8] {
        &self.pitches
    }

    /// Reduce an arbitrary bio number to a scale pitch: `pitches[num mod len]`.
    pub fn degree(&self, num: u64) -> u8 {
        self.pitches[(num % self.pitches.len() as u64) as usize]
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::major()
    }
}

impl TryFrom<Vec<u8>> for Scale {
    type Error = MusicError;

    fn try_from(pitches: Vec<u8>) -> Result<Self, Self::Error> {
        Scale::new(pitches)
    }
}

impl From<Scale> for Vec<u8> {
    fn from(scale: Scale) -> Self {
        scale.pitches
    }
}
