// Errors raised by the music core.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MusicError {
    #[error("unknown chord type: {0}")]
    UnknownChordType(String),
    #[error("scale must contain at least one pitch")]
    EmptyScale,
    /// A scale pitch, or a chord tone built on it, does not fit in 0..=127.
    #[error("pitch {0} does not fit in the MIDI note range (0-127, chord tones included)")]
    PitchOutOfRange(u16),
    #[error("duration of {0} ticks does not fit in a 28-bit MIDI delta time")]
    DurationOutOfRange(u32),
    #[error("tempo of {0} BPM cannot be expressed as a MIDI tempo")]
    TempoOutOfRange(u32),
    #[error("MIDI header uses timecode timing; a metrical resolution is required")]
    UnsupportedTiming,
    #[error("failed to write MIDI file: {0}")]
    Io(#[from] std::io::Error),
}
