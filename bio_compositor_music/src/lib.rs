// Bio Compositor music core.
//
// Turns an ordered sequence of bio numbers into a single-track Standard MIDI
// File. Everything in this crate is pure and deterministic: the same numbers,
// scale, chord type, tempo, and resolution always yield byte-identical output.
// Fetching the numbers lives in the `bio_compositor` crate.
//
// Architecture:
// - scale.rs: the fixed pitch table, validated `Scale` wrapper, chord types
// - mapping.rs: per-index note/chord/duration/velocity decisions and the
//   `Composition` they build up
// - midi.rs: `MidiWriter`, which owns the file header (and so the ticks-per-beat
//   resolution) and serializes a `Composition` through `midly`
// - error.rs: `MusicError`

pub mod error;
pub mod mapping;
pub mod midi;
pub mod scale;

pub use error::MusicError;
pub use mapping::{BioNumber, Composition, CompositionMapper, NoteEvent};
pub use midi::MidiWriter;
pub use scale::{ChordType, MAJOR_SCALE, Scale};
