// Bio number -> note event mapping.
//
// Each index `i` of the fetched sequence becomes exactly one `NoteEvent`. The
// decisions for index `i` look at the value itself and at its two successors,
// wrapping around the end of the sequence:
//
//   pitch     = scale[num mod len(scale)]
//   chord?    = numbers[(i + 1) mod N] is even
//   duration  = one beat if numbers[(i + 2) mod N] is divisible by 3,
//               otherwise half a beat (integer division)
//   velocity  = 50 + (num * 3) mod 78, always within 50..=127
//
// All of it is pure; the same input always produces the same events.

use crate::scale::{ChordType, Scale};

/// One integer from the remote source. Order in the sequence matters.
pub type BioNumber = u64;

/// Lowest on-velocity the mapping produces.
const VELOCITY_FLOOR: u8 = 50;

/// Modulus for the velocity spread: 50 + 77 = 127.
const VELOCITY_SPREAD: u64 = 78;

/// A single note or simultaneous triad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEvent {
    /// Scale pitch (the chord root when `chord_tones` is set).
    pub pitch: u8,
    /// Note-on velocity.
    pub velocity: u8,
    /// Time in ticks between the note-on(s) and the note-off.
    pub duration: u32,
    /// Root, third, and fifth when this event is a chord.
    pub chord_tones: Option<[u8; 3]>,
}

impl NoteEvent {
    pub fn is_chord(&self) -> bool {
        self.chord_tones.is_some()
    }

    /// Pitches that receive a note-on, in emission order.
    pub fn sounding_pitches(&self) -> &[u8] {
        match &self.chord_tones {
            Some(tones) => &tones[..],
            None => std::slice::from_ref(&self.pitch),
        }
    }

    /// The pitch whose note-off closes this event. For chords only the root is
    /// released; the upper tones get no note-off of their own.
    pub fn release_pitch(&self) -> u8 {
        self.sounding_pitches()[0]
    }
}

/// The full piece: events in order plus the timing they were computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub events: Vec<NoteEvent>,
    pub tempo_bpm: u32,
    pub ticks_per_beat: u16,
}

impl Composition {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// `50 + (num * 3) mod 78`, computed without overflowing for any `u64`.
pub fn velocity(num: BioNumber) -> u8 {
    let spread = (num % VELOCITY_SPREAD) * 3 % VELOCITY_SPREAD;
    VELOCITY_FLOOR + spread as u8
}

/// Whether index `i` plays a chord: its wrapped successor is even.
///
/// `numbers` must be non-empty.
pub fn is_chord(numbers: &[BioNumber], i: usize) -> bool {
    numbers[(i + 1) % numbers.len()] % 2 == 0
}

/// Duration for index `i`: a full beat when the value two steps ahead
/// (wrapping) is divisible by 3, half a beat otherwise.
///
/// `numbers` must be non-empty.
pub fn duration_ticks(numbers: &[BioNumber], i: usize, ticks_per_beat: u16) -> u32 {
    if numbers[(i + 2) % numbers.len()] % 3 == 0 {
        ticks_per_beat as u32
    } else {
        ticks_per_beat as u32 / 2
    }
}

/// Applies the per-index rules with a fixed scale, chord quality, and resolution.
#[derive(Debug, Clone)]
pub struct CompositionMapper<'a> {
    scale: &'a Scale,
    chord_type: ChordType,
    ticks_per_beat: u16,
}

impl<'a> CompositionMapper<'a> {
    pub fn new(scale: &'a Scale, chord_type: ChordType, ticks_per_beat: u16) -> Self {
        Self {
            scale,
            chord_type,
            ticks_per_beat,
        }
    }

    /// Map index `i` of `numbers` to its event. Panics if `i` is out of bounds.
    pub fn map_note(&self, numbers: &[BioNumber], i: usize) -> NoteEvent {
        let num = numbers[i];
        let pitch = self.scale.degree(num);
        let chord_tones = is_chord(numbers, i).then(|| self.chord_type.chord(pitch));
        NoteEvent {
            pitch,
            velocity: velocity(num),
            duration: duration_ticks(numbers, i, self.ticks_per_beat),
            chord_tones,
        }
    }

    /// Map the whole sequence. An empty sequence gives an empty composition.
    pub fn compose(&self, numbers: &[BioNumber], tempo_bpm: u32) -> Composition {
        let events = (0..numbers.len())
            .map(|i| self.map_note(numbers, i))
            .collect();
        Composition {
            events,
            tempo_bpm,
            ticks_per_beat: self.ticks_per_beat,
        }
    }
}
