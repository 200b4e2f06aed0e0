// MIDI output for compositions.
//
// Produces a Standard MIDI File, format 1 with a single track on channel 0.
// The track opens with one tempo meta event at time 0, then for each note
// event: note-on(s) at delta 0, followed by one note-off at a delta equal to
// the event's duration. For chords, all three tones are switched on together
// but only the root receives a note-off. The track closes with End of Track.
//
// `MidiWriter` owns the file header. The ticks-per-beat resolution that the
// mapping needs is read back from that header rather than assumed, so the
// composition and the serialized file always agree.
//
// Uses the `midly` crate for MIDI writing.

use std::path::Path;

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};

use crate::error::MusicError;
use crate::mapping::Composition;

/// Resolution given to newly created files.
pub const DEFAULT_TICKS_PER_BEAT: u16 = 480;

/// Release velocity for every note-off, independent of the on-velocity.
pub const NOTE_OFF_VELOCITY: u8 = 64;

const MICROSECONDS_PER_MINUTE: u64 = 60_000_000;

/// Largest value a 24-bit tempo field holds.
const MAX_TEMPO: u64 = 0xFF_FFFF;

/// Largest 7-bit note number or velocity.
const MAX_DATA_BYTE: u8 = 127;

/// Largest delta time a track event can carry.
const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Convert beats per minute to microseconds per quarter note, rounding to
/// nearest with ties to even.
pub fn bpm_to_tempo(bpm: u32) -> Result<u24, MusicError> {
    // Past 60 000 000 BPM a beat is shorter than one microsecond.
    if bpm == 0 || u64::from(bpm) > MICROSECONDS_PER_MINUTE {
        return Err(MusicError::TempoOutOfRange(bpm));
    }
    let divisor = bpm as u64;
    let quotient = MICROSECONDS_PER_MINUTE / divisor;
    let remainder = MICROSECONDS_PER_MINUTE % divisor;
    let round_up = match (remainder * 2).cmp(&divisor) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Equal => quotient % 2 == 1,
        std::cmp::Ordering::Less => false,
    };
    let micros = quotient + round_up as u64;
    if micros > MAX_TEMPO {
        return Err(MusicError::TempoOutOfRange(bpm));
    }
    Ok(u24::new(micros as u32))
}

/// Serializes compositions to Standard MIDI Files.
#[derive(Debug, Clone, Copy)]
pub struct MidiWriter {
    header: Header,
}

impl MidiWriter {
    pub fn new() -> Self {
        Self {
            header: Header::new(
                Format::Parallel,
                Timing::Metrical(u15::new(DEFAULT_TICKS_PER_BEAT)),
            ),
        }
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// Resolution of the file being built, read from its header.
    pub fn ticks_per_beat(&self) -> Result<u16, MusicError> {
        match self.header.timing {
            Timing::Metrical(ticks) => Ok(ticks.as_int()),
            Timing::Timecode(..) => Err(MusicError::UnsupportedTiming),
        }
    }

    /// Build the in-memory SMF for `composition`.
    pub fn to_smf(&self, composition: &Composition) -> Result<Smf<'static>, MusicError> {
        let mut smf = Smf::new(self.header);
        smf.tracks.push(composition_track(composition)?);
        Ok(smf)
    }

    /// Serialize `composition` to SMF bytes.
    pub fn to_bytes(&self, composition: &Composition) -> Result<Vec<u8>, MusicError> {
        let smf = self.to_smf(composition)?;
        let mut buf = Vec::new();
        smf.write_std(&mut buf)?;
        Ok(buf)
    }

    /// Serialize `composition` and write it to `path`, replacing any existing file.
    pub fn write(&self, composition: &Composition, path: &Path) -> Result<(), MusicError> {
        let buf = self.to_bytes(composition)?;
        tracing::debug!(
            path = %path.display(),
            bytes = buf.len(),
            notes = composition.len(),
            "writing MIDI file"
        );
        std::fs::write(path, &buf)?;
        Ok(())
    }
}

impl Default for MidiWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn composition_track(composition: &Composition) -> Result<Track<'static>, MusicError> {
    let channel = u4::new(0);
    let mut track: Track<'static> = Vec::with_capacity(composition.len() * 4 + 2);

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(bpm_to_tempo(composition.tempo_bpm)?)),
    });

    for event in &composition.events {
        let vel = key(event.velocity)?;
        for &pitch in event.sounding_pitches() {
            track.push(TrackEvent {
                delta: u28::new(0),
                kind: TrackEventKind::Midi {
                    channel,
                    message: MidiMessage::NoteOn {
                        key: key(pitch)?,
                        vel,
                    },
                },
            });
        }
        track.push(TrackEvent {
            delta: delta(event.duration)?,
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::NoteOff {
                    key: key(event.release_pitch())?,
                    vel: u7::new(NOTE_OFF_VELOCITY),
                },
            },
        });
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    Ok(track)
}

/// Narrow a note number or velocity to the 7-bit MIDI range.
fn key(value: u8) -> Result<u7, MusicError> {
    if value > MAX_DATA_BYTE {
        return Err(MusicError::PitchOutOfRange(value as u16));
    }
    Ok(u7::new(value))
}

fn delta(ticks: u32) -> Result<u28, MusicError> {
    if ticks > MAX_DELTA {
        return Err(MusicError::DurationOutOfRange(ticks));
    }
    Ok(u28::new(ticks))
}
