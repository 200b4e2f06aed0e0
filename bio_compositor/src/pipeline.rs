// Fetch -> compose -> write.
//
// The only impure steps are the HTTP request at the start and the file write
// at the end; everything between is the pure mapping from
// `bio_compositor_music`. Progress lines go to stdout as each stage starts and
// finishes.

use std::path::PathBuf;

use bio_compositor_music::{BioNumber, Composition, CompositionMapper, MidiWriter};

use crate::client::BioNumberClient;
use crate::config::CompositorConfig;
use crate::error::CompositorError;

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub numbers: Vec<BioNumber>,
    pub composition: Composition,
    pub output_path: PathBuf,
}

/// Run the whole pipeline with `config`.
pub fn run(config: &CompositorConfig) -> Result<RunSummary, CompositorError> {
    config.validate()?;
    let client = BioNumberClient::new(&config.base_url, config.request_timeout()?)?;
    let numbers = client.fetch(config.note_count)?;
    println!("Bio numbers: {numbers:?}");

    let composition = render(&numbers, config)?;
    Ok(RunSummary {
        numbers,
        composition,
        output_path: config.output_path.clone(),
    })
}

/// Map `numbers` onto a composition and write it to the configured output path.
pub fn render(
    numbers: &[BioNumber],
    config: &CompositorConfig,
) -> Result<Composition, CompositorError> {
    println!("Creating MIDI file...");
    let path = &config.output_path;
    let writer = MidiWriter::new();
    let ticks_per_beat = writer.ticks_per_beat()?;
    let composition = CompositionMapper::new(&config.scale, config.chord_type, ticks_per_beat)
        .compose(numbers, config.tempo_bpm);
    tracing::debug!(
        events = composition.len(),
        chords = composition.events.iter().filter(|e| e.is_chord()).count(),
        ticks_per_beat,
        "composition built"
    );

    writer.write(&composition, path)?;
    println!("Done! File saved as: {}", path.display());
    Ok(composition)
}
