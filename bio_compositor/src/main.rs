// Bio Compositor CLI entry point.
//
// Fetches bio numbers, maps them onto notes and chords, and writes a MIDI
// file. With no arguments it requests 32 numbers from the default service and
// writes `bio_music.mid` at 200 BPM in the working directory.
//
// Usage:
//   cargo run -p bio_compositor -- [--count N] [--tempo BPM] [--output PATH]
//     [--base-url URL] [--timeout SECS] [--chord major|minor] [--config PATH]
//
// Progress and errors are printed to stdout. Set RUST_LOG (e.g. `debug`) for
// diagnostic tracing output. Exit status is 1 on a malformed service response,
// an invalid configuration, or a failed file write.

use bio_compositor::cli::{CliCommand, parse_args, usage};
use bio_compositor::{CompositorConfig, run};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stdout)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let overrides = match parse_args(&args) {
        Ok(CliCommand::Run(overrides)) => overrides,
        Ok(CliCommand::Help) => {
            println!("{}", usage());
            return;
        }
        Err(message) => {
            println!("{message}");
            println!();
            println!("{}", usage());
            std::process::exit(1);
        }
    };

    let base = match &overrides.config_path {
        Some(path) => match CompositorConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                println!("Error: {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => CompositorConfig::default(),
    };
    let config = overrides.apply(base);
    tracing::debug!(?config, "resolved configuration");

    match run(&config) {
        Ok(summary) => {
            tracing::info!(
                numbers = summary.numbers.len(),
                notes = summary.composition.len(),
                path = %summary.output_path.display(),
                "run complete"
            );
        }
        Err(e) => {
            println!("Error: {e}");
            std::process::exit(1);
        }
    }
}
