// Bio Compositor
//
// Fetches a sequence of "biorandom" integers from a remote HTTP service and
// renders them as a Standard MIDI File, using the deterministic mapping in
// `bio_compositor_music`.
//
// Module overview:
// - `client.rs`:   blocking HTTP GET and response validation
// - `config.rs`:   `CompositorConfig`, defaults, JSON loading, validation
// - `cli.rs`:      command-line flags layered over the config
// - `pipeline.rs`: `run()`, the fetch -> compose -> write sequence
// - `error.rs`:    error taxonomy, including which failures are swallowed
//
// Single-threaded and synchronous. The HTTP request, bounded by the configured
// timeout, is the only blocking call.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;

pub use client::BioNumberClient;
pub use config::CompositorConfig;
pub use error::{ClientError, CompositorError, ConfigError};
pub use pipeline::{RunSummary, run};
