// Run configuration.
//
// Every tunable the pipeline reads lives in `CompositorConfig`: the service
// root URL, how many numbers to request, tempo, request timeout, output path,
// pitch table, and chord quality. Nothing is global; `pipeline::run` takes the
// config by reference.
//
// Values come from three layers, lowest precedence first: built-in defaults,
// an optional JSON file (`--config`), then individual command-line flags (see
// `cli.rs`). Every field is optional in the JSON file and falls back to its
// default. `validate()` runs before any network traffic.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bio_compositor_music::midi::bpm_to_tempo;
use bio_compositor_music::{ChordType, Scale};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://art.ycloud.eazify.net:8443/biorandom";
pub const DEFAULT_NOTE_COUNT: u32 = 32;
pub const DEFAULT_TEMPO_BPM: u32 = 200;
pub const DEFAULT_TIMEOUT_SECS: f64 = 10.0;
pub const DEFAULT_OUTPUT_PATH: &str = "bio_music.mid";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Service root. The request goes to `{base_url}/get/{note_count}`.
    pub base_url: String,
    /// How many bio numbers to request; one note event per number received.
    pub note_count: u32,
    pub tempo_bpm: u32,
    /// HTTP timeout for the whole request, in seconds.
    pub request_timeout_secs: f64,
    /// Written relative to the working directory unless absolute. Overwritten
    /// without confirmation.
    pub output_path: PathBuf,
    pub scale: Scale,
    pub chord_type: ChordType,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            note_count: DEFAULT_NOTE_COUNT,
            tempo_bpm: DEFAULT_TEMPO_BPM,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            scale: Scale::major(),
            chord_type: ChordType::Major,
        }
    }
}

impl CompositorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CompositorConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("base_url must not be empty".into()));
        }
        if self.note_count == 0 {
            return Err(ConfigError::Invalid("note_count must be at least 1".into()));
        }
        if bpm_to_tempo(self.tempo_bpm).is_err() {
            return Err(ConfigError::Invalid(format!(
                "tempo_bpm {} is outside the representable range (4..=60000000)",
                self.tempo_bpm
            )));
        }
        self.request_timeout()?;
        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("output_path must not be empty".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        if self.request_timeout_secs <= 0.0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Duration::try_from_secs_f64(self.request_timeout_secs).map_err(|e| {
            ConfigError::Invalid(format!(
                "request_timeout_secs {}: {e}",
                self.request_timeout_secs
            ))
        })
    }
}
