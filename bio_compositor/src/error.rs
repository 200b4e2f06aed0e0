// Error taxonomy for fetching and rendering.
//
// Two failure kinds can come out of the fetch, with different policies:
//
// - `ClientError::Network` (timeout, refused connection, non-2xx status,
//   truncated body) is swallowed by `BioNumberClient::fetch`: it is reported
//   on stdout and the fetch yields an empty sequence, so the run still writes
//   a file containing only the tempo event.
// - `ClientError::MalformedResponse` (body is not a JSON array of objects with
//   an unsigned integer `num`) propagates out of `fetch` and aborts the run
//   before any file is written.
//
// `BioNumberClient::fetch` is the only place the swallow rule is applied.

use bio_compositor_music::MusicError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Network(#[source] reqwest::Error),
    #[error("malformed response from bio number service: {reason}")]
    MalformedResponse { reason: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum CompositorError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Music(#[from] MusicError),
}
