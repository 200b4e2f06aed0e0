// HTTP client for the bio number service.
//
// One blocking GET to `{base_url}/get/{n}` with a whole-request timeout and no
// authentication. The body must be a JSON array of objects; only each
// object's `num` field is read, and any other fields are ignored:
//
//   [{"num": 3, ...}, {"num": 4, ...}, ...]
//
// Network-level failures degrade to an empty sequence; malformed bodies are
// errors. See `error.rs` for the two policies.

use std::time::Duration;

use bio_compositor_music::BioNumber;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ClientError;

/// One element of the response array.
#[derive(Debug, Deserialize)]
struct BioNumberRecord {
    num: BioNumber,
}

pub struct BioNumberClient {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl BioNumberClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint for a request of `n` numbers.
    pub fn url_for(&self, n: u32) -> String {
        format!("{}/get/{}", self.base_url, n)
    }

    /// Fetch `n` bio numbers in the order the service returns them.
    ///
    /// A network failure is printed and yields `Ok(vec![])`. A body of the
    /// wrong shape yields `ClientError::MalformedResponse`.
    pub fn fetch(&self, n: u32) -> Result<Vec<BioNumber>, ClientError> {
        println!("Requesting {n} bio numbers...");
        match self.request(n) {
            Ok(body) => parse_bio_numbers(&body),
            Err(ClientError::Network(e)) => {
                println!("Request failed: {e}");
                tracing::warn!(error = %e, "bio number request failed; continuing with no numbers");
                Ok(Vec::new())
            }
            Err(other) => Err(other),
        }
    }

    fn request(&self, n: u32) -> Result<Vec<u8>, ClientError> {
        let url = self.url_for(n);
        tracing::debug!(%url, "requesting bio numbers");
        let response = self
            .http
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(ClientError::Network)?;
        let status = response.status();
        let body = response.bytes().map_err(ClientError::Network)?;
        tracing::debug!(%status, bytes = body.len(), "received response");
        Ok(body.to_vec())
    }
}

/// Extract the `num` fields from a response body.
pub fn parse_bio_numbers(body: &[u8]) -> Result<Vec<BioNumber>, ClientError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| malformed(format!("body is not valid JSON: {e}")))?;
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(malformed(format!(
                "expected a JSON array, got {}",
                json_kind(&other)
            )));
        }
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<BioNumberRecord>(item)
                .map(|record| record.num)
                .map_err(|e| malformed(format!("element {i}: {e}")))
        })
        .collect()
}

fn malformed(reason: String) -> ClientError {
    ClientError::MalformedResponse { reason }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
