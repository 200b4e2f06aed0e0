// Command-line parsing.
//
// Plain `std::env::args()` matching, no argument-parsing crate. Flags override
// values from an optional `--config` JSON file, which in turn overrides the
// built-in defaults. With no arguments the defaults are used unchanged.

use std::path::PathBuf;

use bio_compositor_music::ChordType;

use crate::config::CompositorConfig;

/// Flags given on the command line. `None` leaves the config value alone.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub note_count: Option<u32>,
    pub tempo_bpm: Option<u32>,
    pub output_path: Option<PathBuf>,
    pub base_url: Option<String>,
    pub request_timeout_secs: Option<f64>,
    pub chord_type: Option<ChordType>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    Run(CliOverrides),
    Help,
}

/// Parse arguments (excluding the program name).
pub fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    let mut overrides = CliOverrides::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{name} requires a value"))
        };
        match arg.as_str() {
            "--config" => overrides.config_path = Some(value("--config")?.into()),
            "--count" => overrides.note_count = Some(parse_number(&value("--count")?, "--count")?),
            "--tempo" => overrides.tempo_bpm = Some(parse_number(&value("--tempo")?, "--tempo")?),
            "--output" => overrides.output_path = Some(value("--output")?.into()),
            "--base-url" => overrides.base_url = Some(value("--base-url")?),
            "--timeout" => {
                overrides.request_timeout_secs =
                    Some(parse_number(&value("--timeout")?, "--timeout")?)
            }
            "--chord" => {
                let name = value("--chord")?;
                overrides.chord_type = Some(name.parse().map_err(|e| format!("--chord: {e}"))?);
            }
            "--help" | "-h" => return Ok(CliCommand::Help),
            other => return Err(format!("Unknown argument: {other}")),
        }
    }

    Ok(CliCommand::Run(overrides))
}

fn parse_number<T: std::str::FromStr>(raw: &str, flag: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("{flag} requires a valid number, got '{raw}'"))
}

impl CliOverrides {
    /// Apply the flags on top of `config`.
    pub fn apply(&self, mut config: CompositorConfig) -> CompositorConfig {
        if let Some(n) = self.note_count {
            config.note_count = n;
        }
        if let Some(bpm) = self.tempo_bpm {
            config.tempo_bpm = bpm;
        }
        if let Some(path) = &self.output_path {
            config.output_path = path.clone();
        }
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = self.request_timeout_secs {
            config.request_timeout_secs = secs;
        }
        if let Some(chord_type) = self.chord_type {
            config.chord_type = chord_type;
        }
        config
    }
}

pub fn usage() -> &'static str {
    "\
Usage: bio_compositor [OPTIONS]

Options:
  --count <N>          Number of bio numbers / notes (default: 32)
  --tempo <BPM>        Tempo in beats per minute (default: 200)
  --output <PATH>      Output MIDI file (default: bio_music.mid)
  --base-url <URL>     Bio number service root URL
  --timeout <SECS>     Request timeout in seconds (default: 10)
  --chord <TYPE>       Chord quality: major or minor (default: major)
  --config <PATH>      JSON configuration file
  --help, -h           Show this help"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_arguments_means_defaults() {
        let cmd = parse_args(&[]).unwrap();
        assert_eq!(cmd, CliCommand::Run(CliOverrides::default()));
        let CliCommand::Run(overrides) = cmd else { unreachable!() };
        assert_eq!(overrides.apply(CompositorConfig::default()), CompositorConfig::default());
    }

    #[test]
    fn flags_override_config() {
        let cmd = parse_args(&args(&[
            "--count", "8", "--tempo", "90", "--output", "x.mid", "--base-url",
            "http://localhost:1/bio", "--timeout", "2.5", "--chord", "minor",
        ]))
        .unwrap();
        let CliCommand::Run(overrides) = cmd else {
            panic!("expected Run");
        };
        let config = overrides.apply(CompositorConfig::default());
        assert_eq!(config.note_count, 8);
        assert_eq!(config.tempo_bpm, 90);
        assert_eq!(config.output_path, PathBuf::from("x.mid"));
        assert_eq!(config.base_url, "http://localhost:1/bio");
        assert_eq!(config.request_timeout_secs, 2.5);
        assert_eq!(config.chord_type, ChordType::Minor);
    }

    #[test]
    fn config_path_is_captured() {
        let cmd = parse_args(&args(&["--config", "bio.json"])).unwrap();
        let CliCommand::Run(overrides) = cmd else {
            panic!("expected Run");
        };
        assert_eq!(overrides.config_path, Some(PathBuf::from("bio.json")));
    }

    #[test]
    fn help_wins() {
        assert_eq!(parse_args(&args(&["--count", "3", "-h"])).unwrap(), CliCommand::Help);
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(parse_args(&args(&["--count"])).unwrap_err().contains("requires a value"));
        assert!(parse_args(&args(&["--count", "many"])).unwrap_err().contains("valid number"));
        assert!(parse_args(&args(&["--chord", "sus4"])).unwrap_err().contains("sus4"));
        assert!(parse_args(&args(&["--verbose"])).unwrap_err().contains("Unknown argument"));
    }
}
