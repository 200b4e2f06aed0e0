// End-to-end tests against a mock bio number service.
//
// Each test starts a throwaway `tiny_http` server on a random localhost port
// and points the client (or the whole pipeline) at it. The server answers a
// single request with a canned status and body, or holds the request open to
// force a client timeout. Output MIDI files go to a per-test `tempfile`
// directory and are parsed back with `midly`.

use std::net::TcpListener;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bio_compositor::{BioNumberClient, ClientError, CompositorConfig, CompositorError, run};
use bio_compositor_music::mapping::{duration_ticks, is_chord};
use midly::{MetaMessage, MidiMessage, Smf, TrackEventKind};
use tempfile::tempdir;
use tiny_http::{Header, Response, Server};

/// How the mock answers its one request.
enum Reply {
    Json { status: u16, body: &'static str },
    /// Accept the request and never answer it.
    Hang,
}

/// Start a mock server that handles one request. Returns the base URL and a
/// handle yielding the request path the server saw.
fn mock_service(reply: Reply) -> (String, JoinHandle<String>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        let path = request.url().to_string();
        match reply {
            Reply::Json { status, body } => {
                let header =
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(header);
                request.respond(response).unwrap();
            }
            Reply::Hang => {
                thread::sleep(Duration::from_secs(2));
                drop(request);
            }
        }
        path
    });
    (format!("http://{addr}/biorandom"), handle)
}

fn test_config(base_url: String, note_count: u32, output_path: PathBuf) -> CompositorConfig {
    CompositorConfig {
        base_url,
        note_count,
        request_timeout_secs: 0.5,
        output_path,
        ..Default::default()
    }
}

fn count_note_ons(smf: &Smf) -> usize {
    smf.tracks[0]
        .iter()
        .filter(|e| {
            matches!(
                e.kind,
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { .. },
                    ..
                }
            )
        })
        .count()
}

#[test]
fn fetch_returns_numbers_in_order() {
    let (base_url, server) = mock_service(Reply::Json {
        status: 200,
        body: r#"[{"num":3},{"num":4},{"num":5}]"#,
    });
    let client = BioNumberClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let numbers = client.fetch(3).unwrap();
    assert_eq!(numbers, vec![3, 4, 5]);
    assert_eq!(server.join().unwrap(), "/biorandom/get/3");

    // Index 0: next value 4 is even -> chord. Duration lookup wraps to
    // index 2 (value 5), not divisible by 3 -> half a beat.
    assert!(is_chord(&numbers, 0));
    assert_eq!(duration_ticks(&numbers, 0, 480), 240);
}

#[test]
fn non_success_status_yields_empty_sequence() {
    let (base_url, server) = mock_service(Reply::Json {
        status: 503,
        body: r#"[{"num":1}]"#,
    });
    let client = BioNumberClient::new(&base_url, Duration::from_secs(5)).unwrap();
    assert!(client.fetch(1).unwrap().is_empty());
    server.join().unwrap();
}

#[test]
fn refused_connection_yields_empty_sequence() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = BioNumberClient::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    assert!(client.fetch(4).unwrap().is_empty());
}

#[test]
fn missing_num_field_is_malformed() {
    let (base_url, server) = mock_service(Reply::Json {
        status: 200,
        body: r#"[{"num":1},{"value":2}]"#,
    });
    let client = BioNumberClient::new(&base_url, Duration::from_secs(5)).unwrap();
    assert!(matches!(
        client.fetch(2),
        Err(ClientError::MalformedResponse { .. })
    ));
    server.join().unwrap();
}

#[test]
fn full_pipeline_writes_expected_midi() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("bio_music.mid");
    let (base_url, server) = mock_service(Reply::Json {
        status: 200,
        body: r#"[{"num":3},{"num":4},{"num":5}]"#,
    });

    let summary = run(&test_config(base_url, 3, output.clone())).unwrap();
    server.join().unwrap();
    assert_eq!(summary.numbers, vec![3, 4, 5]);
    assert_eq!(summary.composition.len(), 3);
    assert_eq!(summary.output_path, output);

    let bytes = std::fs::read(&output).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    assert_eq!(smf.tracks.len(), 1);
    let track = &smf.tracks[0];

    assert_eq!(track[0].delta.as_int(), 0);
    assert!(matches!(
        track[0].kind,
        TrackEventKind::Meta(MetaMessage::Tempo(t)) if t.as_int() == 300_000
    ));

    // Index 0 is an F major triad (3 -> 65), released after half a beat.
    for (event, pitch) in track[1..4].iter().zip([65u8, 69, 72]) {
        assert_eq!(event.delta.as_int(), 0);
        assert!(matches!(
            event.kind,
            TrackEventKind::Midi { message: MidiMessage::NoteOn { key, vel }, .. }
                if key.as_int() == pitch && vel.as_int() == 59
        ));
    }
    assert_eq!(track[4].delta.as_int(), 240);
    assert!(matches!(
        track[4].kind,
        TrackEventKind::Midi { message: MidiMessage::NoteOff { key, vel }, .. }
            if key.as_int() == 65 && vel.as_int() == 64
    ));

    // Indexes 1 and 2 are single notes.
    assert_eq!(count_note_ons(&smf), 5);
    assert!(matches!(
        track.last().unwrap().kind,
        TrackEventKind::Meta(MetaMessage::EndOfTrack)
    ));
}

#[test]
fn identical_responses_give_identical_files() {
    let dir = tempdir().unwrap();
    let mut outputs = Vec::new();
    for name in ["a.mid", "b.mid"] {
        let (base_url, server) = mock_service(Reply::Json {
            status: 200,
            body: r#"[{"num":0},{"num":1},{"num":2}]"#,
        });
        let output = dir.path().join(name);
        run(&test_config(base_url, 3, output.clone())).unwrap();
        server.join().unwrap();
        outputs.push(std::fs::read(&output).unwrap());
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn malformed_body_aborts_without_writing() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("bio_music.mid");
    let (base_url, server) = mock_service(Reply::Json {
        status: 200,
        body: "{}",
    });

    let result = run(&test_config(base_url, 3, output.clone()));
    server.join().unwrap();
    assert!(matches!(
        result,
        Err(CompositorError::Client(ClientError::MalformedResponse { .. }))
    ));
    assert!(!output.exists());
}

#[test]
fn timeout_writes_tempo_only_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("bio_music.mid");
    let (base_url, _server) = mock_service(Reply::Hang);

    let summary = run(&test_config(base_url, 32, output.clone())).unwrap();
    assert!(summary.numbers.is_empty());
    assert!(summary.composition.is_empty());

    let bytes = std::fs::read(&output).unwrap();
    let smf = Smf::parse(&bytes).unwrap();
    let track = &smf.tracks[0];
    assert_eq!(track.len(), 2);
    assert!(matches!(track[0].kind, TrackEventKind::Meta(MetaMessage::Tempo(_))));
    assert!(matches!(track[1].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack)));
    assert_eq!(count_note_ons(&smf), 0);
}

#[test]
fn unwritable_output_path_is_an_error() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("missing").join("bio_music.mid");
    let (base_url, server) = mock_service(Reply::Json {
        status: 200,
        body: r#"[{"num":7}]"#,
    });

    let result = run(&test_config(base_url, 1, output));
    server.join().unwrap();
    assert!(matches!(result, Err(CompositorError::Music(_))));
}
