//! Integration tests for descriptor output against fixture documents.
//!
//! Every invocation points `--config` at a missing file so the defaults apply
//! regardless of the machine's own config.

#![allow(deprecated)] // cargo_bin deprecation, replacement not yet stable

use assert_cmd::Command;
use predicates::prelude::*;

const NO_CONFIG: &str = "/nonexistent/tubeinfo/config.toml";

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn tubeinfo() -> Command {
    let mut cmd = Command::cargo_bin("tubeinfo").expect("binary 'tubeinfo' should be built");
    cmd.args(["--config", NO_CONFIG]);
    cmd
}

fn inspect_json(name: &str, extra: &[&str]) -> serde_json::Value {
    let output = tubeinfo()
        .args(["inspect", &fixture(name), "--format", "json"])
        .args(extra)
        .output()
        .expect("command runs");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("valid JSON summary")
}

// ─── inspect ─────────────────────────────────────────────────────────────────

#[test]
fn inspect_text_summary() {
    tubeinfo()
        .args(["inspect", &fixture("player_response.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fixture Video"))
        .stdout(predicate::str::contains("by Fixture Channel"))
        .stdout(predicate::str::contains("Playable"))
        .stdout(predicate::str::contains("Adaptive:   4"))
        .stdout(predicate::str::contains("Volume: 0.940"));
}

#[test]
fn inspect_json_summary() {
    let summary = inspect_json("player_response.json", &[]);

    assert_eq!(summary["video_id"], "abc");
    assert_eq!(summary["is_valid"], true);
    assert_eq!(summary["adaptive_formats"], 4);
    assert_eq!(summary["regular_formats"], 1);
    assert_eq!(summary["captions"], 4);
    assert_eq!(summary["event_id"], "EVT");
    assert_eq!(summary["is_hfr"], false);
    assert_eq!(summary["has_extended_hls_formats"], true);
    assert_eq!(summary["extended_hls_formats_broken"], false);
}

#[test]
fn offline_stream_is_valid_without_tracking() {
    let summary = inspect_json("offline_live.json", &[]);

    assert_eq!(summary["playability"], "Offline");
    assert_eq!(summary["is_valid"], true);
    assert_eq!(summary["is_live"], true);
    assert_eq!(
        summary["playability_message"],
        "This live event will begin in a few moments. • Waiting for the stream"
    );
    assert_eq!(summary["adaptive_formats"], 0);
}

#[test]
fn inspect_merges_live_timing() {
    let timing = fixture("live_timing.json");
    let summary = inspect_json("offline_live.json", &["--timing", &timing]);

    assert_eq!(summary["timing"]["start_segment_num"], 4321);
    assert_eq!(summary["timing"]["segment_duration_us"], 2_000_000);
    assert_eq!(summary["is_stream_seekable"], true);
}

#[test]
fn missing_file_reports_path() {
    tubeinfo()
        .args(["inspect", "/nonexistent/response.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read /nonexistent/response.json"));
}

#[test]
fn non_json_document_fails() {
    tubeinfo()
        .args(["inspect", &fixture("live_timing.json")])
        .assert()
        .success();

    tubeinfo()
        .args(["inspect", &format!("{}/Cargo.toml", env!("CARGO_MANIFEST_DIR"))])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a player response"));
}

// ─── formats / captions / urls ───────────────────────────────────────────────

#[test]
fn formats_lists_classified_rows() {
    tubeinfo()
        .args(["formats", &fixture("player_response.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("video/webm"))
        .stdout(predicate::str::contains("audio/mp4"))
        .stdout(predicate::str::contains("1920x1080"))
        .stdout(predicate::str::contains("(5 formats)"));
}

#[test]
fn formats_filter_by_kind() {
    tubeinfo()
        .args(["formats", &fixture("player_response.json"), "--kind", "regular"])
        .assert()
        .success()
        .stdout(predicate::str::contains("640x360"))
        .stdout(predicate::str::contains("(1 formats)"));
}

#[test]
fn captions_include_translations() {
    tubeinfo()
        .args(["captions", &fixture("player_response.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("French"))
        .stdout(predicate::str::contains("tlang=ja"))
        .stdout(predicate::str::contains("(4 caption tracks)"));
}

#[test]
fn urls_lists_progressive_urls() {
    tubeinfo()
        .args(["urls", &fixture("player_response.json")])
        .assert()
        .success()
        .stdout("https://rr1.example.com/videoplayback?itag=18&mime=video%2Fmp4\n");
}
