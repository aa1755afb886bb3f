//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::net::TcpListener;

use proceedings_core::{PaperRecord, ProceedingsStore};
use tempfile::TempDir;
use wiremock::MockServer;

/// Starts a mock server, or returns `None` when localhost sockets are unavailable.
///
/// Panics instead of skipping when `PROCEEDINGS_REQUIRE_SOCKET_TESTS` is set
/// to `1`, `true` or `yes`.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return Some(MockServer::start().await);
    }
    let required = std::env::var("PROCEEDINGS_REQUIRE_SOCKET_TESTS")
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
    assert!(
        !required,
        "[socket-bound-test] cannot bind localhost socket; PROCEEDINGS_REQUIRE_SOCKET_TESTS forbids skipping"
    );
    eprintln!("[socket-bound-test] cannot bind localhost socket; skipping wiremock test");
    None
}

/// A record with only a title and an optional abstract.
pub fn record(title: &str, abstract_text: Option<&str>) -> PaperRecord {
    PaperRecord {
        title: title.to_string(),
        r#abstract: abstract_text.map(str::to_string),
        ..PaperRecord::default()
    }
}

/// Creates a proceedings folder in a fresh temp dir holding `files`.
pub fn store_with(files: &[(i32, Vec<PaperRecord>)]) -> (TempDir, ProceedingsStore) {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let store = ProceedingsStore::new(temp.path().join("proceedings"));
    for (year, records) in files {
        store.save(*year, records).expect("Failed to write year file");
    }
    (temp, store)
}
