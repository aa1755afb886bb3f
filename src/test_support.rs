//! Helpers for unit tests that talk to a local mock server.

use std::net::TcpListener;

use wiremock::MockServer;

/// Env var that turns a missing localhost socket into a test failure.
const REQUIRE_SOCKETS_ENV: &str = "PROCEEDINGS_REQUIRE_SOCKET_TESTS";

/// Starts a mock server, or returns `None` when localhost sockets are unavailable.
///
/// # Panics
///
/// When sockets are unavailable and [`REQUIRE_SOCKETS_ENV`] is `1`, `true` or `yes`.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return Some(MockServer::start().await);
    }
    let required = std::env::var(REQUIRE_SOCKETS_ENV)
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
    assert!(
        !required,
        "[socket-bound-test] localhost unavailable and {REQUIRE_SOCKETS_ENV} forbids skipping"
    );
    eprintln!("[socket-bound-test] localhost unavailable; skipping wiremock test");
    None
}
