//! Loopback availability for tests that open local sockets.
//!
//! Some sandboxes forbid binding even on 127.0.0.1. Those tests are skipped
//! there, unless `DOWNLOADER_REQUIRE_SOCKET_TESTS` asks for a hard failure.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const REQUIRE_SOCKETS_ENV: &str = "DOWNLOADER_REQUIRE_SOCKET_TESTS";

fn sockets_required() -> bool {
    let Ok(value) = std::env::var(REQUIRE_SOCKETS_ENV) else {
        return false;
    };
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

/// Binds an ephemeral loopback listener, or returns `None` to skip the test.
///
/// # Panics
///
/// Panics instead of skipping when sockets are required.
#[track_caller]
pub fn loopback_listener_or_skip() -> Option<TcpListener> {
    match TcpListener::bind(("127.0.0.1", 0)) {
        Ok(listener) => Some(listener),
        Err(e) => {
            let caller = Location::caller();
            assert!(
                !sockets_required(),
                "{caller}: loopback bind failed ({e}) and {REQUIRE_SOCKETS_ENV} is set"
            );
            eprintln!("{caller}: loopback bind failed ({e}); skipping");
            None
        }
    }
}

/// Starts a wiremock server, or returns `None` when loopback is unavailable.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    loopback_listener_or_skip()?;
    Some(MockServer::start().await)
}
