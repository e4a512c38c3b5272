//! Session middleware configuration.
//!
//! Sessions live in a bounded in-memory `moka` store and expire after a
//! period of inactivity. A session record only holds the visitor id; the
//! cart itself is in [`crate::visitors`], bounded the same way.

use std::time::Duration;

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "sapling_session";

/// Session inactivity timeout in seconds (2 hours).
pub const SESSION_IDLE_SECONDS: i64 = 2 * 60 * 60;

/// Most sessions (and visitors) held in memory at once.
pub const MAX_SESSIONS: u64 = 10_000;

/// Session inactivity timeout as a std duration.
#[must_use]
pub const fn session_idle() -> Duration {
    Duration::from_secs(SESSION_IDLE_SECONDS.unsigned_abs())
}

/// Create the session layer with a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    let store = MokaStore::new(Some(MAX_SESSIONS));

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_IDLE_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
