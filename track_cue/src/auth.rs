//! Authorization collaborator.
//!
//! The core never performs the authorization flow itself.  It only holds
//! the current bearer token and raises a renewal request when the player
//! rejects it (or when no token exists at start-up).

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::RwLock;

use tracing::warn;

/// Scopes the playback backend needs.
pub const PLAYBACK_SCOPES: &[&str] = &["user-modify-playback-state", "user-read-playback-state"];

const AUTHORIZE_ENDPOINT: &str = "https://accounts.spotify.com/authorize";

/// External authorization flow.
pub trait Authorizer: Send + Sync {
    fn has_valid_token(&self) -> bool;

    /// Ask the user/agent to authorize again.  Must not block.
    fn request_renewal(&self);
}

/// Implicit-grant authorize URL for `client_id`.
pub fn authorize_url(client_id: &str, redirect_uri: &str, scopes: &[&str]) -> String {
    format!(
        "{}?client_id={}&response_type=token&redirect_uri={}&scope={}",
        AUTHORIZE_ENDPOINT,
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(&scopes.join(" ")),
    )
}

/// For backends that need no authorization (log output, local MIDI).
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAuthorization;

impl Authorizer for NoAuthorization {
    fn has_valid_token(&self) -> bool { true }

    fn request_renewal(&self) {
        warn!("renewal requested from a backend without authorization; ignoring");
    }
}

// ════════════════════════════════════════════════════════════════════════════
// TokenStore
// ════════════════════════════════════════════════════════════════════════════

/// In-memory bearer token plus renewal bookkeeping.
///
/// Renewal drops the stored token, so later requests fail fast as
/// "expired" until a fresh token is installed with [`TokenStore::set_token`].
#[derive(Debug, Default)]
pub struct TokenStore {
    token:         RwLock<Option<String>>,
    renewals:      AtomicU32,
    authorize_url: Option<String>,
}

impl TokenStore {
    pub fn new(token: Option<String>) -> Self {
        TokenStore {
            token: RwLock::new(token.filter(|t| !t.trim().is_empty())),
            ..Default::default()
        }
    }

    /// Read the token from environment variable `var`; unset or blank
    /// means "no token".
    pub fn from_env(var: &str) -> Self {
        Self::new(std::env::var(var).ok())
    }

    /// URL shown to the user whenever a renewal is requested.
    pub fn with_authorize_url(mut self, url: String) -> Self {
        self.authorize_url = Some(url);
        self
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_token(&self, token: String) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token);
    }

    /// Number of renewal requests raised so far.
    pub fn renewals(&self) -> u32 {
        self.renewals.load(Ordering::SeqCst)
    }
}

impl Authorizer for TokenStore {
    fn has_valid_token(&self) -> bool {
        self.token().is_some()
    }

    fn request_renewal(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
        let n = self.renewals.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.authorize_url {
            Some(url) => warn!(renewals = n, %url, "playback authorization required; open the URL to re-authorize"),
            None      => warn!(renewals = n, "playback authorization required"),
        }
    }
}
