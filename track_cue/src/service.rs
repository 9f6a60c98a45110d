//! The external player seen from the trigger.

use tracing::info;

/// Failure reported by a playback backend.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    /// The service rejected the bearer token (HTTP 401 or equivalent).
    #[error("playback authorization expired")]
    AuthExpired,

    #[error("playback service answered {code}: {body}")]
    Status { code: u16, body: String },

    #[error("playback request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("MIDI output error: {0}")]
    Midi(String),

    #[error("track reference `{0}` is not usable by this backend")]
    InvalidTrack(String),
}

impl PlaybackError {
    /// Status code equivalent, where one exists.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PlaybackError::AuthExpired         => Some(401),
            PlaybackError::Status { code, .. } => Some(*code),
            _                                  => None,
        }
    }

    pub fn is_auth_expired(&self) -> bool {
        matches!(self, PlaybackError::AuthExpired)
    }
}

/// Anything that can start a track and seek within it.
///
/// Both calls target the output device the backend currently has
/// selected.  Calls may block; the [`crate::Player`] serializes them.
pub trait PlaybackService: Send {
    /// Start `track`, asking for `offset_ms` as the start position.
    fn play(&mut self, track: &str, offset_ms: u64) -> Result<(), PlaybackError>;

    /// Move the playing track to `offset_ms`.
    fn seek(&mut self, offset_ms: u64) -> Result<(), PlaybackError>;

    /// Short label for logs.
    fn name(&self) -> &'static str;
}

impl<S: PlaybackService + ?Sized> PlaybackService for Box<S> {
    fn play(&mut self, track: &str, offset_ms: u64) -> Result<(), PlaybackError> {
        (**self).play(track, offset_ms)
    }
    fn seek(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
        (**self).seek(offset_ms)
    }
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ── log-only backend (used when no player is configured) ─────────────────

/// Backend that only logs what it would have done.
#[derive(Debug, Default)]
pub struct LogService {
    requests: usize,
}

impl LogService {
    pub fn new() -> Self { Self::default() }

    /// Requests seen so far.
    pub fn requests(&self) -> usize { self.requests }
}

impl PlaybackService for LogService {
    fn play(&mut self, track: &str, offset_ms: u64) -> Result<(), PlaybackError> {
        self.requests += 1;
        info!(track, offset_ms, "play (log output)");
        Ok(())
    }

    fn seek(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
        self.requests += 1;
        info!(offset_ms, "seek (log output)");
        Ok(())
    }

    fn name(&self) -> &'static str { "log" }
}
