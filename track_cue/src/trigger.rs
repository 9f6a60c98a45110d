//! Resolve a gesture into a cue and issue it.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::auth::Authorizer;
use crate::mapping::{TrackCue, TrackMap};
use crate::service::{PlaybackError, PlaybackService};

/// What happened to a cue that reached the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CueOutcome {
    /// `play` (and `seek`, if the offset is non-zero) succeeded.
    Played(TrackCue),
    /// The service reported an expired authorization; one renewal was
    /// requested and the cue was dropped.
    RenewalRequested,
}

#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    /// The gesture has no track mapping.  The service was not called.
    #[error("gesture `{0}` has no track mapping; refusing to cue playback")]
    Unmapped(String),

    /// The service failed for a reason other than authorization.  The cue
    /// was dropped.
    #[error("playback for `{gesture}` dropped: {source}")]
    Playback {
        gesture: String,
        #[source]
        source:  PlaybackError,
    },
}

/// Issues play/seek requests for confirmed gestures.
///
/// Never retries: every failure drops the cue.
pub struct PlaybackTrigger {
    tracks:  TrackMap,
    service: Box<dyn PlaybackService>,
    auth:    Arc<dyn Authorizer>,
}

impl PlaybackTrigger {
    pub fn new(tracks: TrackMap, service: Box<dyn PlaybackService>, auth: Arc<dyn Authorizer>) -> Self {
        PlaybackTrigger { tracks, service, auth }
    }

    pub fn tracks(&self) -> &TrackMap { &self.tracks }

    /// Cue the track mapped to `gesture`.
    pub fn fire(&mut self, gesture: &str) -> Result<CueOutcome, TriggerError> {
        let Some(cue) = self.tracks.cue_for(gesture).cloned() else {
            error!(gesture, "no track mapping for classified gesture");
            return Err(TriggerError::Unmapped(gesture.to_string()));
        };

        match self.issue(&cue) {
            Ok(()) => {
                info!(gesture, track = %cue.track, offset_ms = cue.offset_ms,
                      backend = self.service.name(), "cued track");
                Ok(CueOutcome::Played(cue))
            }
            Err(PlaybackError::AuthExpired) => {
                warn!(gesture, "playback authorization expired; requesting renewal");
                self.auth.request_renewal();
                Ok(CueOutcome::RenewalRequested)
            }
            Err(source) => {
                warn!(gesture, error = %source, "playback request failed; cue dropped");
                Err(TriggerError::Playback { gesture: gesture.to_string(), source })
            }
        }
    }

    fn issue(&mut self, cue: &TrackCue) -> Result<(), PlaybackError> {
        self.service.play(&cue.track, cue.offset_ms)?;
        if cue.needs_seek() {
            self.service.seek(cue.offset_ms)?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenStore;
    use crate::mapping::TrackEntry;
    use crate::testing::{Call, Failure, RecordingService};

    fn tracks() -> TrackMap {
        TrackMap::from_entries([
            TrackEntry { gesture: "YMCA".into(),  track: "t:ymca".into(),  offset_ms: 45_000 },
            TrackEntry { gesture: "Shark".into(), track: "t:shark".into(), offset_ms: 0 },
        ]).unwrap()
    }

    fn trigger(service: &RecordingService, auth: &Arc<TokenStore>) -> PlaybackTrigger {
        PlaybackTrigger::new(tracks(), Box::new(service.clone()), auth.clone())
    }

    #[test]
    fn play_then_seek_for_offset() {
        let svc  = RecordingService::new();
        let auth = Arc::new(TokenStore::new(Some("tok".into())));
        let out  = trigger(&svc, &auth).fire("YMCA").unwrap();
        assert_eq!(out, CueOutcome::Played(TrackCue::new("t:ymca", 45_000)));
        assert_eq!(svc.calls(), [
            Call::Play { track: "t:ymca".into(), offset_ms: 45_000 },
            Call::Seek { offset_ms: 45_000 },
        ]);
    }

    #[test]
    fn zero_offset_skips_seek() {
        let svc  = RecordingService::new();
        let auth = Arc::new(TokenStore::new(Some("tok".into())));
        trigger(&svc, &auth).fire("Shark").unwrap();
        assert_eq!(svc.calls(), [Call::Play { track: "t:shark".into(), offset_ms: 0 }]);
    }

    #[test]
    fn unmapped_gesture_never_reaches_service() {
        let svc  = RecordingService::new();
        let auth = Arc::new(TokenStore::new(Some("tok".into())));
        let err  = trigger(&svc, &auth).fire("Macarena").unwrap_err();
        assert!(matches!(err, TriggerError::Unmapped(ref g) if g == "Macarena"));
        assert!(svc.calls().is_empty());
    }

    #[test]
    fn auth_expiry_renews_once_without_retry() {
        let svc  = RecordingService::new();
        svc.fail_next(Failure::AuthExpired);
        let auth = Arc::new(TokenStore::new(Some("tok".into())));
        let out  = trigger(&svc, &auth).fire("YMCA").unwrap();
        assert_eq!(out, CueOutcome::RenewalRequested);
        assert_eq!(auth.renewals(), 1);
        // the failed play is the only call: no seek, no retry
        assert_eq!(svc.calls(), [Call::Play { track: "t:ymca".into(), offset_ms: 45_000 }]);
    }

    #[test]
    fn auth_expiry_during_seek_also_renews() {
        let svc  = RecordingService::new();
        svc.fail_after(1, Failure::AuthExpired);
        let auth = Arc::new(TokenStore::new(Some("tok".into())));
        assert_eq!(trigger(&svc, &auth).fire("YMCA").unwrap(), CueOutcome::RenewalRequested);
        assert_eq!(auth.renewals(), 1);
        assert_eq!(svc.calls().len(), 2);
    }

    #[test]
    fn other_failures_are_dropped_not_renewed() {
        let svc  = RecordingService::new();
        svc.fail_next(Failure::Status(503));
        let auth = Arc::new(TokenStore::new(Some("tok".into())));
        let mut tr = trigger(&svc, &auth);
        let err = tr.fire("YMCA").unwrap_err();
        assert!(matches!(err, TriggerError::Playback { source: PlaybackError::Status { code: 503, .. }, .. }));
        assert_eq!(auth.renewals(), 0);
        assert_eq!(svc.calls().len(), 1);

        // the next cue goes through normally
        assert!(tr.fire("Shark").is_ok());
    }
}
