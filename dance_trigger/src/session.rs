//! One dancer, one camera, one playback account.
//!
//! A [`Session`] owns the gesture tracker and the playback thread.  The
//! frame loop calls [`Session::process_frame`] once per pose, in arrival
//! order; everything else happens behind it.

use std::sync::Arc;

use tracing::{error, info, warn};

use dance_gesture::{Catalog, GestureName, GestureTracker, Transition};
use pose_stream::{PoseSnapshot, Thresholds};
use track_cue::{Authorizer, CueOutcome, CueReport, PlaybackService, PlaybackTrigger, Player, TrackMap, TriggerError};

use crate::config::ConfigError;

/// Running counters for one session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames:         u64,
    pub transitions:    u64,
    /// Cues handed to the player (transitions into a gesture).
    pub cues_submitted: u64,
    /// Cues replaced by a newer one before they were issued.
    pub cues_coalesced: u64,
    /// Cues not handed over because the playback thread had stopped.
    pub cues_dropped:   u64,
}

pub struct Session {
    catalog: Catalog,
    tracker: GestureTracker,
    player:  Player,
    stats:   SessionStats,
}

impl Session {
    /// Set up a session.
    ///
    /// Fails when some catalog gesture has no track.  Requests an
    /// authorization renewal right away if `auth` holds no valid token.
    pub fn new(
        catalog:        Catalog,
        tracks:         TrackMap,
        service:        Box<dyn PlaybackService>,
        auth:           Arc<dyn Authorizer>,
        confirm_frames: u32,
    ) -> Result<Self, ConfigError> {
        tracks.ensure_covers(catalog.names())?;

        if !auth.has_valid_token() {
            auth.request_renewal();
        }

        let player = Player::spawn(PlaybackTrigger::new(tracks, service, auth));
        Ok(Session {
            catalog,
            tracker: GestureTracker::with_confirmation(confirm_frames),
            player,
            stats: SessionStats::default(),
        })
    }

    /// Classify one frame and, on a transition into a gesture, queue its
    /// cue.  Returns the transition, if this frame caused one.
    pub fn process_frame(&mut self, pose: &PoseSnapshot, thresholds: Thresholds) -> Option<Transition> {
        self.stats.frames += 1;

        let seen = self.catalog.classify(pose, thresholds);
        let transition = self.tracker.observe(seen)?;
        self.stats.transitions += 1;

        info!(
            frame = self.stats.frames,
            from = transition.from.unwrap_or("none"),
            to = transition.to.unwrap_or("none"),
            "gesture transition"
        );

        if let Some(gesture) = transition.to {
            if !self.player.is_running() {
                error!(gesture, "playback thread has stopped; cue dropped");
                self.stats.cues_dropped += 1;
                return Some(transition);
            }
            self.stats.cues_submitted += 1;
            if self.player.submit(gesture).is_some() {
                self.stats.cues_coalesced += 1;
            }
        }
        Some(transition)
    }

    /// Last confirmed gesture.
    pub fn current(&self) -> Option<GestureName> {
        self.tracker.current()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Collect finished cue reports, logging the failures.
    pub fn drain_reports(&self) -> Vec<CueReport> {
        let reports = self.player.drain_reports();
        reports.iter().for_each(log_report);
        reports
    }

    /// End the session: let any in-flight cue settle, drop a waiting one,
    /// and hand back the remaining reports.
    pub fn finish(self) -> (SessionStats, Vec<CueReport>) {
        let reports = self.player.shutdown();
        reports.iter().for_each(log_report);
        (self.stats, reports)
    }
}

fn log_report(report: &CueReport) {
    match &report.result {
        Ok(CueOutcome::Played(_)) => {}
        Ok(CueOutcome::RenewalRequested) => {
            warn!(gesture = %report.gesture, "cue dropped pending re-authorization");
        }
        Err(e @ TriggerError::Unmapped(_)) => error!(error = %e, "configuration inconsistency"),
        Err(e @ TriggerError::Playback { .. }) => warn!(error = %e, "cue dropped"),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
