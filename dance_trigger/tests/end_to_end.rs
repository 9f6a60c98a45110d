//! Whole-pipeline tests: poses in, playback requests out.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use dance_gesture::{Catalog, YMCA};
use dance_trigger::app::run_session;
use dance_trigger::config::AppConfig;
use dance_trigger::session::Session;
use dance_trigger::source::{spawn_frame_source, ReplaySource};
use pose_stream::{Part, PoseSnapshot, Thresholds};
use track_cue::testing::{Call, Failure, RecordingService};
use track_cue::{NoAuthorization, TokenStore};

const WAIT: Duration = Duration::from_secs(5);

/// Both arms up in a Y: wrists above elbows above shoulders, wrists either
/// side of a head centred at x = 300.
fn arms_up_pose() -> PoseSnapshot {
    PoseSnapshot::builder(0.9)
        .part(Part::Nose,          300.0, 100.0, 0.8)
        .part(Part::LeftEye,       290.0,  90.0, 0.8)
        .part(Part::RightEye,      310.0,  90.0, 0.8)
        .part(Part::LeftWrist,     200.0,  40.0, 0.7)
        .part(Part::LeftElbow,     230.0, 120.0, 0.7)
        .part(Part::LeftShoulder,  250.0, 200.0, 0.7)
        .part(Part::RightWrist,    400.0,  40.0, 0.7)
        .part(Part::RightElbow,    370.0, 120.0, 0.7)
        .part(Part::RightShoulder, 350.0, 200.0, 0.7)
        .build()
        .unwrap()
}

fn default_tracks() -> track_cue::TrackMap {
    AppConfig::default().track_map().unwrap()
}

#[test]
fn arms_up_cues_ymca_once() {
    let svc = RecordingService::new();
    let mut session = Session::new(
        Catalog::dance(), default_tracks(), Box::new(svc.clone()), Arc::new(NoAuthorization), 1,
    ).unwrap();
    let thresholds = Thresholds::new(0.1, 0.6).unwrap();

    let t = session.process_frame(&arms_up_pose(), thresholds).unwrap();
    assert_eq!(t.from, None);
    assert_eq!(t.to, Some(YMCA));
    assert!(session.process_frame(&arms_up_pose(), thresholds).is_none());

    assert!(svc.wait_for_calls(2, WAIT));
    let (stats, reports) = session.finish();
    assert_eq!(stats.cues_submitted, 1);
    assert!(reports.iter().all(|r| r.result.is_ok()));
    assert_eq!(svc.calls(), [
        Call::Play { track: "midi:song:1".into(), offset_ms: 45_000 },
        Call::Seek { offset_ms: 45_000 },
    ]);
}

#[test]
fn arm_parts_below_threshold_match_nothing() {
    let svc = RecordingService::new();
    let mut session = Session::new(
        Catalog::dance(), default_tracks(), Box::new(svc.clone()), Arc::new(NoAuthorization), 1,
    ).unwrap();
    let strict = Thresholds::new(0.1, 0.75).unwrap();
    assert!(session.process_frame(&arms_up_pose(), strict).is_none());
    session.finish();
    assert!(svc.calls().is_empty());
}

#[test]
fn expired_token_requests_one_renewal_and_moves_on() {
    let svc = RecordingService::new();
    svc.fail_next(Failure::AuthExpired);
    let auth = Arc::new(TokenStore::new(Some("stale".into())));
    let mut session = Session::new(
        Catalog::dance(), default_tracks(), Box::new(svc.clone()), auth.clone(), 1,
    ).unwrap();

    session.process_frame(&arms_up_pose(), Thresholds::default());
    assert!(svc.wait_for_calls(1, WAIT));
    let (_, reports) = session.finish();

    assert_eq!(auth.renewals(), 1);
    assert!(auth.token().is_none());
    assert_eq!(svc.calls().len(), 1);
    assert!(matches!(reports[..], [ref r] if matches!(r.result, Ok(track_cue::CueOutcome::RenewalRequested))));
}

#[test]
fn recorded_session_replays_every_move() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("recordings/demo.jsonl");
    let frames = spawn_frame_source(ReplaySource::open(&path, Duration::ZERO).unwrap());

    let svc = RecordingService::new();
    let mut session = Session::new(
        Catalog::dance(), default_tracks(), Box::new(svc.clone()), Arc::new(NoAuthorization), 1,
    ).unwrap();
    run_session(&mut session, frames, Thresholds::default());
    assert_eq!(session.current(), None);
    assert!(svc.wait_for_calls(1, WAIT));
    let (stats, _) = session.finish();

    // rest, YMCA, rest, Baby Shark, Disco, Thriller, rest
    assert_eq!(stats.frames, 29);
    assert_eq!(stats.transitions, 6);
    assert_eq!(stats.cues_submitted, 4);

    let mapped: Vec<String> = default_tracks().entries().map(|(_, cue)| cue.track.clone()).collect();
    for call in svc.calls() {
        if let Call::Play { track, .. } = call {
            assert!(mapped.contains(&track), "unexpected track {}", track);
        }
    }
}
