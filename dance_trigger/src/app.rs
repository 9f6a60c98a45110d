//! Application wiring: pick a backend, start a session, run the frame loop.

use std::io;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use tracing::info;

use dance_gesture::Catalog;
use pose_stream::PoseSnapshot;
use track_cue::{
    authorize_url, Authorizer, LogService, MidiCueService, NoAuthorization, PlaybackError,
    PlaybackService, TokenStore, WebPlaybackService, PLAYBACK_SCOPES,
};

use crate::config::{AppConfig, BackendKind, ConfigError, PlaybackConfig};
use crate::session::{Session, SessionStats};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot start playback backend: {0}")]
    Playback(#[from] PlaybackError),

    #[error("cannot open pose source: {0}")]
    Io(#[from] io::Error),
}

/// Playback service and its authorization collaborator for `cfg.backend`.
pub fn build_backend(cfg: &PlaybackConfig) -> Result<(Box<dyn PlaybackService>, Arc<dyn Authorizer>), AppError> {
    match cfg.backend {
        BackendKind::Log => Ok((Box::new(LogService::new()), Arc::new(NoAuthorization))),
        BackendKind::Web => {
            let mut store = TokenStore::from_env(&cfg.token_env);
            if let Some(client_id) = &cfg.client_id {
                store = store.with_authorize_url(authorize_url(client_id, &cfg.redirect_uri, PLAYBACK_SCOPES));
            }
            let store = Arc::new(store);
            let service = WebPlaybackService::new(&cfg.api_base_url, Arc::clone(&store))?
                .with_device(cfg.device_id.clone());
            Ok((Box::new(service), store))
        }
        BackendKind::Midi => {
            let service = MidiCueService::open(cfg.midi_port.as_deref(), cfg.midi_tempo_bpm)?;
            Ok((Box::new(service), Arc::new(NoAuthorization)))
        }
    }
}

/// Run a session over every frame `frames` yields, until the source ends.
pub fn run(cfg: &AppConfig, frames: Receiver<PoseSnapshot>) -> Result<SessionStats, AppError> {
    let thresholds = cfg.thresholds()?;
    let tracks = cfg.track_map()?;
    tracks.ensure_covers(Catalog::dance().names()).map_err(ConfigError::from)?;
    let (service, auth) = build_backend(&cfg.playback)?;

    info!(
        backend = service.name(),
        min_pose = thresholds.min_pose_confidence,
        min_part = thresholds.min_part_confidence,
        confirm_frames = cfg.confirm_frames,
        "session starting"
    );

    let mut session = Session::new(Catalog::dance(), tracks, service, auth, cfg.confirm_frames)?;
    run_session(&mut session, frames, thresholds);

    let (stats, _) = session.finish();
    info!(
        frames = stats.frames,
        transitions = stats.transitions,
        cues = stats.cues_submitted,
        coalesced = stats.cues_coalesced,
        dropped = stats.cues_dropped,
        "session finished"
    );
    Ok(stats)
}

/// The frame loop proper: one `process_frame` per pose, in arrival order.
pub fn run_session(session: &mut Session, frames: Receiver<PoseSnapshot>, thresholds: pose_stream::Thresholds) {
    for pose in frames {
        session.process_frame(&pose, thresholds);
        session.drain_reports();
    }
}
