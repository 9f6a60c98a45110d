//! Application configuration.
//!
//! Loaded from a TOML file (every key optional), then overridden by
//! command-line flags.  See `dance_trigger.toml` at the crate root for a
//! commented example.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pose_stream::{SnapshotError, Thresholds};
use track_cue::{MappingError, TrackEntry, TrackMap};

use dance_gesture::{Catalog, BABY_SHARK, DISCO, THRILLER, YMCA};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot render config: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("invalid threshold: {0}")]
    Threshold(#[from] SnapshotError),

    #[error("invalid track mapping: {0}")]
    Mapping(#[from] MappingError),
}

// ════════════════════════════════════════════════════════════════════════════
// Playback backend selection
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Log cues only.
    #[default]
    Log,
    /// Web playback API (needs a bearer token).
    Web,
    /// MIDI sequencer via Song Select / Song Position Pointer.
    Midi,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub backend:        BackendKind,
    pub api_base_url:   String,
    /// Environment variable holding the bearer token.
    pub token_env:      String,
    pub client_id:      Option<String>,
    pub redirect_uri:   String,
    pub device_id:      Option<String>,
    pub midi_port:      Option<String>,
    pub midi_tempo_bpm: u32,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            backend:        BackendKind::Log,
            api_base_url:   track_cue::web::DEFAULT_BASE_URL.to_string(),
            token_env:      "DANCE_TRIGGER_TOKEN".to_string(),
            client_id:      None,
            redirect_uri:   "http://localhost:8888/callback".to_string(),
            device_id:      None,
            midi_port:      None,
            midi_tempo_bpm: 120,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub min_pose_confidence: f32,
    pub min_part_confidence: f32,
    /// Consecutive frames a new gesture must hold before it is confirmed.
    /// `1` flips on a single frame.
    pub confirm_frames:      u32,
    /// Delay between synthetic frames in demo mode.
    pub frame_interval_ms:   u64,
    pub playback:            PlaybackConfig,
    pub tracks:              Vec<TrackEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let t = Thresholds::default();
        AppConfig {
            min_pose_confidence: t.min_pose_confidence,
            min_part_confidence: t.min_part_confidence,
            confirm_frames:      1,
            frame_interval_ms:   33,
            playback:            PlaybackConfig::default(),
            tracks:              default_tracks(),
        }
    }
}

fn default_tracks() -> Vec<TrackEntry> {
    [
        (YMCA,       "midi:song:1", 45_000),
        (BABY_SHARK, "midi:song:2",      0),
        (DISCO,      "midi:song:3", 30_000),
        (THRILLER,   "midi:song:4", 80_000),
    ]
    .into_iter()
    .map(|(g, t, ms)| TrackEntry { gesture: g.to_string(), track: t.to_string(), offset_ms: ms })
    .collect()
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate: thresholds in range, and a track for every
    /// catalog gesture.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = toml::from_str(text)?;
        cfg.thresholds()?;
        cfg.track_map()?.ensure_covers(Catalog::dance().names())?;
        Ok(cfg)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validated threshold pair.
    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Ok(Thresholds::new(self.min_pose_confidence, self.min_part_confidence)?)
    }

    pub fn track_map(&self) -> Result<TrackMap, ConfigError> {
        Ok(TrackMap::from_entries(self.tracks.iter().cloned())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_dance_catalog() {
        let cfg = AppConfig::default();
        let map = cfg.track_map().unwrap();
        map.ensure_covers(dance_gesture::Catalog::dance().names()).unwrap();
        assert_eq!(map.cue_for(YMCA).unwrap().offset_ms, 45_000);
        assert_eq!(cfg.playback.backend, BackendKind::Log);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_overrides() {
        let cfg = AppConfig::from_toml(r#"
            min_part_confidence = 0.7
            confirm_frames = 3

            [playback]
            backend = "web"
            device_id = "kitchen"
        "#).unwrap();
        assert_eq!(cfg.min_part_confidence, 0.7);
        assert_eq!(cfg.min_pose_confidence, 0.1);
        assert_eq!(cfg.confirm_frames, 3);
        assert_eq!(cfg.playback.backend, BackendKind::Web);
        assert_eq!(cfg.playback.device_id.as_deref(), Some("kitchen"));
        assert_eq!(cfg.playback.token_env, "DANCE_TRIGGER_TOKEN");
        assert_eq!(cfg.tracks, default_tracks());
    }

    #[test]
    fn track_table_must_cover_the_catalog() {
        let err = AppConfig::from_toml(r#"
            [[tracks]]
            gesture = "YMCA"
            track = "spotify:track:abc"
            offset_ms = 1000
        "#).unwrap_err();
        assert!(matches!(err, ConfigError::Mapping(MappingError::Missing(ref g)) if g == BABY_SHARK));
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        let err = AppConfig::from_toml("min_pose_confidence = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Threshold(_)));
    }

    #[test]
    fn unknown_backend_rejected() {
        let err = AppConfig::from_toml("[playback]\nbackend = \"cassette\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn duplicate_track_rejected() {
        let err = AppConfig::from_toml(r#"
            [[tracks]]
            gesture = "Disco"
            track = "a"
            [[tracks]]
            gesture = "Disco"
            track = "b"
        "#).unwrap_err();
        assert!(matches!(err, ConfigError::Mapping(MappingError::Duplicate(_))));
    }

    #[test]
    fn rendered_config_loads_back() {
        let cfg = AppConfig::default();
        let text = cfg.to_toml().unwrap();
        assert_eq!(AppConfig::from_toml(&text).unwrap(), cfg);
    }
}
