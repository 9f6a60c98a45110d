//! Gesture → track mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where playback should jump for one gesture.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackCue {
    /// Backend-specific track reference.
    pub track:     String,
    /// Start offset; `0` means "from the top" and needs no seek.
    pub offset_ms: u64,
}

impl TrackCue {
    pub fn new(track: &str, offset_ms: u64) -> Self {
        TrackCue { track: track.to_string(), offset_ms }
    }

    pub fn needs_seek(&self) -> bool {
        self.offset_ms > 0
    }
}

/// One `[[tracks]]` row in the configuration file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackEntry {
    pub gesture:   String,
    pub track:     String,
    #[serde(default)]
    pub offset_ms: u64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("gesture `{0}` is mapped more than once")]
    Duplicate(String),

    #[error("gesture `{0}` has no track mapping")]
    Missing(String),

    #[error("gesture `{0}` maps to an empty track reference")]
    EmptyTrack(String),
}

/// Static gesture → cue table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackMap {
    cues: BTreeMap<String, TrackCue>,
}

impl TrackMap {
    pub fn from_entries<I>(entries: I) -> Result<Self, MappingError>
    where
        I: IntoIterator<Item = TrackEntry>,
    {
        let mut cues = BTreeMap::new();
        for e in entries {
            if e.track.trim().is_empty() {
                return Err(MappingError::EmptyTrack(e.gesture));
            }
            let cue = TrackCue { track: e.track, offset_ms: e.offset_ms };
            if cues.insert(e.gesture.clone(), cue).is_some() {
                return Err(MappingError::Duplicate(e.gesture));
            }
        }
        Ok(TrackMap { cues })
    }

    pub fn cue_for(&self, gesture: &str) -> Option<&TrackCue> {
        self.cues.get(gesture)
    }

    /// Check that every name in `gestures` has an entry.  Run this once at
    /// start-up against the classifier's catalog.
    pub fn ensure_covers<'a, I>(&self, gestures: I) -> Result<(), MappingError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for g in gestures {
            if !self.cues.contains_key(g) {
                return Err(MappingError::Missing(g.to_string()));
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &TrackCue)> {
        self.cues.iter().map(|(g, c)| (g.as_str(), c))
    }

    pub fn len(&self) -> usize { self.cues.len() }

    pub fn is_empty(&self) -> bool { self.cues.is_empty() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(g: &str, t: &str, ms: u64) -> TrackEntry {
        TrackEntry { gesture: g.into(), track: t.into(), offset_ms: ms }
    }

    #[test]
    fn lookup() {
        let m = TrackMap::from_entries([entry("YMCA", "t:1", 45_000), entry("Disco", "t:2", 0)]).unwrap();
        assert_eq!(m.cue_for("YMCA"), Some(&TrackCue::new("t:1", 45_000)));
        assert!(m.cue_for("YMCA").unwrap().needs_seek());
        assert!(!m.cue_for("Disco").unwrap().needs_seek());
        assert!(m.cue_for("Thriller").is_none());
    }

    #[test]
    fn duplicate_gesture_rejected() {
        let err = TrackMap::from_entries([entry("YMCA", "a", 0), entry("YMCA", "b", 0)]).unwrap_err();
        assert_eq!(err, MappingError::Duplicate("YMCA".into()));
    }

    #[test]
    fn empty_track_rejected() {
        let err = TrackMap::from_entries([entry("YMCA", "  ", 0)]).unwrap_err();
        assert_eq!(err, MappingError::EmptyTrack("YMCA".into()));
    }

    #[test]
    fn coverage_check_names_first_gap() {
        let m = TrackMap::from_entries([entry("YMCA", "a", 0)]).unwrap();
        assert!(m.ensure_covers(["YMCA"]).is_ok());
        assert_eq!(
            m.ensure_covers(["YMCA", "Disco", "Thriller"]).unwrap_err(),
            MappingError::Missing("Disco".into())
        );
    }

    #[test]
    fn offset_defaults_to_zero_in_config() {
        let e: TrackEntry = serde_json::from_str(r#"{"gesture":"YMCA","track":"x"}"#).unwrap();
        assert_eq!(e.offset_ms, 0);
    }
}
