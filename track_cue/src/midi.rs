//! MIDI sequencer backend.
//!
//! Cues a hardware or software sequencer that holds the dance tracks as
//! numbered songs.  Track references look like `midi:song:<n>` with
//! `n` in 0–127.  Positions are sent as Song Position Pointer values
//! (MIDI beats = sixteenth notes) at a fixed tempo.

use tracing::{info, warn};

use crate::service::{PlaybackError, PlaybackService};

const SONG_PREFIX: &str = "midi:song:";

// System common / real-time status bytes
const SONG_POSITION: u8 = 0xF2;
const SONG_SELECT:   u8 = 0xF3;
const CONTINUE:      u8 = 0xFB;
const STOP:          u8 = 0xFC;

/// Largest 14-bit Song Position Pointer value.
const MAX_POSITION: u64 = 0x3FFF;

// ════════════════════════════════════════════════════════════════════════════
// Message builders
// ════════════════════════════════════════════════════════════════════════════

/// Parse `midi:song:<n>` into a song number.
pub fn parse_song(track: &str) -> Result<u8, PlaybackError> {
    track
        .strip_prefix(SONG_PREFIX)
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|&n| n <= 127)
        .ok_or_else(|| PlaybackError::InvalidTrack(track.to_string()))
}

/// Convert milliseconds to MIDI beats (sixteenth notes) at `bpm`,
/// saturating at the 14-bit maximum.
pub fn ms_to_midi_beats(offset_ms: u64, bpm: u32) -> u16 {
    // one quarter = 60_000 / bpm ms, four MIDI beats per quarter
    let beats = offset_ms.saturating_mul(u64::from(bpm.max(1))).saturating_mul(4) / 60_000;
    beats.min(MAX_POSITION) as u16
}

pub fn song_position(beats: u16) -> [u8; 3] {
    [SONG_POSITION, (beats & 0x7F) as u8, ((beats >> 7) & 0x7F) as u8]
}

/// Messages that stop, select `song`, move to `beats` and resume.
pub fn play_messages(song: u8, beats: u16) -> Vec<Vec<u8>> {
    vec![
        vec![STOP],
        vec![SONG_SELECT, song & 0x7F],
        song_position(beats).to_vec(),
        vec![CONTINUE],
    ]
}

/// Messages that move the current song to `beats`.
pub fn seek_messages(beats: u16) -> Vec<Vec<u8>> {
    vec![vec![STOP], song_position(beats).to_vec(), vec![CONTINUE]]
}

// ════════════════════════════════════════════════════════════════════════════
// MidiCueService
// ════════════════════════════════════════════════════════════════════════════

pub struct MidiCueService {
    conn:      midir::MidiOutputConnection,
    tempo_bpm: u32,
}

impl MidiCueService {
    /// Open a MIDI output port.  The first port whose name contains
    /// `port_hint` (case-insensitive) wins; otherwise the first port.
    pub fn open(port_hint: Option<&str>, tempo_bpm: u32) -> Result<Self, PlaybackError> {
        let midi_out = midir::MidiOutput::new("dance_trigger")
            .map_err(|e| PlaybackError::Midi(e.to_string()))?;

        let ports = midi_out.ports();
        if ports.is_empty() {
            return Err(PlaybackError::Midi("no MIDI output ports found".into()));
        }

        let hint = port_hint.map(str::to_lowercase);
        let port_idx = ports.iter().enumerate()
            .find(|(_, p)| match &hint {
                Some(h) => midi_out.port_name(p)
                    .map(|n| n.to_lowercase().contains(h.as_str()))
                    .unwrap_or(false),
                None => false,
            })
            .map(|(i, _)| i)
            .unwrap_or_else(|| {
                if let Some(h) = &hint {
                    warn!(hint = %h, "no MIDI port matches hint, using the first port");
                }
                0
            });

        let port = &ports[port_idx];
        let name = midi_out.port_name(port).unwrap_or_else(|_| "Unknown".to_string());
        info!(port = %name, "opening MIDI port");

        let conn = midi_out
            .connect(port, "dance-cue")
            .map_err(|e| PlaybackError::Midi(e.to_string()))?;
        Ok(MidiCueService { conn, tempo_bpm: tempo_bpm.max(1) })
    }

    fn send_all(&mut self, messages: &[Vec<u8>]) -> Result<(), PlaybackError> {
        for m in messages {
            self.conn.send(m).map_err(|e| PlaybackError::Midi(e.to_string()))?;
        }
        Ok(())
    }
}

impl PlaybackService for MidiCueService {
    fn play(&mut self, track: &str, offset_ms: u64) -> Result<(), PlaybackError> {
        let song  = parse_song(track)?;
        let beats = ms_to_midi_beats(offset_ms, self.tempo_bpm);
        self.send_all(&play_messages(song, beats))
    }

    fn seek(&mut self, offset_ms: u64) -> Result<(), PlaybackError> {
        let beats = ms_to_midi_beats(offset_ms, self.tempo_bpm);
        self.send_all(&seek_messages(beats))
    }

    fn name(&self) -> &'static str { "midi" }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
