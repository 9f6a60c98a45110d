//! # dance_trigger
//!
//! Watches a pose stream, recognises dance moves, and cues the matching
//! track on an external player.
//!
//! ## Pipeline
//!
//! | Stage | Where | Runs on |
//! |---|---|---|
//! | Pose frames | [`source::FrameSource`] (replay file or scripted demo) | source thread |
//! | Classification + debounce | [`session::Session::process_frame`] | frame loop |
//! | Playback cue | [`track_cue::Player`] | playback thread |
//!
//! ## Frame sources
//!
//! * [`source::ReplaySource`]: one PoseNet-shaped JSON object per line
//!   (`{"score":…,"keypoints":[{"part":"leftWrist","position":{"x":…,"y":…},"score":…}]}`)
//! * [`source::ScriptedSource`]: synthetic poses from
//!   [`dance_gesture::samples`], held for a number of frames each
//!
//! ## Backends
//!
//! | `--backend` | Service | Authorization |
//! |---|---|---|
//! | `log` (default) | [`track_cue::LogService`] | none |
//! | `web` | [`track_cue::WebPlaybackService`] | bearer token from `$DANCE_TRIGGER_TOKEN` |
//! | `midi` | [`track_cue::MidiCueService`] | none |

pub mod config;
pub mod session;
pub mod source;
pub mod app;
