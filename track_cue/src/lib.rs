//! # track_cue
//!
//! Fires a playback cue, once, for each confirmed gesture.
//!
//! * [`TrackMap`]: gesture name → [`TrackCue`] (track reference + start
//!   offset), checked for completeness against the gesture catalog
//! * [`PlaybackService`]: the external player: `play` then optional `seek`
//! * [`Authorizer`]: the external authorization flow, asked to renew when
//!   the player reports an expired token
//! * [`PlaybackTrigger`]: resolves a gesture and talks to the service
//! * [`Player`]: runs the trigger on its own thread with at most one cue
//!   in flight; a newer cue replaces an older one still waiting
//!
//! ## Backends
//!
//! | Backend | Track reference | Notes |
//! |---|---|---|
//! | [`LogService`] | anything | logs requests only |
//! | [`WebPlaybackService`] | `spotify:track:…` URI | Web API over HTTPS, bearer token |
//! | [`MidiCueService`] | `midi:song:<n>` | Song Select + Song Position Pointer |

pub mod mapping;
pub mod service;
pub mod web;
pub mod midi;
pub mod auth;
pub mod trigger;
pub mod player;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use auth::{authorize_url, Authorizer, NoAuthorization, TokenStore, PLAYBACK_SCOPES};
pub use mapping::{MappingError, TrackCue, TrackEntry, TrackMap};
pub use midi::MidiCueService;
pub use player::{CueReport, Player};
pub use service::{LogService, PlaybackError, PlaybackService};
pub use trigger::{CueOutcome, PlaybackTrigger, TriggerError};
pub use web::WebPlaybackService;
