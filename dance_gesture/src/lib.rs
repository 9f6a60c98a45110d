//! # dance_gesture
//!
//! Turns a stream of [`PoseSnapshot`]s into a low-churn "current dance
//! move" signal.
//!
//! * [`Catalog`]: the fixed, ordered list of [`GestureDefinition`]s
//! * [`classify`]: pure per-frame matcher: pose in, gesture name (or
//!   none) out
//! * [`GestureTracker`]: holds the last confirmed gesture and reports a
//!   [`Transition`] only when it changes
//!
//! ## Quick start
//!
//! ```rust
//! use dance_gesture::{Catalog, GestureTracker, classify, samples, YMCA};
//! use pose_stream::Thresholds;
//!
//! let catalog = Catalog::dance();
//! let mut tracker = GestureTracker::new();
//!
//! let pose = samples::pose_for(Some(YMCA)).unwrap();
//! let seen = classify(&catalog, &pose, Thresholds::default());
//! assert_eq!(seen, Some(YMCA));
//!
//! let t = tracker.observe(seen).unwrap();
//! assert_eq!(t.to, Some(YMCA));
//! assert!(tracker.observe(seen).is_none());   // repeat: no transition
//! ```
//!
//! ## Gesture catalog
//!
//! | Priority | Gesture | Shape |
//! |---|---|---|
//! | 1 | `YMCA` | both arms raised in a Y, wrists either side of the head |
//! | 2 | `Baby Shark` | forearms up in front of the chest, wrists between the shoulders |
//! | 3 | `Disco` | one hand pointing above the head, the other low |
//! | 4 | `Thriller` | both hands clawed out to the same side, between head and shoulders |

pub mod catalog;
pub mod classifier;
pub mod tracker;
pub mod samples;

pub use catalog::{Arm, Catalog, CatalogError, GestureDefinition, Predicate};
pub use catalog::{BABY_SHARK, DISCO, THRILLER, YMCA};
pub use classifier::classify;
pub use tracker::{GestureTracker, Transition};

/// A gesture name from the catalog.  `None` stands for "no gesture".
pub type GestureName = &'static str;

pub use pose_stream::{PoseSnapshot, Thresholds};
