//! # pose_stream
//!
//! One frame of body-pose estimation output, as delivered by an external
//! pose model:
//!
//! * a pose-level **score** in `[0, 1]`
//! * up to seventeen **keypoints**, one per [`Part`], each with a pixel
//!   position and its own confidence
//!
//! Snapshots are immutable once built.  Consumers read them through a
//! [`ConfidentParts`] view, which hides every keypoint whose confidence
//! does not clear the part threshold.
//!
//! ## Wire format
//!
//! Snapshots decode from the usual PoseNet JSON shape:
//!
//! ```rust
//! use pose_stream::{Part, PoseSnapshot};
//!
//! let json = r#"{
//!     "score": 0.92,
//!     "keypoints": [
//!         { "part": "nose",      "position": { "x": 300.0, "y": 80.0 },  "score": 0.99 },
//!         { "part": "leftWrist", "position": { "x": 200.0, "y": 40.0 },  "score": 0.71 }
//!     ]
//! }"#;
//!
//! let pose = PoseSnapshot::from_json(json).unwrap();
//! assert_eq!(pose.len(), 2);
//! assert_eq!(pose.keypoint(Part::LeftWrist).unwrap().position.x, 200.0);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

mod lookup;

pub use lookup::ConfidentParts;

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// Why a snapshot (or a threshold pair) was rejected.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("part `{0}` appears more than once in one snapshot")]
    DuplicatePart(Part),

    #[error("{what} {value} is outside [0, 1]")]
    OutOfRange { what: &'static str, value: f32 },

    #[error("malformed pose JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// Part — the fixed set of body-part names
// ════════════════════════════════════════════════════════════════════════════

/// Body parts reported by the pose model.
///
/// Serialized in camelCase (`leftWrist`, `rightEar`, …) to match the
/// model's output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Part {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Part {
    /// Every part, in model output order.
    pub const ALL: [Part; 17] = [
        Part::Nose,
        Part::LeftEye,      Part::RightEye,
        Part::LeftEar,      Part::RightEar,
        Part::LeftShoulder, Part::RightShoulder,
        Part::LeftElbow,    Part::RightElbow,
        Part::LeftWrist,    Part::RightWrist,
        Part::LeftHip,      Part::RightHip,
        Part::LeftKnee,     Part::RightKnee,
        Part::LeftAnkle,    Part::RightAnkle,
    ];

    /// Parts that make up the head reference point.
    pub const HEAD: [Part; 5] = [
        Part::Nose,
        Part::LeftEye, Part::RightEye,
        Part::LeftEar, Part::RightEar,
    ];

    /// The camelCase name used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Part::Nose          => "nose",
            Part::LeftEye       => "leftEye",
            Part::RightEye      => "rightEye",
            Part::LeftEar       => "leftEar",
            Part::RightEar      => "rightEar",
            Part::LeftShoulder  => "leftShoulder",
            Part::RightShoulder => "rightShoulder",
            Part::LeftElbow     => "leftElbow",
            Part::RightElbow    => "rightElbow",
            Part::LeftWrist     => "leftWrist",
            Part::RightWrist    => "rightWrist",
            Part::LeftHip       => "leftHip",
            Part::RightHip      => "rightHip",
            Part::LeftKnee      => "leftKnee",
            Part::RightKnee     => "rightKnee",
            Part::LeftAnkle     => "leftAnkle",
            Part::RightAnkle    => "rightAnkle",
        }
    }

    pub fn is_head(&self) -> bool {
        Part::HEAD.contains(self)
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Point / Keypoint
// ════════════════════════════════════════════════════════════════════════════

/// A position in frame pixel coordinates.  `y` grows downward, so
/// "above" means a smaller `y`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Strictly higher on screen than `other`.
    pub fn is_above(&self, other: Point) -> bool {
        self.y < other.y
    }

    /// Strictly lower on screen than `other`.
    pub fn is_below(&self, other: Point) -> bool {
        self.y > other.y
    }

    pub fn is_left_of(&self, other: Point) -> bool {
        self.x < other.x
    }

    pub fn is_right_of(&self, other: Point) -> bool {
        self.x > other.x
    }
}

/// One detected body part.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub part:       Part,
    pub position:   Point,
    /// Detection confidence, `[0, 1]`.  Called `score` on the wire.
    #[serde(rename = "score")]
    pub confidence: f32,
}

impl Keypoint {
    pub fn new(part: Part, x: f32, y: f32, confidence: f32) -> Self {
        Keypoint { part, position: Point::new(x, y), confidence }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

/// The two confidence cut-offs applied during classification.
///
/// They may change between frames; callers pass the current pair with
/// every frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// A pose scoring below this is ignored outright.
    pub min_pose_confidence: f32,
    /// A keypoint counts as observed only when its confidence is strictly
    /// greater than this.
    pub min_part_confidence: f32,
}

impl Thresholds {
    pub fn new(min_pose_confidence: f32, min_part_confidence: f32) -> Result<Self, SnapshotError> {
        check_unit("min_pose_confidence", min_pose_confidence)?;
        check_unit("min_part_confidence", min_part_confidence)?;
        Ok(Thresholds { min_pose_confidence, min_part_confidence })
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds { min_pose_confidence: 0.1, min_part_confidence: 0.5 }
    }
}

fn check_unit(what: &'static str, value: f32) -> Result<(), SnapshotError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SnapshotError::OutOfRange { what, value })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PoseSnapshot
// ════════════════════════════════════════════════════════════════════════════

/// One frame of pose output.  Keys are unique by construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPose", into = "RawPose")]
pub struct PoseSnapshot {
    score:     f32,
    keypoints: BTreeMap<Part, Keypoint>,
}

/// Wire shape: keypoints as a list, possibly with duplicates.
#[derive(Serialize, Deserialize)]
struct RawPose {
    score:     f32,
    #[serde(default)]
    keypoints: Vec<Keypoint>,
}

impl TryFrom<RawPose> for PoseSnapshot {
    type Error = SnapshotError;

    fn try_from(raw: RawPose) -> Result<Self, Self::Error> {
        PoseSnapshot::new(raw.score, raw.keypoints)
    }
}

impl From<PoseSnapshot> for RawPose {
    fn from(pose: PoseSnapshot) -> Self {
        RawPose {
            score:     pose.score,
            keypoints: pose.keypoints.into_values().collect(),
        }
    }
}

impl PoseSnapshot {
    /// Build a snapshot, rejecting duplicate parts and out-of-range scores.
    pub fn new<I>(score: f32, keypoints: I) -> Result<Self, SnapshotError>
    where
        I: IntoIterator<Item = Keypoint>,
    {
        check_unit("pose score", score)?;
        let mut map = BTreeMap::new();
        for kp in keypoints {
            check_unit("keypoint confidence", kp.confidence)?;
            if map.insert(kp.part, kp).is_some() {
                return Err(SnapshotError::DuplicatePart(kp.part));
            }
        }
        Ok(PoseSnapshot { score, keypoints: map })
    }

    /// Start an incremental build; see [`PoseBuilder`].
    pub fn builder(score: f32) -> PoseBuilder {
        PoseBuilder { score, keypoints: Vec::new() }
    }

    /// Decode one pose from PoseNet-shaped JSON.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Pose-level confidence.
    pub fn score(&self) -> f32 { self.score }

    pub fn keypoint(&self, part: Part) -> Option<&Keypoint> {
        self.keypoints.get(&part)
    }

    pub fn keypoints(&self) -> impl Iterator<Item = &Keypoint> {
        self.keypoints.values()
    }

    pub fn len(&self) -> usize { self.keypoints.len() }

    pub fn is_empty(&self) -> bool { self.keypoints.is_empty() }

    /// View of the parts whose confidence is strictly above `min_part`.
    pub fn confident(&self, min_part: f32) -> ConfidentParts<'_> {
        ConfidentParts::new(self, min_part)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PoseBuilder
// ════════════════════════════════════════════════════════════════════════════

/// Incremental snapshot construction for synthetic poses.
///
/// ```rust
/// use pose_stream::{Part, PoseSnapshot};
///
/// let pose = PoseSnapshot::builder(0.9)
///     .part(Part::Nose, 300.0, 80.0, 0.99)
///     .part(Part::LeftWrist, 200.0, 40.0, 0.8)
///     .build()
///     .unwrap();
/// assert_eq!(pose.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct PoseBuilder {
    score:     f32,
    keypoints: Vec<Keypoint>,
}

impl PoseBuilder {
    pub fn part(mut self, part: Part, x: f32, y: f32, confidence: f32) -> Self {
        self.keypoints.push(Keypoint::new(part, x, y, confidence));
        self
    }

    pub fn keypoint(mut self, kp: Keypoint) -> Self {
        self.keypoints.push(kp);
        self
    }

    pub fn build(self) -> Result<PoseSnapshot, SnapshotError> {
        PoseSnapshot::new(self.score, self.keypoints)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
