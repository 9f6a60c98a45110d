//! Synthetic poses for each catalog gesture, on a 640×480 frame.
//!
//! Used by the scripted demo source and by tests.  The head reference of
//! every sample sits at (300, 94); shoulders at y = 200.

use pose_stream::{Part, PoseBuilder, PoseSnapshot, SnapshotError};

use crate::catalog::{BABY_SHARK, DISCO, THRILLER, YMCA};

const CONFIDENCE: f32 = 0.9;

/// Head, shoulders and hips shared by every sample.
fn torso(score: f32) -> PoseBuilder {
    PoseSnapshot::builder(score)
        .part(Part::Nose,          300.0, 100.0, CONFIDENCE)
        .part(Part::LeftEye,       290.0,  90.0, CONFIDENCE)
        .part(Part::RightEye,      310.0,  90.0, CONFIDENCE)
        .part(Part::LeftEar,       280.0,  95.0, CONFIDENCE)
        .part(Part::RightEar,      320.0,  95.0, CONFIDENCE)
        .part(Part::LeftShoulder,  250.0, 200.0, CONFIDENCE)
        .part(Part::RightShoulder, 350.0, 200.0, CONFIDENCE)
        .part(Part::LeftHip,       265.0, 360.0, CONFIDENCE)
        .part(Part::RightHip,      335.0, 360.0, CONFIDENCE)
}

/// `(left wrist, left elbow, right wrist, right elbow)` for a gesture;
/// arms hanging down for `None` or an unknown name.
fn arms(gesture: Option<&str>) -> [(f32, f32); 4] {
    match gesture {
        Some(g) if g == YMCA       => [(200.0,  40.0), (230.0, 120.0), (400.0,  40.0), (370.0, 120.0)],
        Some(g) if g == BABY_SHARK => [(280.0, 240.0), (240.0, 300.0), (320.0, 240.0), (360.0, 300.0)],
        Some(g) if g == DISCO      => [(220.0, 330.0), (230.0, 270.0), (420.0,  30.0), (380.0, 110.0)],
        Some(g) if g == THRILLER   => [(420.0, 150.0), (330.0, 180.0), (470.0, 160.0), (400.0, 185.0)],
        _                          => [(240.0, 380.0), (245.0, 290.0), (360.0, 380.0), (355.0, 290.0)],
    }
}

/// A confident sample pose for `gesture`, or a neutral standing pose for
/// `None`.  Unknown names yield the neutral pose as well.
pub fn pose_for(gesture: Option<&str>) -> Result<PoseSnapshot, SnapshotError> {
    pose_with_score(gesture, CONFIDENCE)
}

/// Like [`pose_for`] with an explicit pose-level score.
pub fn pose_with_score(gesture: Option<&str>, score: f32) -> Result<PoseSnapshot, SnapshotError> {
    let [lw, le, rw, re] = arms(gesture);
    torso(score)
        .part(Part::LeftWrist,  lw.0, lw.1, CONFIDENCE)
        .part(Part::LeftElbow,  le.0, le.1, CONFIDENCE)
        .part(Part::RightWrist, rw.0, rw.1, CONFIDENCE)
        .part(Part::RightElbow, re.0, re.1, CONFIDENCE)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_are_complete_upper_bodies() {
        for g in [None, Some(YMCA), Some(BABY_SHARK), Some(DISCO), Some(THRILLER)] {
            let pose = pose_for(g).unwrap();
            assert_eq!(pose.len(), 13);
        }
    }

    #[test]
    fn unknown_gesture_is_neutral() {
        assert_eq!(pose_for(Some("Macarena")).unwrap(), pose_for(None).unwrap());
    }

    #[test]
    fn score_is_applied() {
        assert_eq!(pose_with_score(Some(YMCA), 0.05).unwrap().score(), 0.05);
    }
}
