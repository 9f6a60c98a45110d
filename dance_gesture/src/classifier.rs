//! Per-frame gesture classification.

use pose_stream::{PoseSnapshot, Thresholds};

use crate::catalog::Catalog;
use crate::GestureName;

/// Match one pose against the catalog.
///
/// Returns the first definition, in catalog order, whose required parts
/// are all observed above `min_part_confidence` and whose predicate holds
/// against the head reference.  A pose scoring below
/// `min_pose_confidence`, or one with no confidently observed head part,
/// never matches.
///
/// Pure: the same pose and thresholds always give the same answer.
pub fn classify(catalog: &Catalog, pose: &PoseSnapshot, thresholds: Thresholds) -> Option<GestureName> {
    if pose.score() < thresholds.min_pose_confidence {
        return None;
    }

    let parts = pose.confident(thresholds.min_part_confidence);
    let head  = parts.head_reference();

    for def in catalog.iter() {
        if !parts.all(def.required) {
            continue;
        }
        let Some(head) = head else { continue };
        if (def.predicate)(&parts, head) {
            return Some(def.name);
        }
    }
    None
}

impl Catalog {
    /// Method form of [`classify`].
    pub fn classify(&self, pose: &PoseSnapshot, thresholds: Thresholds) -> Option<GestureName> {
        classify(self, pose, thresholds)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GestureDefinition, BABY_SHARK, DISCO, THRILLER, YMCA};
    use crate::samples;
    use pose_stream::{Keypoint, Part};

    fn t(pose: f32, part: f32) -> Thresholds {
        Thresholds { min_pose_confidence: pose, min_part_confidence: part }
    }

    // ── catalog samples ──────────────────────────────────────────────────
    #[test]
    fn samples_classify_as_themselves() {
        let c = Catalog::dance();
        for g in [YMCA, BABY_SHARK, DISCO, THRILLER] {
            let pose = samples::pose_for(Some(g)).unwrap();
            assert_eq!(c.classify(&pose, Thresholds::default()), Some(g));
        }
        assert_eq!(c.classify(&samples::pose_for(None).unwrap(), Thresholds::default()), None);
    }

    // ── pose-level gate ──────────────────────────────────────────────────
    #[test]
    fn low_pose_score_is_never_trusted() {
        let c = Catalog::dance();
        for score in [0.0, 0.1, 0.29] {
            let pose = samples::pose_with_score(Some(YMCA), score).unwrap();
            assert_eq!(classify(&c, &pose, t(0.3, 0.0)), None, "score {}", score);
        }
        let pose = samples::pose_with_score(Some(YMCA), 0.3).unwrap();
        assert_eq!(classify(&c, &pose, t(0.3, 0.0)), Some(YMCA));
    }

    // ── part-level gate ──────────────────────────────────────────────────
    #[test]
    fn part_threshold_above_every_confidence_yields_none() {
        let pose = samples::pose_for(Some(DISCO)).unwrap();
        assert_eq!(classify(&Catalog::dance(), &pose, t(0.0, 0.95)), None);
    }

    #[test]
    fn missing_required_part_yields_none() {
        let full = samples::pose_for(Some(YMCA)).unwrap();
        let pose = pose_stream::PoseSnapshot::new(
            0.9,
            full.keypoints().copied().filter(|kp| kp.part != Part::RightWrist),
        ).unwrap();
        assert_eq!(classify(&Catalog::dance(), &pose, Thresholds::default()), None);
    }

    #[test]
    fn low_confidence_wrist_yields_none() {
        let full = samples::pose_for(Some(THRILLER)).unwrap();
        let pose = pose_stream::PoseSnapshot::new(
            0.9,
            full.keypoints().map(|kp| match kp.part {
                Part::LeftWrist => Keypoint { confidence: 0.4, ..*kp },
                _               => *kp,
            }),
        ).unwrap();
        assert_eq!(classify(&Catalog::dance(), &pose, t(0.1, 0.5)), None);
        assert_eq!(classify(&Catalog::dance(), &pose, t(0.1, 0.3)), Some(THRILLER));
    }

    #[test]
    fn no_confident_head_part_yields_none() {
        let full = samples::pose_for(Some(YMCA)).unwrap();
        let pose = pose_stream::PoseSnapshot::new(
            0.9,
            full.keypoints().copied().filter(|kp| !kp.part.is_head()),
        ).unwrap();
        assert_eq!(classify(&Catalog::dance(), &pose, Thresholds::default()), None);
    }

    #[test]
    fn empty_pose_yields_none() {
        let pose = pose_stream::PoseSnapshot::new(1.0, Vec::new()).unwrap();
        assert_eq!(classify(&Catalog::dance(), &pose, t(0.0, 0.0)), None);
    }

    #[test]
    fn head_reference_uses_any_visible_face_part() {
        // Only the left ear survives; it still anchors the YMCA split.
        let full = samples::pose_for(Some(YMCA)).unwrap();
        let pose = pose_stream::PoseSnapshot::new(
            0.9,
            full.keypoints().copied().filter(|kp| !kp.part.is_head() || kp.part == Part::LeftEar),
        ).unwrap();
        assert_eq!(classify(&Catalog::dance(), &pose, Thresholds::default()), Some(YMCA));
    }

    // ── determinism & priority ───────────────────────────────────────────
    #[test]
    fn classification_is_idempotent() {
        let c = Catalog::dance();
        let pose = samples::pose_for(Some(BABY_SHARK)).unwrap();
        let first = classify(&c, &pose, Thresholds::default());
        for _ in 0..10 {
            assert_eq!(classify(&c, &pose, Thresholds::default()), first);
        }
    }

    #[test]
    fn earlier_definition_wins_on_overlap() {
        let hands_up: crate::Predicate = |parts, head| {
            parts.get(Part::LeftWrist).is_some_and(|w| w.is_above(head))
        };
        let any_wrist: crate::Predicate = |parts, _| parts.contains(Part::LeftWrist);
        let first  = GestureDefinition { name: "First",  required: &[Part::LeftWrist], predicate: hands_up };
        let second = GestureDefinition { name: "Second", required: &[Part::LeftWrist], predicate: any_wrist };

        let pose = samples::pose_for(Some(YMCA)).unwrap();
        let ab = Catalog::new(vec![first, second]).unwrap();
        let ba = Catalog::new(vec![second, first]).unwrap();
        for _ in 0..5 {
            assert_eq!(classify(&ab, &pose, Thresholds::default()), Some("First"));
            assert_eq!(classify(&ba, &pose, Thresholds::default()), Some("Second"));
        }
    }

    #[test]
    fn thresholds_are_read_per_call() {
        let c = Catalog::dance();
        let pose = samples::pose_for(Some(DISCO)).unwrap();
        assert_eq!(classify(&c, &pose, t(0.1, 0.5)), Some(DISCO));
        assert_eq!(classify(&c, &pose, t(0.95, 0.5)), None);
        assert_eq!(classify(&c, &pose, t(0.1, 0.5)), Some(DISCO));
    }
}
