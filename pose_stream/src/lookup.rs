//! Confidence-gated view over a snapshot.

use crate::{Part, Point, PoseSnapshot};

/// A [`PoseSnapshot`] seen through a part-confidence threshold.
///
/// Low-confidence keypoints are model extrapolations, so every lookup
/// through this view treats them as absent.
#[derive(Clone, Copy, Debug)]
pub struct ConfidentParts<'a> {
    pose:     &'a PoseSnapshot,
    min_part: f32,
}

impl<'a> ConfidentParts<'a> {
    pub fn new(pose: &'a PoseSnapshot, min_part: f32) -> Self {
        ConfidentParts { pose, min_part }
    }

    /// Position of `part` if it was detected with confidence above the
    /// threshold.
    pub fn get(&self, part: Part) -> Option<Point> {
        self.pose
            .keypoint(part)
            .filter(|kp| kp.confidence > self.min_part)
            .map(|kp| kp.position)
    }

    pub fn contains(&self, part: Part) -> bool {
        self.get(part).is_some()
    }

    /// True when every part in `parts` is confidently observed.
    pub fn all(&self, parts: &[Part]) -> bool {
        parts.iter().all(|&p| self.contains(p))
    }

    /// Number of confidently observed parts.
    pub fn count(&self) -> usize {
        Part::ALL.iter().filter(|&&p| self.contains(p)).count()
    }

    /// Mean position of the confidently observed head parts, or `None`
    /// when no head part clears the threshold.
    pub fn head_reference(&self) -> Option<Point> {
        let (sum, n) = Part::HEAD
            .iter()
            .filter_map(|&p| self.get(p))
            .fold((Point::default(), 0u32), |(acc, n), p| {
                (Point::new(acc.x + p.x, acc.y + p.y), n + 1)
            });
        if n == 0 {
            return None;
        }
        Some(Point::new(sum.x / n as f32, sum.y / n as f32))
    }
}
