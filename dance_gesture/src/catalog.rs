//! The gesture catalog: declarative definitions plus their geometric
//! predicates.
//!
//! Every predicate is a plain function over a confidence-gated view of the
//! pose and the head reference point.  Required parts have already been
//! checked by the time a predicate runs, but predicates still go through
//! `Option` so they stay total when called directly.

use pose_stream::{ConfidentParts, Part, Point};

use crate::GestureName;

pub const YMCA:       GestureName = "YMCA";
pub const BABY_SHARK: GestureName = "Baby Shark";
pub const DISCO:      GestureName = "Disco";
pub const THRILLER:   GestureName = "Thriller";

// ════════════════════════════════════════════════════════════════════════════
// GestureDefinition
// ════════════════════════════════════════════════════════════════════════════

/// Geometric test run once a definition is eligible.  The second argument
/// is the head reference point.
pub type Predicate = fn(&ConfidentParts<'_>, Point) -> bool;

/// One named gesture.
#[derive(Clone, Copy)]
pub struct GestureDefinition {
    pub name:     GestureName,
    /// All of these must be observed above the part threshold.
    pub required: &'static [Part],
    pub predicate: Predicate,
}

impl std::fmt::Debug for GestureDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureDefinition")
            .field("name", &self.name)
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("gesture name must not be empty")]
    EmptyName,

    #[error("gesture `{0}` is defined twice")]
    DuplicateName(GestureName),
}

// ════════════════════════════════════════════════════════════════════════════
// Catalog
// ════════════════════════════════════════════════════════════════════════════

const ARMS: &[Part] = &[
    Part::LeftWrist,    Part::RightWrist,
    Part::LeftElbow,    Part::RightElbow,
    Part::LeftShoulder, Part::RightShoulder,
];

const WRISTS_AND_SHOULDERS: &[Part] = &[
    Part::LeftWrist,    Part::RightWrist,
    Part::LeftShoulder, Part::RightShoulder,
];

/// Ordered gesture definitions.  Earlier entries win when more than one
/// matches the same pose.
#[derive(Clone, Debug)]
pub struct Catalog {
    definitions: Vec<GestureDefinition>,
}

impl Catalog {
    /// The four dance moves, in priority order.
    pub fn dance() -> Self {
        Catalog {
            definitions: vec![
                GestureDefinition { name: YMCA,       required: ARMS,                 predicate: ymca },
                GestureDefinition { name: BABY_SHARK, required: ARMS,                 predicate: baby_shark },
                GestureDefinition { name: DISCO,      required: WRISTS_AND_SHOULDERS, predicate: disco },
                GestureDefinition { name: THRILLER,   required: ARMS,                 predicate: thriller },
            ],
        }
    }

    /// A catalog with custom definitions, evaluated in the given order.
    pub fn new(definitions: Vec<GestureDefinition>) -> Result<Self, CatalogError> {
        for (i, def) in definitions.iter().enumerate() {
            if def.name.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if definitions[..i].iter().any(|d| d.name == def.name) {
                return Err(CatalogError::DuplicateName(def.name));
            }
        }
        Ok(Catalog { definitions })
    }

    pub fn iter(&self) -> impl Iterator<Item = &GestureDefinition> {
        self.definitions.iter()
    }

    /// Gesture names in priority order.
    pub fn names(&self) -> impl Iterator<Item = GestureName> + '_ {
        self.definitions.iter().map(|d| d.name)
    }

    pub fn get(&self, name: &str) -> Option<&GestureDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize { self.definitions.len() }

    pub fn is_empty(&self) -> bool { self.definitions.is_empty() }
}

impl Default for Catalog {
    fn default() -> Self { Catalog::dance() }
}

// ════════════════════════════════════════════════════════════════════════════
// Arm — wrist / elbow / shoulder triple
// ════════════════════════════════════════════════════════════════════════════

/// One arm's three joints, available only when all three are observed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arm {
    pub wrist:    Point,
    pub elbow:    Point,
    pub shoulder: Point,
}

impl Arm {
    pub fn left(parts: &ConfidentParts<'_>) -> Option<Arm> {
        Some(Arm {
            wrist:    parts.get(Part::LeftWrist)?,
            elbow:    parts.get(Part::LeftElbow)?,
            shoulder: parts.get(Part::LeftShoulder)?,
        })
    }

    pub fn right(parts: &ConfidentParts<'_>) -> Option<Arm> {
        Some(Arm {
            wrist:    parts.get(Part::RightWrist)?,
            elbow:    parts.get(Part::RightElbow)?,
            shoulder: parts.get(Part::RightShoulder)?,
        })
    }

    /// Wrist above elbow above shoulder.
    pub fn is_raised(&self) -> bool {
        self.wrist.is_above(self.elbow) && self.elbow.is_above(self.shoulder)
    }

    /// Forearm pointing up with the hand still below shoulder height.
    pub fn is_folded_up(&self) -> bool {
        self.wrist.is_above(self.elbow) && self.wrist.is_below(self.shoulder)
    }
}

fn both_arms(parts: &ConfidentParts<'_>) -> Option<(Arm, Arm)> {
    Some((Arm::left(parts)?, Arm::right(parts)?))
}

// ════════════════════════════════════════════════════════════════════════════
// Predicates
// ════════════════════════════════════════════════════════════════════════════

/// Arms up in a Y: both arms raised, wrists on either side of the head.
pub fn ymca(parts: &ConfidentParts<'_>, head: Point) -> bool {
    both_arms(parts).is_some_and(|(l, r)| {
        l.is_raised()
            && r.is_raised()
            && l.wrist.is_left_of(head)
            && r.wrist.is_right_of(head)
    })
}

/// Both forearms folded up in front of the chest, hands between the
/// shoulders.
pub fn baby_shark(parts: &ConfidentParts<'_>, _head: Point) -> bool {
    both_arms(parts).is_some_and(|(l, r)| {
        let lo = l.shoulder.x.min(r.shoulder.x);
        let hi = l.shoulder.x.max(r.shoulder.x);
        let between = |p: Point| p.x > lo && p.x < hi;
        l.is_folded_up() && r.is_folded_up() && between(l.wrist) && between(r.wrist)
    })
}

/// One hand pointing above the head, the other dropped below its shoulder.
pub fn disco(parts: &ConfidentParts<'_>, head: Point) -> bool {
    let joints = (
        parts.get(Part::LeftWrist),
        parts.get(Part::RightWrist),
        parts.get(Part::LeftShoulder),
        parts.get(Part::RightShoulder),
    );
    let (Some(lw), Some(rw), Some(ls), Some(rs)) = joints else {
        return false;
    };
    (rw.is_above(head) && lw.is_below(ls)) || (lw.is_above(head) && rw.is_below(rs))
}

/// Both hands reaching out to the same side, between head and shoulder
/// height.
pub fn thriller(parts: &ConfidentParts<'_>, head: Point) -> bool {
    both_arms(parts).is_some_and(|(l, r)| {
        let level = |a: &Arm| a.wrist.is_below(head) && a.wrist.is_above(a.shoulder);
        let same_side = (l.wrist.is_left_of(head) && r.wrist.is_left_of(head))
            || (l.wrist.is_right_of(head) && r.wrist.is_right_of(head));
        level(&l) && level(&r) && same_side
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
