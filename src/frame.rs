//! Per-frame output model.
//!
//! - `Joint`: one normalized 2D point with its confidence and kind
//! - `Keypoints`: joint name -> `Joint`, serialized in insertion order
//! - `FrameRecord`: one entry of the animation's frame list
//!
//! Records are immutable once appended to a converter; carry-forward reads them,
//! never rewrites them.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::skeleton::SIMPLIFIED_JOINTS;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JointKind {
    Body,
    Face,
}

/// A normalized joint position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Joint {
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
    #[serde(rename = "type")]
    pub kind: JointKind,
}

impl Joint {
    pub fn new(x: f64, y: f64, confidence: f64, kind: JointKind) -> Self {
        Self {
            x,
            y,
            confidence,
            kind,
        }
    }

    /// Placeholder for a body joint with no usable observation.
    pub fn zero_body() -> Self {
        Self::new(0.0, 0.0, 0.0, JointKind::Body)
    }
}

/// Joint name -> `Joint`, keeping insertion order.
///
/// Frames hold at most a few dozen entries, so lookups scan linearly.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Keypoints {
    entries: Vec<(String, Joint)>,
}

impl Keypoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every simplified body joint at zero confidence.
    pub fn zeroed_body() -> Self {
        let mut keypoints = Self::new();
        for (name, _) in SIMPLIFIED_JOINTS {
            keypoints.insert(name, Joint::zero_body());
        }
        keypoints
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, joint: Joint) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = joint,
            None => self.entries.push((name, joint)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Joint> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, joint)| joint)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Joint)> {
        self.entries.iter().map(|(name, joint)| (name.as_str(), joint))
    }
}

impl Serialize for Keypoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, joint) in &self.entries {
            map.serialize_entry(name, joint)?;
        }
        map.end()
    }
}

/// One frame of the exported animation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameRecord {
    /// 0-based position in sorted input order.
    #[serde(rename = "frame")]
    pub frame_index: usize,
    pub keypoints: Keypoints,
    pub has_face: bool,
}

impl FrameRecord {
    /// Record used when the very first frame carries nothing usable.
    pub fn zeroed(frame_index: usize) -> Self {
        Self {
            frame_index,
            keypoints: Keypoints::zeroed_body(),
            has_face: false,
        }
    }

    /// Copy of this record placed at another slot.
    pub fn repeated_at(&self, frame_index: usize) -> Self {
        Self {
            frame_index,
            ..self.clone()
        }
    }
}
