//! OpenPose per-frame JSON decoding.
//!
//! Only the fields the converter reads are modelled; `version`, `person_id`,
//! hand and 3D arrays are ignored by serde.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// One decoded `*_keypoints.json` document.
#[derive(Debug, Default, Deserialize)]
pub struct OpenPoseFrame {
    #[serde(default)]
    pub people: Vec<OpenPosePerson>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OpenPosePerson {
    #[serde(default)]
    pub pose_keypoints_2d: Option<Vec<f64>>,
    #[serde(default)]
    pub face_keypoints_2d: Option<Vec<f64>>,
}

/// One (x, y, confidence) triple in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawKeypoint {
    pub x: f64,
    pub y: f64,
    pub confidence: f64,
}

impl OpenPoseFrame {
    /// Decode a frame document.
    ///
    /// An array or string root carries no `people` and reads as an empty frame;
    /// numbers, booleans and `null` are rejected.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        match value {
            Value::Object(_) => Ok(serde_json::from_value(value)?),
            Value::Array(_) | Value::String(_) => Ok(Self::default()),
            other => Err(anyhow!("frame root must be an object, got {}", other)),
        }
    }

    /// The person the converter tracks. Additional detections are ignored.
    pub fn primary_person(&self) -> Option<&OpenPosePerson> {
        self.people.first()
    }
}

impl OpenPosePerson {
    pub fn body_keypoints(&self) -> Result<Vec<RawKeypoint>> {
        let flat = self
            .pose_keypoints_2d
            .as_deref()
            .ok_or_else(|| anyhow!("person has no pose_keypoints_2d"))?;
        triples(flat, "pose_keypoints_2d")
    }

    /// Face keypoints, `None` when the array is absent or empty.
    pub fn face_keypoints(&self) -> Result<Option<Vec<RawKeypoint>>> {
        match self.face_keypoints_2d.as_deref() {
            Some(flat) if !flat.is_empty() => Ok(Some(triples(flat, "face_keypoints_2d")?)),
            _ => Ok(None),
        }
    }
}

pub fn read_frame(path: &Path) -> Result<OpenPoseFrame> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read {}: {}", path.display(), e))?;
    OpenPoseFrame::from_json(&raw).map_err(|e| anyhow!("invalid frame {}: {}", path.display(), e))
}

fn triples(flat: &[f64], field: &str) -> Result<Vec<RawKeypoint>> {
    if flat.len() % 3 != 0 {
        return Err(anyhow!(
            "{} length {} is not a multiple of 3",
            field,
            flat.len()
        ));
    }
    Ok(flat
        .chunks_exact(3)
        .map(|t| RawKeypoint {
            x: t[0],
            y: t[1],
            confidence: t[2],
        })
        .collect())
}
