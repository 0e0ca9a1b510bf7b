//! Pixel -> animation-space mapping.
//!
//! OpenPose reports image coordinates with y growing downwards. The exported
//! animation uses a virtual space centred on the bottom-middle of a 640x480
//! capture with y growing upwards.

use crate::frame::{Joint, JointKind};

use super::openpose::RawKeypoint;

/// Horizontal pixel mapped to x = 0.
pub const ORIGIN_X: f64 = 320.0;
/// Vertical pixel mapped to y = 0.
pub const ORIGIN_Y: f64 = 480.0;
/// Pixels per animation unit, both axes.
pub const SCALE: f64 = 500.0;

/// Keypoints at or below this confidence are treated as missing.
pub const CONFIDENCE_THRESHOLD: f64 = 0.1;

pub fn normalize_point(x: f64, y: f64) -> (f64, f64) {
    ((x - ORIGIN_X) / SCALE, (ORIGIN_Y - y) / SCALE)
}

pub fn is_confident(confidence: f64) -> bool {
    confidence > CONFIDENCE_THRESHOLD
}

/// Normalized joint for an accepted keypoint, `None` when below threshold.
pub(crate) fn accepted_joint(keypoint: &RawKeypoint, kind: JointKind) -> Option<Joint> {
    if !is_confident(keypoint.confidence) {
        return None;
    }
    let (x, y) = normalize_point(keypoint.x, keypoint.y);
    Some(Joint::new(x, y, keypoint.confidence, kind))
}
