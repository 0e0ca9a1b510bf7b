//! Fixed skeleton tables.
//!
//! Everything the converter knows about topology lives here:
//! - `BODY_25_JOINTS`: raw OpenPose BODY_25 keypoint order
//! - `SIMPLIFIED_JOINTS`: the 19 joints written to every frame, with their raw index
//! - `BODY_BONES`: the 19-edge body skeleton
//! - `FACE_CONTOUR_INDICES` / `NOSE_BRIDGE_INDICES`: face landmark remap lists
//!
//! The tables are never mutated and never extended at runtime.

use serde::Serialize;

/// Raw OpenPose BODY_25 keypoint order. Indices 19..25 (feet) are decoded but unused.
pub const BODY_25_JOINTS: [&str; 25] = [
    "Nose",
    "Neck",
    "RShoulder",
    "RElbow",
    "RWrist",
    "LShoulder",
    "LElbow",
    "LWrist",
    "MidHip",
    "RHip",
    "RKnee",
    "RAnkle",
    "LHip",
    "LKnee",
    "LAnkle",
    "REye",
    "LEye",
    "REar",
    "LEar",
    "LBigToe",
    "LSmallToe",
    "LHeel",
    "RBigToe",
    "RSmallToe",
    "RHeel",
];

/// Simplified joint set in output order, paired with the BODY_25 index it reads from.
/// Raw `Nose` is exported as `Head`.
pub const SIMPLIFIED_JOINTS: [(&str, usize); 19] = [
    ("Head", 0),
    ("Neck", 1),
    ("RShoulder", 2),
    ("RElbow", 3),
    ("RWrist", 4),
    ("LShoulder", 5),
    ("LElbow", 6),
    ("LWrist", 7),
    ("MidHip", 8),
    ("RHip", 9),
    ("RKnee", 10),
    ("RAnkle", 11),
    ("LHip", 12),
    ("LKnee", 13),
    ("LAnkle", 14),
    ("REye", 15),
    ("LEye", 16),
    ("REar", 17),
    ("LEar", 18),
];

/// Number of body triples a frame must carry to cover every simplified joint.
pub const REQUIRED_BODY_KEYPOINTS: usize = 19;

pub const BODY_BONES: [(&str, &str); 19] = [
    // torso and limbs
    ("Neck", "Head"),
    ("Neck", "RShoulder"),
    ("RShoulder", "RElbow"),
    ("RElbow", "RWrist"),
    ("Neck", "LShoulder"),
    ("LShoulder", "LElbow"),
    ("LElbow", "LWrist"),
    ("Neck", "MidHip"),
    ("MidHip", "RHip"),
    ("RHip", "RKnee"),
    ("RKnee", "RAnkle"),
    ("MidHip", "LHip"),
    ("LHip", "LKnee"),
    ("LKnee", "LAnkle"),
    // head
    ("Head", "REye"),
    ("Head", "LEye"),
    ("REye", "REar"),
    ("LEye", "LEar"),
    ("REye", "LEye"),
];

/// Raw face keypoint indices emitted as `Face_0..Face_26`.
/// Jawline left to right, then the brows right to left, so the ring closes.
pub const FACE_CONTOUR_INDICES: [usize; 27] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 26, 25, 24, 23, 22, 21, 20, 19, 18,
    17,
];

/// Raw face keypoint indices emitted as `Face_nose_0..Face_nose_8`.
pub const NOSE_BRIDGE_INDICES: [usize; 9] = [27, 28, 29, 30, 31, 32, 33, 34, 35];

/// An edge of the exported rig, serialized as a two-element array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoneConnection(pub String, pub String);

impl BoneConnection {
    fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self(a.into(), b.into())
    }
}

pub fn face_contour_name(slot: usize) -> String {
    format!("Face_{slot}")
}

pub fn nose_bridge_name(slot: usize) -> String {
    format!("Face_nose_{slot}")
}

/// Raw BODY_25 name for an index, for diagnostics.
pub fn raw_joint_name(index: usize) -> &'static str {
    BODY_25_JOINTS.get(index).copied().unwrap_or("?")
}

/// Simplified joint names in declared order.
pub fn joint_names() -> Vec<&'static str> {
    SIMPLIFIED_JOINTS.iter().map(|(name, _)| *name).collect()
}

/// Body skeleton, then the closed face contour ring, then the open nose chain.
pub fn bone_connections() -> Vec<BoneConnection> {
    let contour = FACE_CONTOUR_INDICES.len();
    let nose = NOSE_BRIDGE_INDICES.len();

    let body = BODY_BONES.iter().map(|(a, b)| BoneConnection::new(*a, *b));
    let ring = (0..contour)
        .map(|i| BoneConnection::new(face_contour_name(i), face_contour_name((i + 1) % contour)));
    let chain = (0..nose - 1)
        .map(|i| BoneConnection::new(nose_bridge_name(i), nose_bridge_name(i + 1)));

    body.chain(ring).chain(chain).collect()
}
