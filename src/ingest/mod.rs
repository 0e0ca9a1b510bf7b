//! OpenPose input side.
//!
//! - `dir`: enumerates per-frame `.json` files in stable order
//! - `openpose`: decodes one OpenPose frame document
//! - `normalize`: maps pixel coordinates into animation space
//!
//! The ingestion layer only reads. It never writes next to the input files and
//! holds at most one decoded frame at a time.

pub mod dir;
pub mod normalize;
pub mod openpose;

pub use dir::frame_files;
pub use normalize::{is_confident, normalize_point, CONFIDENCE_THRESHOLD};
pub use openpose::{read_frame, OpenPoseFrame, OpenPosePerson, RawKeypoint};
