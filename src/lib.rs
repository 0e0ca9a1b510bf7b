//! OpenPose → 2D animation converter
//!
//! This crate turns a directory of per-frame OpenPose JSON files into a single
//! animation document for a downstream 3D authoring tool.
//!
//! # Pipeline
//!
//! 1. **Enumerate**: `*.json` files in the input directory, sorted by name.
//! 2. **Remap**: the first detected person's BODY_25 keypoints become the 19-joint
//!    simplified set; face keypoints become a contour ring and a nose chain.
//! 3. **Normalize**: pixel coordinates map into a virtual space with y up.
//! 4. **Fall back**: low-confidence body joints, empty frames and unreadable
//!    frames reuse the previous frame.
//! 5. **Write**: metadata plus every frame, pretty-printed, in one file.
//!
//! # Module Structure
//!
//! - `skeleton`: fixed joint, bone and face remap tables
//! - `frame`: `Joint`, `Keypoints`, `FrameRecord`
//! - `ingest`: file discovery, OpenPose decoding, coordinate normalization
//! - `convert`: `FrameConverter` and the `convert` entry point
//! - `document`: `AnimationDocument` assembly and output
//! - `config`: defaults, TOML config file, environment overrides

pub mod config;
pub mod convert;
pub mod document;
pub mod frame;
pub mod ingest;
pub mod skeleton;

pub use config::ConverterConfig;
pub use convert::{
    convert, convert_files, convert_with, ConversionObserver, ConversionReport, FrameConverter,
};
pub use document::{AnimationDocument, AnimationMetadata};
pub use frame::{FrameRecord, Joint, JointKind, Keypoints};
pub use ingest::{OpenPoseFrame, OpenPosePerson, RawKeypoint};
pub use skeleton::BoneConnection;
