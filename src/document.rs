//! Consolidated animation document.

use anyhow::{anyhow, Result};
use serde::Serialize;
use serde_json::Number;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::frame::FrameRecord;
use crate::skeleton::{bone_connections, joint_names, BoneConnection};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimationMetadata {
    pub total_frames: usize,
    /// Written back exactly as supplied.
    pub fps: Number,
    pub joints: Vec<&'static str>,
    pub bone_connections: Vec<BoneConnection>,
    pub has_face_data: bool,
}

/// The single output file: metadata followed by every frame in input order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnimationDocument {
    pub metadata: AnimationMetadata,
    pub frames: Vec<FrameRecord>,
}

impl AnimationDocument {
    pub fn new(frames: Vec<FrameRecord>, fps: Number) -> Self {
        let metadata = AnimationMetadata {
            total_frames: frames.len(),
            fps,
            joints: joint_names(),
            bone_connections: bone_connections(),
            has_face_data: frames.iter().any(|frame| frame.has_face),
        };
        Self { metadata, frames }
    }

    pub fn face_frames(&self) -> usize {
        self.frames.iter().filter(|frame| frame.has_face).count()
    }

    /// Pretty JSON with 2-space indentation.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Create or overwrite `path` with the pretty-printed document.
    pub fn write_pretty(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|e| anyhow!("failed to create {}: {}", path.display(), e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| anyhow!("failed to write {}: {}", path.display(), e))?;
        writer
            .flush()
            .map_err(|e| anyhow!("failed to write {}: {}", path.display(), e))?;
        Ok(())
    }
}
