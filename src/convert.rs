//! Frame-by-frame conversion.
//!
//! `FrameConverter` folds decoded OpenPose frames into `FrameRecord`s. The only
//! state carried between frames is the last appended record, which supplies:
//! - body joints whose confidence is at or below the threshold
//! - the whole keypoint set when a frame has no detected person
//! - the whole record when a frame cannot be read or decoded
//!
//! Face landmarks are never carried forward for low confidence; they are simply
//! omitted from that frame.

use anyhow::{anyhow, Result};
use serde_json::Number;
use std::path::{Path, PathBuf};

use crate::document::AnimationDocument;
use crate::frame::{FrameRecord, Joint, JointKind, Keypoints};
use crate::ingest::normalize::accepted_joint;
use crate::ingest::{frame_files, read_frame, OpenPoseFrame, OpenPosePerson};
use crate::skeleton::{
    face_contour_name, nose_bridge_name, raw_joint_name, FACE_CONTOUR_INDICES,
    NOSE_BRIDGE_INDICES, REQUIRED_BODY_KEYPOINTS, SIMPLIFIED_JOINTS,
};

/// Progress is reported after every this many frames.
pub const PROGRESS_INTERVAL: usize = 50;

/// Outcome of a `convert` run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConversionReport {
    /// No `.json` frames were found; nothing was written.
    NoInput,
    Written {
        output: PathBuf,
        total_frames: usize,
        face_frames: usize,
        failed_frames: usize,
    },
}

/// Hooks into a `convert_with` run, called in this order:
/// `scanned` once, `frame_converted` per input file, `writing` once before the
/// output is created. `writing` is skipped when there is no input.
pub trait ConversionObserver {
    fn scanned(&mut self, _frames: usize) {}
    fn frame_converted(&mut self, _record: &FrameRecord) {}
    fn writing(&mut self, _output: &Path) {}
}

impl ConversionObserver for () {}

/// Sequential converter. Append frames in input order, then call `finish`.
#[derive(Debug, Default)]
pub struct FrameConverter {
    frames: Vec<FrameRecord>,
    failed_frames: usize,
    expected_frames: usize,
    progress_notices: usize,
}

impl FrameConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converter that reports progress against a known frame total.
    pub fn with_expected_frames(expected_frames: usize) -> Self {
        Self {
            expected_frames,
            ..Self::default()
        }
    }

    /// Read, decode and append one frame file.
    pub fn push_path(&mut self, path: &Path) {
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.push_frame(&source, read_frame(path));
    }

    /// Append the result of decoding one frame.
    ///
    /// A decode error, or an error while remapping the decoded frame, appends a
    /// copy of the previous record instead. Either way exactly one record is added.
    pub fn push_frame(&mut self, source: &str, decoded: Result<OpenPoseFrame>) {
        let frame_index = self.frames.len();
        match decoded.and_then(|frame| self.build_record(frame_index, &frame)) {
            Ok(record) => {
                self.frames.push(record);
                self.report_progress();
            }
            Err(e) => {
                log::error!("frame {} ({}): {:#}", frame_index, source, e);
                self.failed_frames += 1;
                let fallback = match self.frames.last() {
                    Some(previous) => previous.repeated_at(frame_index),
                    None => FrameRecord::zeroed(frame_index),
                };
                self.frames.push(fallback);
            }
        }
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn failed_frames(&self) -> usize {
        self.failed_frames
    }

    pub fn finish(self, fps: Number) -> AnimationDocument {
        AnimationDocument::new(self.frames, fps)
    }

    /// Number of progress notices emitted so far.
    pub fn progress_notices(&self) -> usize {
        self.progress_notices
    }

    /// Notice for every `PROGRESS_INTERVAL`th frame. Only converted frames report;
    /// a repeated frame logs its error instead.
    fn report_progress(&mut self) {
        let Some(record) = self.frames.last() else {
            return;
        };
        let processed = record.frame_index + 1;
        if processed % PROGRESS_INTERVAL != 0 {
            return;
        }
        let total = self.expected_frames.max(processed);
        log::info!("processed {}/{} frames", processed, total);
        if record.has_face {
            log::info!("  frame {} carries face data", record.frame_index);
        }
        self.progress_notices += 1;
    }

    fn build_record(&self, frame_index: usize, frame: &OpenPoseFrame) -> Result<FrameRecord> {
        let previous = self.frames.last();
        let Some(person) = frame.primary_person() else {
            let keypoints = previous
                .map(|record| record.keypoints.clone())
                .unwrap_or_else(Keypoints::zeroed_body);
            return Ok(FrameRecord {
                frame_index,
                keypoints,
                has_face: false,
            });
        };

        let mut keypoints = body_keypoints(person, previous.map(|record| &record.keypoints))?;
        let has_face = add_face_keypoints(person, &mut keypoints)?;
        Ok(FrameRecord {
            frame_index,
            keypoints,
            has_face,
        })
    }
}

/// The 19 simplified joints, falling back to `previous` for weak detections.
fn body_keypoints(person: &OpenPosePerson, previous: Option<&Keypoints>) -> Result<Keypoints> {
    let body = person.body_keypoints()?;
    if body.len() < REQUIRED_BODY_KEYPOINTS {
        return Err(anyhow!(
            "pose_keypoints_2d has {} keypoints, needs {}; first missing is {}",
            body.len(),
            REQUIRED_BODY_KEYPOINTS,
            raw_joint_name(body.len())
        ));
    }

    let mut keypoints = Keypoints::new();
    for (name, index) in SIMPLIFIED_JOINTS {
        let joint = accepted_joint(&body[index], JointKind::Body)
            .or_else(|| previous.and_then(|prev| prev.get(name).copied()))
            .unwrap_or_else(Joint::zero_body);
        keypoints.insert(name, joint);
    }
    Ok(keypoints)
}

/// Adds accepted face landmarks. Returns whether the person had face data at all.
fn add_face_keypoints(person: &OpenPosePerson, keypoints: &mut Keypoints) -> Result<bool> {
    let Some(face) = person.face_keypoints()? else {
        return Ok(false);
    };

    let slots = FACE_CONTOUR_INDICES
        .iter()
        .enumerate()
        .map(|(slot, index)| (face_contour_name(slot), *index))
        .chain(
            NOSE_BRIDGE_INDICES
                .iter()
                .enumerate()
                .map(|(slot, index)| (nose_bridge_name(slot), *index)),
        );

    for (name, index) in slots {
        if let Some(joint) = face
            .get(index)
            .and_then(|keypoint| accepted_joint(keypoint, JointKind::Face))
        {
            keypoints.insert(name, joint);
        }
    }
    Ok(true)
}

/// Convert every `.json` frame in `input_dir` into one animation file.
///
/// Returns `ConversionReport::NoInput` without touching `output_file` when the
/// directory is missing or holds no frames. Per-frame failures never abort the
/// run; only failing to write the output does.
pub fn convert(
    input_dir: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
    fps: Number,
) -> Result<ConversionReport> {
    convert_with(input_dir, output_file, fps, &mut ())
}

/// `convert` with progress hooks.
pub fn convert_with<O: ConversionObserver + ?Sized>(
    input_dir: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
    fps: Number,
    observer: &mut O,
) -> Result<ConversionReport> {
    let input_dir = input_dir.as_ref();
    let output_file = output_file.as_ref();

    log::info!("reading OpenPose frames from {}", input_dir.display());
    let files = frame_files(input_dir)?;
    observer.scanned(files.len());
    if files.is_empty() {
        log::warn!("no .json frames found in {}", input_dir.display());
        let report = ConversionReport::NoInput;
        log_report(&report);
        return Ok(report);
    }
    log::info!("found {} frames", files.len());

    let converter = convert_files(&files, observer);
    let failed_frames = converter.failed_frames();
    let document = converter.finish(fps);
    observer.writing(output_file);
    document.write_pretty(output_file)?;

    let report = ConversionReport::Written {
        output: output_file.to_path_buf(),
        total_frames: document.metadata.total_frames,
        face_frames: document.face_frames(),
        failed_frames,
    };
    log_report(&report);
    Ok(report)
}

/// Run the converter over an already enumerated, ordered file list.
pub fn convert_files<O: ConversionObserver + ?Sized>(
    files: &[PathBuf],
    observer: &mut O,
) -> FrameConverter {
    let mut converter = FrameConverter::with_expected_frames(files.len());
    for path in files {
        converter.push_path(path);
        if let Some(record) = converter.frames().last() {
            observer.frame_converted(record);
        }
    }
    converter
}

fn log_report(report: &ConversionReport) {
    match report {
        ConversionReport::NoInput => log::warn!("no animation written"),
        ConversionReport::Written {
            output,
            total_frames,
            face_frames,
            failed_frames,
        } => {
            log::info!("animation written to {}", output.display());
            log::info!("total frames: {}", total_frames);
            if *face_frames > 0 {
                log::info!("frames with face data: {}", face_frames);
            }
            if *failed_frames > 0 {
                log::warn!("frames repeated after read errors: {}", failed_frames);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_json(overrides: &[(usize, [f64; 3])]) -> String {
        let mut flat = vec![0.0; 25 * 3];
        for (index, triple) in overrides {
            flat[index * 3..index * 3 + 3].copy_from_slice(triple);
        }
        serde_json::to_string(&flat).unwrap()
    }

    fn decode(raw: &str) -> Result<OpenPoseFrame> {
        OpenPoseFrame::from_json(raw)
    }

    fn person_frame(body: &str) -> Result<OpenPoseFrame> {
        decode(&format!(r#"{{"people": [{{"pose_keypoints_2d": {body}}}]}}"#))
    }

    #[test]
    fn confident_mid_hip_normalizes_to_origin() {
        let mut converter = FrameConverter::new();
        converter.push_frame("f0", person_frame(&body_json(&[(8, [320.0, 480.0, 0.9])])));

        let record = &converter.frames()[0];
        assert_eq!(
            record.keypoints.get("MidHip"),
            Some(&Joint::new(0.0, 0.0, 0.9, JointKind::Body))
        );
        assert_eq!(record.keypoints.len(), 19);
        assert!(!record.has_face);
    }

    #[test]
    fn weak_joint_carries_forward_from_previous_frame() {
        let mut converter = FrameConverter::new();
        converter.push_frame("f0", person_frame(&body_json(&[(4, [820.0, 480.0, 0.8])])));
        converter.push_frame("f1", person_frame(&body_json(&[(4, [0.0, 0.0, 0.1])])));

        let carried = converter.frames()[1].keypoints.get("RWrist").copied();
        assert_eq!(carried, Some(Joint::new(1.0, 0.0, 0.8, JointKind::Body)));
    }

    #[test]
    fn weak_joint_without_history_is_zero() {
        let mut converter = FrameConverter::new();
        converter.push_frame("f0", person_frame(&body_json(&[(0, [100.0, 100.0, 0.05])])));
        assert_eq!(
            converter.frames()[0].keypoints.get("Head"),
            Some(&Joint::zero_body())
        );
    }

    #[test]
    fn empty_people_first_frame_is_zeroed() {
        let mut converter = FrameConverter::new();
        converter.push_frame("f0", decode(r#"{"people": []}"#));

        let record = &converter.frames()[0];
        assert_eq!(record, &FrameRecord::zeroed(0));
    }

    #[test]
    fn empty_people_copies_previous_keypoints_but_not_face_flag() {
        let face = serde_json::to_string(&vec![320.0, 480.0, 0.9].repeat(70)).unwrap();
        let mut converter = FrameConverter::new();
        converter.push_frame(
            "f0",
            decode(&format!(
                r#"{{"people": [{{"pose_keypoints_2d": {}, "face_keypoints_2d": {}}}]}}"#,
                body_json(&[]),
                face
            )),
        );
        converter.push_frame("f1", decode(r#"{"people": []}"#));

        let frames = converter.frames();
        assert!(frames[0].has_face);
        assert!(!frames[1].has_face);
        assert_eq!(frames[1].frame_index, 1);
        assert_eq!(frames[1].keypoints, frames[0].keypoints);
    }

    #[test]
    fn decode_failure_repeats_previous_record() {
        let face = serde_json::to_string(&vec![320.0, 480.0, 0.9].repeat(70)).unwrap();
        let mut converter = FrameConverter::new();
        converter.push_frame(
            "f0",
            decode(&format!(
                r#"{{"people": [{{"pose_keypoints_2d": {}, "face_keypoints_2d": {}}}]}}"#,
                body_json(&[(1, [300.0, 200.0, 0.7])]),
                face
            )),
        );
        converter.push_frame("f1", Err(anyhow!("truncated file")));

        let frames = converter.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], frames[0].repeated_at(1));
        assert_eq!(converter.failed_frames(), 1);
    }

    #[test]
    fn array_root_reads_as_empty_frame() {
        let face = serde_json::to_string(&vec![320.0, 480.0, 0.9].repeat(70)).unwrap();
        let mut converter = FrameConverter::new();
        converter.push_frame(
            "f0",
            decode(&format!(
                r#"{{"people": [{{"pose_keypoints_2d": {}, "face_keypoints_2d": {}}}]}}"#,
                body_json(&[]),
                face
            )),
        );
        converter.push_frame("f1", decode("[]"));

        let frames = converter.frames();
        assert_eq!(converter.failed_frames(), 0);
        assert!(!frames[1].has_face);
        assert_eq!(frames[1].keypoints, frames[0].keypoints);
    }

    #[test]
    fn first_frame_failure_is_zeroed() {
        let mut converter = FrameConverter::new();
        converter.push_frame("f0", Err(anyhow!("unreadable")));
        assert_eq!(converter.frames()[0], FrameRecord::zeroed(0));
    }

    #[test]
    fn short_body_array_counts_as_failure() {
        let mut converter = FrameConverter::new();
        converter.push_frame("f0", person_frame("[320, 480, 0.9]"));
        assert_eq!(converter.failed_frames(), 1);
        assert_eq!(converter.frames()[0], FrameRecord::zeroed(0));
    }

    #[test]
    fn face_contour_is_remapped_and_short_arrays_skip_nose() {
        // 30 face triples: contour indices all present, nose indices 30..35 out of range.
        let mut face = Vec::new();
        for i in 0..30 {
            face.extend_from_slice(&[320.0 + i as f64, 480.0, 0.9]);
        }
        // raw index 5 (Face_5) below threshold
        face[5 * 3 + 2] = 0.1;
        let raw = format!(
            r#"{{"people": [{{"pose_keypoints_2d": {}, "face_keypoints_2d": {}}}]}}"#,
            body_json(&[]),
            serde_json::to_string(&face).unwrap()
        );

        let mut converter = FrameConverter::new();
        converter.push_frame("f0", decode(&raw));
        let record = &converter.frames()[0];

        assert!(record.has_face);
        assert!(!record.keypoints.contains("Face_5"));
        // Face_17 reads raw index 26.
        assert_eq!(
            record.keypoints.get("Face_17"),
            Some(&Joint::new(26.0 / 500.0, 0.0, 0.9, JointKind::Face))
        );
        for slot in 0..3 {
            assert!(record.keypoints.contains(&format!("Face_nose_{slot}")));
        }
        for slot in 3..9 {
            assert!(!record.keypoints.contains(&format!("Face_nose_{slot}")));
        }
        assert_eq!(record.keypoints.len(), 19 + 26 + 3);
    }

    #[test]
    fn empty_face_array_means_no_face() {
        let raw = format!(
            r#"{{"people": [{{"pose_keypoints_2d": {}, "face_keypoints_2d": []}}]}}"#,
            body_json(&[])
        );
        let mut converter = FrameConverter::new();
        converter.push_frame("f0", decode(&raw));
        assert!(!converter.frames()[0].has_face);
    }

    #[test]
    fn progress_notice_skips_repeated_frames() {
        let mut converter = FrameConverter::with_expected_frames(100);
        for _ in 0..49 {
            converter.push_frame("ok", decode(r#"{"people": []}"#));
        }
        converter.push_frame("bad", Err(anyhow!("bad frame")));
        assert_eq!(converter.frames().len(), 50);
        assert_eq!(converter.progress_notices(), 0);

        for _ in 0..50 {
            converter.push_frame("ok", decode(r#"{"people": []}"#));
        }
        assert_eq!(converter.progress_notices(), 1);
    }

    #[test]
    fn short_body_error_names_first_missing_joint() {
        let person = decode(r#"{"people": [{"pose_keypoints_2d": [1, 2, 0.5, 3, 4, 0.5, 5, 6, 0.5]}]}"#)
            .unwrap()
            .people
            .remove(0);
        let err = body_keypoints(&person, None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "pose_keypoints_2d has 3 keypoints, needs 19; first missing is RElbow"
        );
    }

    #[test]
    fn frame_index_is_input_position() {
        let mut converter = FrameConverter::with_expected_frames(120);
        for i in 0..120 {
            if i % 7 == 0 {
                converter.push_frame("bad", Err(anyhow!("bad frame")));
            } else {
                converter.push_frame("ok", decode(r#"{"people": []}"#));
            }
        }
        for (position, record) in converter.frames().iter().enumerate() {
            assert_eq!(record.frame_index, position);
        }
    }
}
