//! openpose_convert - build one 2D animation file from per-frame OpenPose JSON.
//!
//! This tool:
//! 1. Lists `*.json` frames in the input directory (sorted by name)
//! 2. Remaps the first person's keypoints to the simplified joint set
//! 3. Writes metadata and all frames to a single pretty-printed JSON file
//!
//! An empty or missing input directory is not an error: nothing is written and
//! the tool exits successfully.

use anyhow::Result;
use clap::Parser;
use serde_json::Number;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use openpose_anim::config::{parse_fps, ConfigOverrides, ENV_CONFIG};
use openpose_anim::{convert_with, ConversionObserver, ConverterConfig, FrameRecord};

#[path = "../ui.rs"]
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "openpose_convert",
    version,
    about = "Convert per-frame OpenPose JSON into a single 2D animation file"
)]
struct Args {
    /// Directory of OpenPose `*_keypoints.json` frames
    #[arg(long, short = 'i', value_name = "DIR")]
    input_dir: Option<PathBuf>,

    /// Animation file to create or overwrite
    #[arg(long, short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,

    /// Frame rate recorded in the animation metadata
    #[arg(long, value_name = "NUMBER", value_parser = parse_fps)]
    fps: Option<Number>,

    /// TOML config file with input_dir, output_file and fps
    #[arg(long, value_name = "PATH", env = ENV_CONFIG)]
    config: Option<PathBuf>,

    /// UI mode for stderr progress
    #[arg(long, value_enum, default_value_t = ui::UiMode::Auto)]
    ui: ui::UiMode,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let ui = ui::Ui::new(args.ui, std::io::stderr().is_terminal());

    let cfg = ConverterConfig::load_with(
        args.config.as_deref(),
        ConfigOverrides {
            input_dir: args.input_dir,
            output_file: args.output,
            fps: args.fps,
        },
    )?;

    let mut run = StagedRun::new(&ui);
    convert_with(&cfg.input_dir, &cfg.output_file, cfg.fps.clone(), &mut run)?;
    Ok(())
}

/// Maps conversion hooks onto UI stages: scan, convert, write.
struct StagedRun<'a> {
    ui: &'a ui::Ui,
    stage: Option<ui::StageGuard>,
    progress: Option<ui::FrameProgress>,
}

impl<'a> StagedRun<'a> {
    fn new(ui: &'a ui::Ui) -> Self {
        Self {
            ui,
            stage: Some(ui.stage("Scan input")),
            progress: None,
        }
    }

    fn next_stage(&mut self, name: &str) {
        // Finish the current stage before announcing the next one.
        self.stage.take();
        self.stage = Some(self.ui.stage(name));
    }
}

impl ConversionObserver for StagedRun<'_> {
    fn scanned(&mut self, frames: usize) {
        if let Some(stage) = self.stage.as_mut() {
            stage.set_detail(format!("{frames} frames"));
        }
        self.stage.take();
        if frames > 0 {
            self.next_stage("Convert frames");
            self.progress = Some(self.ui.frames(frames));
        }
    }

    fn frame_converted(&mut self, _record: &FrameRecord) {
        if let Some(progress) = &self.progress {
            progress.inc();
        }
    }

    fn writing(&mut self, _output: &Path) {
        self.progress.take();
        self.next_stage("Write animation");
    }
}
