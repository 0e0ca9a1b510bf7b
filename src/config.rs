use anyhow::{anyhow, Result};
use serde::Deserialize;
use serde_json::Number;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_DIR: &str = "openpose_json/video10";
pub const DEFAULT_OUTPUT_FILE: &str = "animation_data.json";
pub const DEFAULT_FPS: u32 = 30;

pub const ENV_CONFIG: &str = "OPENPOSE_ANIM_CONFIG";
pub const ENV_INPUT_DIR: &str = "OPENPOSE_ANIM_INPUT_DIR";
pub const ENV_OUTPUT: &str = "OPENPOSE_ANIM_OUTPUT";
pub const ENV_FPS: &str = "OPENPOSE_ANIM_FPS";

#[derive(Debug, Deserialize, Default)]
struct ConverterConfigFile {
    input_dir: Option<PathBuf>,
    output_file: Option<PathBuf>,
    fps: Option<Number>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterConfig {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    pub fps: Number,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self::from_file(ConverterConfigFile::default())
    }
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub input_dir: Option<PathBuf>,
    pub output_file: Option<PathBuf>,
    pub fps: Option<Number>,
}

impl ConverterConfig {
    /// Defaults, then the TOML file (`config_path` or `OPENPOSE_ANIM_CONFIG`),
    /// then environment overrides.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with(config_path, ConfigOverrides::default())
    }

    /// `load` with command-line values applied last. Validation runs once, on
    /// the merged result, so a flag can replace a bad file or environment value.
    pub fn load_with(config_path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self> {
        let env_path = std::env::var(ENV_CONFIG)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        let file_cfg = match config_path.map(Path::to_path_buf).or(env_path) {
            Some(path) => Some(read_config_file(&path)?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.apply_overrides(overrides)?;
        Ok(cfg)
    }

    /// Command-line values win over everything else.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) -> Result<()> {
        if let Some(input_dir) = overrides.input_dir {
            self.input_dir = input_dir;
        }
        if let Some(output_file) = overrides.output_file {
            self.output_file = output_file;
        }
        if let Some(fps) = overrides.fps {
            self.fps = fps;
        }
        self.validate()
    }

    fn from_file(file: ConverterConfigFile) -> Self {
        Self {
            input_dir: file
                .input_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR)),
            output_file: file
                .output_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE)),
            fps: file.fps.unwrap_or_else(|| Number::from(DEFAULT_FPS)),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var(ENV_INPUT_DIR) {
            if !dir.trim().is_empty() {
                self.input_dir = PathBuf::from(dir);
            }
        }
        if let Ok(output) = std::env::var(ENV_OUTPUT) {
            if !output.trim().is_empty() {
                self.output_file = PathBuf::from(output);
            }
        }
        if let Ok(fps) = std::env::var(ENV_FPS) {
            if !fps.trim().is_empty() {
                self.fps = parse_fps(&fps)
                    .map_err(|_| anyhow!("{} must be a number, got {:?}", ENV_FPS, fps))?;
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(anyhow!("input directory must not be empty"));
        }
        if self.output_file.as_os_str().is_empty() {
            return Err(anyhow!("output file must not be empty"));
        }
        if self.output_file.is_dir() {
            return Err(anyhow!(
                "output file {} is a directory",
                self.output_file.display()
            ));
        }
        Ok(())
    }
}

/// Frame rate as an opaque JSON number: `30` stays an integer, `29.97` a decimal.
pub fn parse_fps(raw: &str) -> Result<Number> {
    raw.trim()
        .parse::<Number>()
        .map_err(|e| anyhow!("invalid frame rate {:?}: {}", raw, e))
}

fn read_config_file(path: &Path) -> Result<ConverterConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = toml::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
