use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use serde_json::Number;
use tempfile::NamedTempFile;

use openpose_anim::config::{ConfigOverrides, ConverterConfig};

static ENV_LOCK: Mutex<()> = Mutex::new(());

fn clear_env() {
    for key in [
        "OPENPOSE_ANIM_CONFIG",
        "OPENPOSE_ANIM_INPUT_DIR",
        "OPENPOSE_ANIM_OUTPUT",
        "OPENPOSE_ANIM_FPS",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn loads_defaults_without_file_or_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let cfg = ConverterConfig::load(None).expect("load config");
    assert_eq!(cfg, ConverterConfig::default());
}

#[test]
fn loads_config_from_file_and_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let mut file = NamedTempFile::new().expect("temp config");
    file.write_all(
        br#"
input_dir = "captures/video3"
output_file = "video3_anim.json"
fps = 25
"#,
    )
    .expect("write config");

    std::env::set_var("OPENPOSE_ANIM_CONFIG", file.path());
    std::env::set_var("OPENPOSE_ANIM_FPS", "59.94");

    let cfg = ConverterConfig::load(None).expect("load config");
    assert_eq!(cfg.input_dir, PathBuf::from("captures/video3"));
    assert_eq!(cfg.output_file, PathBuf::from("video3_anim.json"));
    assert_eq!(cfg.fps.to_string(), "59.94");

    std::env::set_var("OPENPOSE_ANIM_OUTPUT", "override.json");
    std::env::remove_var("OPENPOSE_ANIM_FPS");
    let cfg = ConverterConfig::load(Some(file.path())).expect("load config");
    assert_eq!(cfg.output_file, PathBuf::from("override.json"));
    assert_eq!(cfg.fps, Number::from(25));

    clear_env();
}

#[test]
fn rejects_non_numeric_fps() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    std::env::set_var("OPENPOSE_ANIM_FPS", "thirty");
    let err = ConverterConfig::load(None).unwrap_err();
    assert!(err.to_string().contains("OPENPOSE_ANIM_FPS"));

    clear_env();
}

#[test]
fn rejects_unreadable_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("missing.toml");
    let err = ConverterConfig::load(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("missing.toml"));
}

#[test]
fn command_line_output_replaces_directory_from_env() {
    let _guard = ENV_LOCK.lock().unwrap();
    clear_env();

    let dir = tempfile::tempdir().expect("temp dir");
    std::env::set_var("OPENPOSE_ANIM_OUTPUT", dir.path());
    assert!(ConverterConfig::load(None).is_err());

    let target = dir.path().join("ok.json");
    let cfg = ConverterConfig::load_with(
        None,
        ConfigOverrides {
            output_file: Some(target.clone()),
            ..ConfigOverrides::default()
        },
    )
    .expect("override wins");
    assert_eq!(cfg.output_file, target);

    clear_env();
}
