use super::*;

#[test]
fn defaults_are_valid() {
    let cfg = EngineConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.target_height, 1080);
    assert!(cfg.overwrite);
}

#[test]
fn partial_json_falls_back_to_defaults() {
    let cfg: EngineConfig = serde_json::from_str(r#"{ "target_height": 720 }"#).unwrap();
    assert_eq!(cfg.target_height, 720);
    assert_eq!(cfg.chunk_size, EngineConfig::default().chunk_size);
    assert_eq!(cfg.music_dir, EngineConfig::default().music_dir);
}

#[test]
fn env_overrides_replace_directories() {
    let cfg = EngineConfig::default().with_env_overrides(|key| match key {
        ENV_OUTPUT_DIR => Some("/tmp/out".to_string()),
        ENV_MUSIC_DIR => Some(String::new()),
        _ => None,
    });
    assert_eq!(cfg.output_dir, PathBuf::from("/tmp/out"));
    assert_eq!(cfg.music_dir, EngineConfig::default().music_dir);
}

#[test]
fn validation_catches_bad_values() {
    let mut cfg = EngineConfig {
        target_height: 0,
        ..EngineConfig::default()
    };
    assert!(cfg.validate().is_err());

    cfg.target_height = 1080;
    cfg.chunk_size = 0;
    assert!(cfg.validate().is_err());

    cfg.chunk_size = 8;
    cfg.threads = Some(0);
    assert!(cfg.validate().is_err());
}

#[test]
fn output_path_requires_plain_file_name() {
    let cfg = EngineConfig::default();
    assert_eq!(
        cfg.output_path("promo.mp4").unwrap(),
        cfg.output_dir.join("promo.mp4")
    );
    assert!(cfg.output_path("").is_err());
    assert!(cfg.output_path("../promo.mp4").is_err());
    assert!(cfg.output_path("nested/promo.mp4").is_err());
}

#[test]
fn missing_config_file_is_invalid_input() {
    let err = EngineConfig::from_json_file(Path::new("definitely/not/here.json")).unwrap_err();
    assert!(matches!(err, ReelError::InvalidInput(_)));
}
