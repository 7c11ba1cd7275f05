/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use voicevtt::annotation::SpeakerModel;
use voicevtt::app_config::{Config, LogLevel};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.language, "en");
    assert!(config.speaker_models.is_empty());
    assert_eq!(config.segmentation.segment_length, 10.0);
    assert_eq!(config.segmentation.default_speaker, "Speaker1");
    assert_eq!(config.segmentation.display_max_chars, 70);
    assert_eq!(config.segmentation.hls_start_offset, "900000");
    assert_eq!(config.noise_gate_transition, 0.25);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.language = "  ".to_string();
    assert!(config.validate().is_err());
    config.language = "xyz-unknown".to_string();
    assert!(config.validate().is_ok(), "unknown languages only warn");
    config.language = "en".to_string();

    config.segmentation.segment_length = 0.0;
    assert!(config.validate().is_err());
    config.segmentation.segment_length = 6.0;

    config.segmentation.display_max_chars = 9;
    assert!(config.validate().is_err());
    config.segmentation.display_max_chars = 42;

    config.segmentation.default_speaker = String::new();
    assert!(config.validate().is_err());
    config.segmentation.default_speaker = "Narrator".to_string();

    config.segmentation.hls_start_offset = "90k".to_string();
    assert!(config.validate().is_err());
    config.segmentation.hls_start_offset = "0".to_string();

    config.speaker_models.push(SpeakerModel::new(" ", Some("m".into()), None));
    assert!(config.validate().is_err());
    config.speaker_models.clear();

    assert!(config.validate().is_ok());
}

/// Test that a partial file falls back to defaults
#[test]
fn test_from_file_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"language":"de","speaker_models":[{"speaker":"Ann","model":"voice-a"}],"segmentation":{"segment_length":6.0},"log_level":"debug"}"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.language, "de");
    assert_eq!(config.segmentation.segment_length, 6.0);
    assert_eq!(config.segmentation.display_max_chars, 70);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(config.speaker_model("Ann").and_then(|m| m.model.as_deref()), Some("voice-a"));
    assert!(config.speaker_model("Bob").is_none());
    Ok(())
}

/// Test that a missing file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());
    assert_eq!(created.language, "en");

    let mut changed = created.clone();
    changed.language = "fr".to_string();
    changed.save(&path)?;
    assert_eq!(Config::load_or_create(&path)?.language, "fr");
    Ok(())
}

#[test]
fn test_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    assert!(Config::from_file(temp_dir.path().join("missing.json")).is_err());
    Ok(())
}
