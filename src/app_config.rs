use anyhow::{anyhow, Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::annotation::SpeakerModel;
use crate::renderer::DEFAULT_MPEGTS_OFFSET;
use crate::segmentation::{DEFAULT_MAX_DISPLAY_CHARS, DEFAULT_SEGMENT_LENGTH, DEFAULT_SPEAKER};

/// Application configuration module
/// This module handles loading, validating and saving the settings shared by
/// every command: synthesis language, speaker models and segmentation knobs.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Language of the subtitles (ISO 639-1 or 639-2)
    pub language: String,

    /// Voice model and default style per speaker
    #[serde(default)]
    pub speaker_models: Vec<SpeakerModel>,

    /// Segmentation config
    #[serde(default)]
    pub segmentation: SegmentationConfig,

    /// Noise-gate ramp length in seconds
    #[serde(default = "default_noise_gate_transition")]
    pub noise_gate_transition: f64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Settings for the segmenters and the HLS output
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SegmentationConfig {
    // @field: Target HLS segment length in seconds
    #[serde(default = "default_segment_length")]
    pub segment_length: f64,

    // @field: Voice assumed for cues without a voice tag
    #[serde(default = "default_speaker")]
    pub default_speaker: String,

    // @field: Longest plain-text cue the display re-flow leaves whole
    #[serde(default = "default_display_max_chars")]
    pub display_max_chars: usize,

    // @field: MPEG-TS timestamp matching LOCAL 00:00:00.000
    #[serde(default = "default_hls_start_offset")]
    pub hls_start_offset: String,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            segment_length: default_segment_length(),
            default_speaker: default_speaker(),
            display_max_chars: default_display_max_chars(),
            hls_start_offset: default_hls_start_offset(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_segment_length() -> f64 {
    DEFAULT_SEGMENT_LENGTH
}

fn default_speaker() -> String {
    DEFAULT_SPEAKER.to_string()
}

fn default_display_max_chars() -> usize {
    DEFAULT_MAX_DISPLAY_CHARS
}

fn default_hls_start_offset() -> String {
    DEFAULT_MPEGTS_OFFSET.to_string()
}

fn default_noise_gate_transition() -> f64 {
    0.25
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(anyhow!("Language must not be empty"));
        }
        if !crate::language_utils::is_valid_language(&self.language) {
            warn!("Unrecognised language code '{}', it will be passed through as is", self.language);
        }

        let segmentation = &self.segmentation;
        if !segmentation.segment_length.is_finite() || segmentation.segment_length <= 0.0 {
            return Err(anyhow!(
                "Segment length must be a positive number of seconds, got {}",
                segmentation.segment_length
            ));
        }
        if segmentation.default_speaker.trim().is_empty() {
            return Err(anyhow!("Default speaker must not be empty"));
        }
        if segmentation.display_max_chars < 10 {
            return Err(anyhow!(
                "Display limit must be at least 10 characters, got {}",
                segmentation.display_max_chars
            ));
        }
        if segmentation.hls_start_offset.is_empty()
            || !segmentation.hls_start_offset.chars().all(|c| c.is_ascii_digit())
        {
            return Err(anyhow!("HLS start offset must be a decimal MPEG-TS timestamp"));
        }

        if let Some(model) = self.speaker_models.iter().find(|m| m.speaker.trim().is_empty()) {
            return Err(anyhow!("Speaker model {:?} has an empty speaker name", model.model));
        }

        if !self.noise_gate_transition.is_finite() || self.noise_gate_transition < 0.0 {
            return Err(anyhow!("Noise-gate transition must not be negative"));
        }

        Ok(())
    }

    /// Load a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let config: Config =
            serde_json::from_reader(reader).context(format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json).context(format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Load the configuration, writing the defaults first if the file is missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        warn!("Config file not found at {:?}, creating default config.", path);
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Model assignment for a speaker, if configured
    pub fn speaker_model(&self, speaker: &str) -> Option<&SpeakerModel> {
        self.speaker_models.iter().find(|m| m.speaker == speaker)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: "en".to_string(),
            speaker_models: Vec::new(),
            segmentation: SegmentationConfig::default(),
            noise_gate_transition: default_noise_gate_transition(),
            log_level: LogLevel::default(),
        }
    }
}
