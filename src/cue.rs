use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::FormatError;

// @module: Cue and segment data model

// @struct: Single timed subtitle cue
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cue {
    // @field: Optional cue identifier (empty when absent)
    #[serde(default)]
    pub identifier: String,

    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Cue payload, may contain inline markup
    pub text: String,

    // @field: Cue settings following the end timestamp
    #[serde(default)]
    pub styles: String,
}

impl Cue {
    /// Creates a new cue without identifier or settings
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Cue {
            identifier: String::new(),
            start,
            end,
            text: text.into(),
            styles: String::new(),
        }
    }

    // @creates: Cue sharing identifier and settings with `self`
    pub fn derive(&self, start: f64, end: f64, text: impl Into<String>) -> Self {
        Cue {
            identifier: self.identifier.clone(),
            start,
            end,
            text: text.into(),
            styles: self.styles.clone(),
        }
    }

    /// Builder-style identifier setter
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Builder-style settings setter
    pub fn with_styles(mut self, styles: impl Into<String>) -> Self {
        self.styles = styles.into();
        self
    }

    /// Length of the cue in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Length of the cue in whole milliseconds
    pub fn duration_ms(&self) -> u64 {
        seconds_to_ms(self.duration())
    }

    /// Parse a `[HH:]MM:SS.mmm` timestamp into seconds
    pub fn parse_timestamp(timestamp: &str) -> Option<f64> {
        let (clock, millis) = timestamp.trim().split_once('.')?;
        if millis.len() != 3 || !millis.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let parts: Vec<&str> = clock.split(':').collect();
        let (hours, minutes, seconds) = match parts.as_slice() {
            [h, m, s] => (*h, *m, *s),
            [m, s] => ("0", *m, *s),
            _ => return None,
        };
        if minutes.len() != 2 || seconds.len() != 2 || hours.is_empty() {
            return None;
        }

        let hours: u64 = hours.parse().ok()?;
        let minutes: u64 = minutes.parse().ok()?;
        let seconds: u64 = seconds.parse().ok()?;
        let millis: u64 = millis.parse().ok()?;

        if minutes >= 60 || seconds >= 60 {
            return None;
        }

        let total_ms = (hours * 3600 + minutes * 60 + seconds) * 1000 + millis;
        Some(total_ms as f64 / 1000.0)
    }

    /// Format seconds as `HH:MM:SS.mmm`, truncating sub-millisecond precision
    pub fn format_timestamp(seconds: f64) -> String {
        // absorbs binary rounding such as 2.0399999 for 2.04
        let total_ms = (seconds.max(0.0) * 1000.0 + 1e-6).floor() as u64;
        let hours = total_ms / 3_600_000;
        let minutes = (total_ms % 3_600_000) / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let millis = total_ms % 1_000;

        format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, secs, millis)
    }

    /// Timing line of the cue, settings appended when present
    pub fn timing_line(&self) -> String {
        let mut line = format!(
            "{} --> {}",
            Self::format_timestamp(self.start),
            Self::format_timestamp(self.end)
        );
        if !self.styles.is_empty() {
            line.push(' ');
            line.push_str(&self.styles);
        }
        line
    }

    /// Validate the timing invariant for the cue at `index`
    pub fn validate(&self, index: usize) -> Result<(), FormatError> {
        if self.end <= self.start {
            return Err(FormatError::InvertedTimestamps { cue: index });
        }
        Ok(())
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.identifier.is_empty() {
            writeln!(f, "{}", self.identifier)?;
        }
        writeln!(f, "{}", self.timing_line())?;
        writeln!(f, "{}", self.text)
    }
}

/// Group of cues delivered as one fixed-duration media segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Playback length of the segment in seconds
    pub duration: f64,

    /// Cues shown during the segment; boundary cues may repeat in the next one
    pub cues: Vec<Cue>,
}

impl Segment {
    pub fn new(duration: f64, cues: Vec<Cue>) -> Self {
        Segment { duration, cues }
    }
}

/// Convert seconds to whole milliseconds, rounding to nearest
pub fn seconds_to_ms(seconds: f64) -> u64 {
    (seconds.max(0.0) * 1000.0).round() as u64
}
