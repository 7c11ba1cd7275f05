/*!
 * Error types for the voicevtt library.
 *
 * This module contains custom error types for the different stages of
 * subtitle processing, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while parsing WebVTT text
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The document does not start with the `WEBVTT` signature
    #[error("Must start with \"WEBVTT\"")]
    MissingSignature,

    /// A cue timing line follows the signature without a blank line
    #[error("No blank line after signature")]
    NoBlankLineAfterSignature,

    /// A cue block holds a single line that is not a timing line
    #[error("Cue identifier cannot be standalone (cue #{cue})")]
    StandaloneIdentifier {
        /// 0-based index of the cue block
        cue: usize,
    },

    /// The identifier line is not followed by a timing line
    #[error("Cue identifier needs to be followed by timestamp (cue #{cue})")]
    MissingTimestamp { cue: usize },

    /// The timing line could not be parsed
    #[error("Invalid cue timestamp (cue #{cue})")]
    InvalidTimestamp { cue: usize },

    /// The end timestamp is not strictly after the start timestamp
    #[error("End must be greater than start (cue #{cue})")]
    InvertedTimestamps { cue: usize },

    /// Parse failure tagged with the document it happened in
    #[error("Error in {document} subtitle: {source}")]
    InDocument {
        /// Which document failed ("src" or "target")
        document: &'static str,
        /// The underlying failure
        source: Box<FormatError>,
    },
}

impl FormatError {
    /// Tag this error with the name of the document it came from
    pub fn in_document(self, document: &'static str) -> Self {
        FormatError::InDocument {
            document,
            source: Box::new(self),
        }
    }
}

/// Two cue sequences meant to run in parallel have different lengths
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Subtitles have different number of cues ({source_count} and {target_count})")]
pub struct CompatibilityError {
    /// Number of cues in the source subtitle
    pub source_count: usize,
    /// Number of cues in the target subtitle
    pub target_count: usize,
}

/// Two parallel cue sequences disagree on timing
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Start and end times differ at cue {cue}")]
pub struct CompatibilityTimesError {
    /// 1-based index of the first offending cue
    pub cue: usize,
    /// Tolerance in seconds that was exceeded
    pub tolerance: f64,
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// Malformed VTT input
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Parallel subtitles with a different cue count
    #[error("Compatibility error: {0}")]
    Compatibility(#[from] CompatibilityError),

    /// Parallel subtitles with diverging cue times
    #[error("Compatibility error: {0}")]
    CompatibilityTimes(#[from] CompatibilityTimesError),

    /// A cue index outside the sequence
    #[error("Cue index {index} out of range ({count} cues)")]
    CueIndexOutOfRange { index: usize, count: usize },

    /// Segment length that cannot drive the fixed-duration segmenter
    #[error("Invalid segment length: {0}")]
    InvalidSegmentLength(f64),

    /// Speaker/model table that cannot be read
    #[error("Invalid speaker models: {0}")]
    InvalidSpeakerModels(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<FormatError> for AppError {
    fn from(error: FormatError) -> Self {
        Self::Subtitle(SubtitleError::Format(error))
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
