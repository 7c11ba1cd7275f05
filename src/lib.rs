/*!
 * # voicevtt - WebVTT tooling for speech-synthesis dubbing
 *
 * A Rust library that prepares WebVTT subtitles for voice dubbing and
 * streaming.
 *
 * ## Features
 *
 * - Parse WebVTT (and convert SRT) into cues
 * - Re-segment cues into whole sentences with SSML-like prosody timing
 * - Re-flow sentence cues into readable display cues
 * - Cut cues into fixed-duration HLS segments with a VOD playlist
 * - Speaker and style annotation, synthesis JSON and noise-gate export
 * - Equivalency checks between parallel subtitles
 *
 * ## Architecture
 *
 * - `cue`: the cue and segment data model, timestamps
 * - `markup`: scanner for voice, emphasis, prosody and break tags
 * - `parser`: WebVTT parsing and SRT conversion
 * - `renderer`: WebVTT, HLS segment and playlist output
 * - `segmentation`: the segmenters:
 *   - `segmentation::sentences`: sentence segmentation
 *   - `segmentation::reflow`: display re-flow
 *   - `segmentation::duration`: fixed-duration HLS segmentation
 * - `annotation`: speakers, styles, synthesis and noise-gate export
 * - `validation`: equivalency checks and timing diagnostics
 * - `app_config`: Configuration management
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod annotation;
pub mod app_config;
pub mod cue;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod markup;
pub mod parser;
pub mod renderer;
pub mod segmentation;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use cue::{Cue, Segment};
pub use errors::{AppError, CompatibilityError, CompatibilityTimesError, FormatError, SubtitleError};
pub use language_utils::{get_language_name, language_codes_match, normalize_language};
pub use parser::{parse_vtt, srt_to_vtt};
pub use renderer::{hls_playlist, hls_segment_files, render_cues};
pub use segmentation::{
    parse_to_sentences, reflow_for_display, segment_by_duration, segment_by_sentence, segment_vtt,
};
pub use validation::{check_subtitles_equivalency, check_subtitles_times_equivalency};
