/*!
 * Cue re-segmentation.
 *
 * - `sentences`: one sentence per cue, with voice and timing annotations
 * - `duration`: fixed-length segments for HLS delivery
 * - `reflow`: display-friendly cues from sentence-segmented ones
 */

pub mod duration;
pub mod reflow;
pub mod sentences;

pub use duration::{segment_by_duration, segment_vtt, DurationSegmenter, DEFAULT_SEGMENT_LENGTH};
pub use reflow::{reflow_for_display, DisplayReflow, DEFAULT_MAX_DISPLAY_CHARS};
pub use sentences::{
    ends_sentence, parse_to_sentences, segment_by_sentence, SentenceSegmenter, DEFAULT_SPEAKER,
};
