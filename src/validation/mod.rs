/*!
 * Validation of cue sequences.
 *
 * - `equivalency`: parallel subtitles share cue count and timing
 * - `timecodes`: timing diagnostics the segmenters do not perform
 */

pub mod equivalency;
pub mod timecodes;

// Re-export main types
pub use equivalency::{
    check_subtitles_equivalency, check_subtitles_times_equivalency, check_vtt_equivalency,
    check_vtt_times_equivalency,
};
pub use timecodes::{TimecodeIssue, TimecodeReport, TimecodeValidator};
