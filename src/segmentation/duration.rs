/*!
 * Fixed-duration segmentation for HLS subtitle renditions.
 *
 * Packs cues greedily into segments of roughly `segment_length` seconds.
 * A cue crossing a segment boundary is repeated at the start of the next
 * segment. Segment durations always add up to the end time of the last cue.
 */

use log::{debug, trace};

use crate::cue::{Cue, Segment};
use crate::errors::SubtitleError;
use crate::parser;

/// Target segment length in seconds
pub const DEFAULT_SEGMENT_LENGTH: f64 = 10.0;

/// Greedy one-pass segmenter
#[derive(Debug, Clone)]
pub struct DurationSegmenter {
    segment_length: f64,
}

impl Default for DurationSegmenter {
    fn default() -> Self {
        Self {
            segment_length: DEFAULT_SEGMENT_LENGTH,
        }
    }
}

impl DurationSegmenter {
    /// Create a segmenter; the length must be a positive, finite number of seconds
    pub fn new(segment_length: f64) -> Result<Self, SubtitleError> {
        if !segment_length.is_finite() || segment_length <= 0.0 {
            return Err(SubtitleError::InvalidSegmentLength(segment_length));
        }
        Ok(Self { segment_length })
    }

    pub fn segment_length(&self) -> f64 {
        self.segment_length
    }

    /// Group cues into segments
    pub fn segment(&self, cues: &[Cue]) -> Vec<Segment> {
        let length = self.segment_length;
        let mut segments = Vec::new();

        let mut current_cues: Vec<Cue> = Vec::new();
        let mut queued: Option<&Cue> = None;
        let mut current_duration = 0.0;
        let mut total_duration = 0.0;

        for (i, cue) in cues.iter().enumerate() {
            let first = i == 0;
            let last = i == cues.len() - 1;
            let next_start = if last { f64::INFINITY } else { cues[i + 1].start };
            let cue_length = if first { cue.end } else { cue.end - cue.start };
            let silence = if first { 0.0 } else { cue.start - cues[i - 1].end };

            current_duration += cue_length + silence;

            trace!(
                "Cue #{}, segment #{}: start {:.3}, end {:.3}, total {:.3}, current {:.3}, next start {:.3}",
                i,
                segments.len() + 1,
                cue.start,
                cue.end,
                total_duration,
                current_duration,
                next_start
            );

            if let Some(boundary_cue) = queued.take() {
                current_cues.push(boundary_cue.clone());
                current_duration += boundary_cue.end - total_duration;
            }

            current_cues.push(cue.clone());

            // a cue passing a segment boundary appears in both segments
            let straddles = next_start - cue.end < length
                && silence < length
                && current_duration > length;

            if should_segment(total_duration, length, next_start, silence) {
                let duration = segment_duration(last, cue.end, length, current_duration, total_duration);
                segments.push(Segment::new(duration, std::mem::take(&mut current_cues)));

                total_duration += duration;
                current_duration = 0.0;

                if straddles {
                    queued = Some(cue);
                }
            }
        }

        debug!(
            "Split {} cues into {} segments of {}s",
            cues.len(),
            segments.len(),
            length
        );
        segments
    }
}

// @decides: Whether the segment closes after the current cue
fn should_segment(total: f64, length: f64, next_start: f64, silence: f64) -> bool {
    let aligned_silence = align_to_segment_length(silence, length);
    let next_cue_in_next_segment = silence <= length || aligned_silence + total < next_start;

    next_cue_in_next_segment && next_start - total >= length
}

fn segment_duration(last: bool, end: f64, length: f64, current: f64, total: f64) -> f64 {
    if last {
        // the final segment absorbs whatever is left of the playtime
        return round_to_hundredths(end - total);
    }

    let duration = if current > length {
        align_to_segment_length(current - length, length)
    } else {
        length
    };
    duration.round()
}

/// Round `n` up to the next multiple of `length` (an exact multiple moves up one step)
fn align_to_segment_length(n: f64, length: f64) -> f64 {
    n + length - n % length
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Segment cues into `segment_length`-second chunks
pub fn segment_by_duration(cues: &[Cue], segment_length: f64) -> Result<Vec<Segment>, SubtitleError> {
    Ok(DurationSegmenter::new(segment_length)?.segment(cues))
}

/// Parse WebVTT text and segment it
pub fn segment_vtt(vtt_text: &str, segment_length: f64) -> Result<Vec<Segment>, SubtitleError> {
    let cues = parser::parse_vtt(vtt_text)?;
    segment_by_duration(&cues, segment_length)
}
