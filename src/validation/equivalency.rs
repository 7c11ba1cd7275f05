/*!
 * Equivalency checks between parallel subtitles.
 *
 * Dubbing pairs a source subtitle with its translation cue by cue, so both
 * must have the same number of cues and (within a tolerance) the same times.
 * Failures are reported as typed errors naming the offending counts or cue.
 */

use log::debug;

use crate::cue::Cue;
use crate::errors::{CompatibilityError, CompatibilityTimesError, SubtitleError};
use crate::parser;

/// Check that two cue sequences have the same number of cues
pub fn check_subtitles_equivalency(source: &[Cue], target: &[Cue]) -> Result<bool, CompatibilityError> {
    if source.len() != target.len() {
        return Err(CompatibilityError {
            source_count: source.len(),
            target_count: target.len(),
        });
    }
    Ok(true)
}

/// Check cue counts, then start and end times within `tolerance` seconds
pub fn check_subtitles_times_equivalency(
    source: &[Cue],
    target: &[Cue],
    tolerance: f64,
) -> Result<bool, SubtitleError> {
    check_subtitles_equivalency(source, target)?;

    let mismatch = source.iter().zip(target).position(|(a, b)| {
        (a.start - b.start).abs() > tolerance || (a.end - b.end).abs() > tolerance
    });

    if let Some(index) = mismatch {
        debug!(
            "Cue {} differs: {:.3}-{:.3} vs {:.3}-{:.3}",
            index + 1,
            source[index].start,
            source[index].end,
            target[index].start,
            target[index].end
        );
        return Err(CompatibilityTimesError {
            cue: index + 1,
            tolerance,
        }
        .into());
    }

    Ok(true)
}

fn parse_pair(source_text: &str, target_text: &str) -> Result<(Vec<Cue>, Vec<Cue>), SubtitleError> {
    let source = parser::parse_vtt(source_text).map_err(|e| e.in_document("src"))?;
    let target = parser::parse_vtt(target_text).map_err(|e| e.in_document("target"))?;
    Ok((source, target))
}

/// Text-level variant of [`check_subtitles_equivalency`]
pub fn check_vtt_equivalency(source_text: &str, target_text: &str) -> Result<bool, SubtitleError> {
    let (source, target) = parse_pair(source_text, target_text)?;
    Ok(check_subtitles_equivalency(&source, &target)?)
}

/// Text-level variant of [`check_subtitles_times_equivalency`]
pub fn check_vtt_times_equivalency(
    source_text: &str,
    target_text: &str,
    tolerance: f64,
) -> Result<bool, SubtitleError> {
    let (source, target) = parse_pair(source_text, target_text)?;
    check_subtitles_times_equivalency(&source, &target, tolerance)
}
