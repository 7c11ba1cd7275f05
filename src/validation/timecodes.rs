/*!
 * Timing diagnostics for cue sequences.
 *
 * The segmenters assume well-formed timing and never re-check it. This
 * validator reports what they would silently mis-handle:
 * - Inverted or empty time ranges
 * - Cues starting before their predecessor (non-monotonic order)
 * - Overlaps between consecutive cues
 * - Reading speeds too high for the plain text of a cue
 */

use log::debug;

use crate::cue::{seconds_to_ms, Cue};
use crate::markup;

/// Maximum characters per second for readable subtitles
const DEFAULT_MAX_CPS: f64 = 25.0;

/// Types of timing issues, cues numbered from 1
#[derive(Debug, Clone, PartialEq)]
pub enum TimecodeIssue {
    /// End is not after start
    InvalidTimeRange { cue: usize, start: f64, end: f64 },
    /// Starts before the previous cue
    OutOfOrder { cue: usize, previous_start: f64 },
    /// Starts before the previous cue has ended
    Overlap { cue: usize, overlap_ms: u64 },
    /// Too much text for the time on screen
    ReadingSpeedTooHigh { cue: usize, cps: f64 },
}

impl std::fmt::Display for TimecodeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimecodeIssue::InvalidTimeRange { cue, start, end } => write!(
                f,
                "Cue {}: invalid time range {} --> {}",
                cue,
                Cue::format_timestamp(*start),
                Cue::format_timestamp(*end)
            ),
            TimecodeIssue::OutOfOrder { cue, previous_start } => write!(
                f,
                "Cue {}: starts before previous cue ({})",
                cue,
                Cue::format_timestamp(*previous_start)
            ),
            TimecodeIssue::Overlap { cue, overlap_ms } => {
                write!(f, "Cue {}: overlaps previous cue by {}ms", cue, overlap_ms)
            }
            TimecodeIssue::ReadingSpeedTooHigh { cue, cps } => {
                write!(f, "Cue {}: reading speed {:.1} CPS", cue, cps)
            }
        }
    }
}

/// Result of validating a cue sequence
#[derive(Debug, Clone, Default)]
pub struct TimecodeReport {
    pub issues: Vec<TimecodeIssue>,
}

impl TimecodeReport {
    /// Whether the sequence is safe to segment (reading speed is advisory)
    pub fn is_well_formed(&self) -> bool {
        self.issues
            .iter()
            .all(|issue| matches!(issue, TimecodeIssue::ReadingSpeedTooHigh { .. }))
    }

    pub fn overlap_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|issue| matches!(issue, TimecodeIssue::Overlap { .. }))
            .count()
    }
}

/// Timecode validator for cue sequences
pub struct TimecodeValidator {
    max_cps: f64,
}

impl Default for TimecodeValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl TimecodeValidator {
    pub fn new() -> Self {
        Self {
            max_cps: DEFAULT_MAX_CPS,
        }
    }

    pub fn with_max_cps(max_cps: f64) -> Self {
        Self { max_cps }
    }

    /// Characters per second of the cue's plain text
    pub fn calculate_cps(cue: &Cue) -> f64 {
        let duration = cue.duration();
        if duration <= 0.0 {
            return f64::INFINITY;
        }
        markup::strip_tags(&cue.text).trim().chars().count() as f64 / duration
    }

    pub fn validate(&self, cues: &[Cue]) -> TimecodeReport {
        let mut issues = Vec::new();

        for (i, cue) in cues.iter().enumerate() {
            let number = i + 1;

            if cue.end <= cue.start {
                issues.push(TimecodeIssue::InvalidTimeRange {
                    cue: number,
                    start: cue.start,
                    end: cue.end,
                });
                continue;
            }

            if let Some(previous) = i.checked_sub(1).map(|p| &cues[p]) {
                if cue.start < previous.start {
                    issues.push(TimecodeIssue::OutOfOrder {
                        cue: number,
                        previous_start: previous.start,
                    });
                } else if cue.start < previous.end {
                    issues.push(TimecodeIssue::Overlap {
                        cue: number,
                        overlap_ms: seconds_to_ms(previous.end - cue.start),
                    });
                }
            }

            let cps = Self::calculate_cps(cue);
            if cps > self.max_cps {
                issues.push(TimecodeIssue::ReadingSpeedTooHigh { cue: number, cps });
            }
        }

        debug!("Timecode validation: {} cues, {} issues", cues.len(), issues.len());
        TimecodeReport { issues }
    }
}
