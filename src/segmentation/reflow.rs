/*!
 * Display-oriented re-flow of sentence-segmented cues.
 *
 * Sentence cues are good for synthesis but can be too long on screen. This
 * pass undoes sentence merges using the recorded `<prosody>` durations and
 * splits overlong plain cues in two, leaving markup-free text.
 */

use log::debug;

use crate::cue::Cue;
use crate::markup;

/// Longest plain text kept on a single cue
pub const DEFAULT_MAX_DISPLAY_CHARS: usize = 70;

/// Re-flows cues for on-screen display
#[derive(Debug, Clone)]
pub struct DisplayReflow {
    max_chars: usize,
}

impl Default for DisplayReflow {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_DISPLAY_CHARS,
        }
    }
}

impl DisplayReflow {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn reflow(&self, cues: &[Cue]) -> Vec<Cue> {
        let annotated = cues.iter().any(|cue| markup::has_duration_annotation(&cue.text));
        let mut output = Vec::with_capacity(cues.len());

        for cue in cues {
            let fragments = markup::prosody_fragments(&cue.text);

            if !fragments.is_empty() {
                output.extend(expand_fragments(cue, &fragments));
                continue;
            }

            let plain = markup::strip_tags(&cue.text).trim().to_string();
            if !annotated && plain.chars().count() > self.max_chars {
                if let Some(split) = self.split_long(cue, &plain) {
                    output.extend(split);
                    continue;
                }
            }

            output.push(cue.derive(cue.start, cue.end, plain));
        }

        debug!("Re-flowed {} cues into {} display cues", cues.len(), output.len());
        output
    }

    /// Split once at the last space before the display limit
    fn split_long(&self, cue: &Cue, plain: &str) -> Option<[Cue; 2]> {
        let limit = self.max_chars.saturating_sub(1);
        let (cut_chars, cut_byte) = plain
            .char_indices()
            .take(limit)
            .enumerate()
            .filter(|(_, (_, c))| *c == ' ')
            .map(|(char_idx, (byte_idx, _))| (char_idx, byte_idx))
            .last()?;

        if cut_chars == 0 {
            return None;
        }

        let total = plain.chars().count() as f64;
        let middle = cue.start + (cut_chars as f64 / total) * cue.duration();

        Some([
            cue.derive(cue.start, middle, plain[..cut_byte].trim_end()),
            cue.derive(middle, cue.end, plain[cut_byte + 1..].trim_start()),
        ])
    }
}

// @expands: One display cue per prosody fragment, walking pauses and durations
fn expand_fragments(cue: &Cue, fragments: &[markup::ProsodyFragment]) -> Vec<Cue> {
    let mut expanded = Vec::with_capacity(fragments.len());
    let mut cursor = cue.start;
    let last = fragments.len() - 1;

    for (i, fragment) in fragments.iter().enumerate() {
        let start = (cursor + fragment.pause_ms / 1000.0).min(cue.end);
        let end = if i == last {
            cue.end
        } else {
            (start + fragment.duration_ms / 1000.0).min(cue.end)
        };
        cursor = end;

        let text = fragment.text.trim();
        if text.is_empty() || end <= start {
            continue;
        }
        expanded.push(cue.derive(start, end, text));
    }

    expanded
}

/// Re-flow with the default 70-character display limit
pub fn reflow_for_display(cues: &[Cue]) -> Vec<Cue> {
    DisplayReflow::default().reflow(cues)
}
