/*!
 * Sentence segmentation of cue sequences.
 *
 * Produces one cue per sentence. Cues holding several sentences are split
 * with timestamps interpolated by character count; cues ending mid-sentence
 * are merged with the cues that follow until a terminator is reached. Merged
 * sentences record the duration of the opening cue and of the closing cue in
 * `<prosody>` spans and the silence before the closing cue in a `<break>`
 * tag so the display re-flow can undo the merge later. Cues in between are
 * folded into the opening span.
 */

use std::collections::VecDeque;

use log::{debug, trace};

use crate::cue::{seconds_to_ms, Cue};
use crate::errors::SubtitleError;
use crate::markup;
use crate::parser;
use crate::renderer;

/// Speaker assumed until the first voice tag shows up
pub const DEFAULT_SPEAKER: &str = "Speaker1";

const TERMINATORS: [char; 3] = ['.', '?', '!'];

/// Gaps shorter than this are treated as contiguous cues
const MIN_GAP_SECONDS: f64 = 0.0005;

/// Whether the plain text of a payload ends a sentence
pub fn ends_sentence(text: &str) -> bool {
    markup::strip_tags(text).trim_end().ends_with(TERMINATORS)
}

/// Byte offsets just past every `". "`, `"? "` and `"! "` in the text parts
/// of a payload; punctuation inside tags (`<v Dr. Who>`) is ignored
pub fn sentence_breaks(text: &str) -> Vec<usize> {
    let mut breaks = Vec::new();
    let mut offset = 0;

    for token in markup::scan(text) {
        let raw = token.raw();
        if token.is_text() {
            let bytes = raw.as_bytes();
            for i in 0..bytes.len().saturating_sub(1) {
                if matches!(bytes[i], b'.' | b'?' | b'!') && bytes[i + 1] == b' ' {
                    breaks.push(offset + i + 2);
                }
            }
        }
        offset += raw.len();
    }

    breaks
}

/// Split a payload after each sentence separator, separators kept on the left
fn split_keeping_separators(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut from = 0;

    for cut in sentence_breaks(text) {
        pieces.push(&text[from..cut]);
        from = cut;
    }
    if from < text.len() {
        pieces.push(&text[from..]);
    }

    pieces
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

// @struct: One source cue inside a merged sentence
#[derive(Debug)]
struct MergePiece {
    // @field: Silence before the piece in ms
    pause_ms: u64,
    // @field: Speech duration of the piece in ms
    duration_ms: u64,
    text: String,
}

fn render_pieces(pieces: &[MergePiece]) -> String {
    let mut output = String::new();
    for (i, piece) in pieces.iter().enumerate() {
        if i > 0 {
            output.push(' ');
        }
        if piece.pause_ms > 0 {
            output.push_str(&markup::break_tag(piece.pause_ms));
        }
        output.push_str(&markup::prosody(&piece.text, piece.duration_ms));
    }
    output
}

/// Re-segments cue sequences into one sentence per cue
#[derive(Debug, Clone)]
pub struct SentenceSegmenter {
    default_voice: String,
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceSegmenter {
    /// Create a segmenter using `Speaker1` as the default speaker
    pub fn new() -> Self {
        Self::with_default_speaker(DEFAULT_SPEAKER)
    }

    /// Create a segmenter with a custom default speaker name
    pub fn with_default_speaker(name: &str) -> Self {
        Self {
            default_voice: markup::voice(name),
        }
    }

    /// Segment a cue sequence, one sentence per output cue
    pub fn segment(&self, cues: &[Cue]) -> Vec<Cue> {
        let mut queue: VecDeque<Cue> = cues.iter().filter_map(clean_cue).collect();
        let dropped = cues.len() - queue.len();
        if dropped > 0 {
            debug!("Dropped {} empty cues before segmentation", dropped);
        }

        let mut pass = SegmentationPass {
            voice: self.default_voice.clone(),
            output: Vec::with_capacity(cues.len()),
        };

        while let Some(cue) = queue.pop_front() {
            if !sentence_breaks(&cue.text).is_empty() {
                pass.split_sentences(cue, &mut queue);
            } else if !ends_sentence(&cue.text) {
                pass.merge_forward(cue, &mut queue);
            } else {
                pass.emit_complete(cue);
            }
        }

        debug!("Segmented {} cues into {} sentences", cues.len(), pass.output.len());
        pass.output
    }
}

// @cleans: Voice closings and surrounding whitespace; None when nothing is left
fn clean_cue(cue: &Cue) -> Option<Cue> {
    let text = markup::remove_voice_closings(&cue.text);
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(cue.derive(cue.start, cue.end, text))
}

// @struct: Mutable state of one segmentation run
struct SegmentationPass {
    // @field: Voice tag applied to untagged sentences
    voice: String,
    output: Vec<Cue>,
}

impl SegmentationPass {
    /// Prefix the current voice, or adopt the fragment's own voice tag
    fn attach_voice(&mut self, text: &str) -> String {
        match markup::voice_tag(text) {
            Some(tag) => {
                self.voice = tag.to_string();
                text.to_string()
            }
            None => format!("{}{}", self.voice, text),
        }
    }

    /// Adopt the last voice tag of a merged piece and strip its voice tags
    fn take_voice(&mut self, text: &str) -> String {
        match markup::last_voice_tag(text) {
            Some(tag) => {
                self.voice = tag.to_string();
                markup::remove_voice_tags(text).trim().to_string()
            }
            None => text.trim().to_string(),
        }
    }

    fn emit_complete(&mut self, cue: Cue) {
        let text = self.attach_voice(&cue.text);
        self.output.push(cue.derive(cue.start, cue.end, text));
    }

    /// Split a cue holding several sentences
    ///
    /// An unfinished trailing fragment goes back to the front of the queue and
    /// is merged with what follows. Fragments holding only markup stay with
    /// the sentence before them.
    fn split_sentences(&mut self, cue: Cue, queue: &mut VecDeque<Cue>) {
        let fragments = split_keeping_separators(&cue.text);
        let total_chars = char_len(&cue.text) as f64;
        let range = cue.duration();
        let last = fragments.len() - 1;
        let mut consumed = 0;

        trace!("Splitting cue at {:.3}s into {} fragments", cue.start, fragments.len());

        for (j, fragment) in fragments.iter().enumerate() {
            let start = cue.start + (consumed as f64 / total_chars) * range;
            consumed += char_len(fragment);
            let end = if j == last {
                cue.end
            } else {
                cue.start + (consumed as f64 / total_chars) * range
            };

            let sentence = fragment.trim();
            if sentence.is_empty() {
                continue;
            }

            if j > 0 && is_markup_only(sentence) {
                if let Some(previous) = self.output.last_mut() {
                    previous.text.push_str(sentence);
                    previous.end = end;
                    continue;
                }
            }

            if j == last && !ends_sentence(sentence) {
                queue.push_front(cue.derive(start, end, sentence));
                continue;
            }

            let text = self.attach_voice(sentence);
            self.output.push(cue.derive(start, end, text));
        }
    }

    /// Merge an unfinished cue with following cues until a sentence ends
    ///
    /// The merged sentence is voiced by the first voice tag inside it, or by
    /// the voice in effect when it started. The last tag seen becomes the
    /// voice for whatever follows.
    fn merge_forward(&mut self, cue: Cue, queue: &mut VecDeque<Cue>) {
        let opening_voice = self.voice.clone();
        let mut speaker = markup::voice_tag(&cue.text).map(str::to_string);

        let mut pieces = vec![MergePiece {
            pause_ms: 0,
            duration_ms: cue.duration_ms(),
            text: self.take_voice(&cue.text),
        }];
        let mut end = cue.end;

        loop {
            let Some(next) = queue.pop_front() else {
                debug!("Document ends mid-sentence at {:.3}s, closing sentence", end);
                if let Some(piece) = pieces.last_mut() {
                    piece.text.push('.');
                }
                break;
            };

            let gap = next.start - end;
            let pause_ms = if gap > MIN_GAP_SECONDS { seconds_to_ms(gap) } else { 0 };

            if let Some(&cut) = sentence_breaks(&next.text).first() {
                let remainder = next.text[cut..].trim();
                let whole = is_markup_only(remainder);
                let (head, head_end) = if whole {
                    (next.text.as_str(), next.end)
                } else {
                    let head = &next.text[..cut];
                    let proportion = char_len(head) as f64 / char_len(&next.text) as f64;
                    (head, next.start + proportion * next.duration())
                };

                if speaker.is_none() {
                    speaker = markup::voice_tag(head).map(str::to_string);
                }
                pieces.push(MergePiece {
                    pause_ms,
                    duration_ms: seconds_to_ms(head_end - next.start),
                    text: self.take_voice(head),
                });

                if !whole {
                    queue.push_front(next.derive(head_end, next.end, remainder));
                }
                end = head_end;
                break;
            }

            if speaker.is_none() {
                speaker = markup::voice_tag(&next.text).map(str::to_string);
            }
            let completes = ends_sentence(&next.text);
            let text = self.take_voice(&next.text);
            end = next.end;

            if completes {
                pieces.push(MergePiece {
                    pause_ms,
                    duration_ms: next.duration_ms(),
                    text,
                });
                break;
            }

            // middle cues join the open span, silence included
            if let Some(piece) = pieces.last_mut() {
                piece.text.push(' ');
                piece.text.push_str(&text);
                piece.duration_ms += pause_ms + next.duration_ms();
            }
        }

        trace!("Merged {} pieces into one sentence ending at {:.3}s", pieces.len(), end);

        let voice = speaker.unwrap_or(opening_voice);
        let text = format!("{}{}", voice, render_pieces(&pieces));
        self.output.push(cue.derive(cue.start, end, text));
    }
}

fn is_markup_only(text: &str) -> bool {
    markup::strip_tags(text).trim().is_empty()
}

/// Segment a cue sequence with the default speaker
pub fn segment_by_sentence(cues: &[Cue]) -> Vec<Cue> {
    SentenceSegmenter::new().segment(cues)
}

/// Parse WebVTT text and render it back with one sentence per cue
pub fn parse_to_sentences(vtt_text: &str) -> Result<String, SubtitleError> {
    let cues = parser::parse_vtt(vtt_text)?;
    Ok(renderer::render_cues(&segment_by_sentence(&cues)))
}
