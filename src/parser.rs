/*!
 * WebVTT parsing and SRT conversion.
 *
 * Produces validated cue sequences from WebVTT text. Malformed documents are
 * rejected with a [`FormatError`] naming the failing cue block; nothing is
 * recovered locally.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::cue::Cue;
use crate::errors::FormatError;

// @const: Timestamp at the start of a timing component
static TIMESTAMP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(\d+):)?(\d{2}):(\d{2})\.(\d{3})").unwrap());

// @const: SRT decimal comma between two digits
static SRT_DECIMAL_COMMA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d),(\d)").unwrap());

const ZERO_WIDTH_CHARS: [char; 5] = ['\u{200B}', '\u{200C}', '\u{200D}', '\u{2060}', '\u{FEFF}'];

const ARROW: &str = "-->";

/// Remove zero-width characters that break signature and timestamp matching
pub fn strip_zero_width(text: &str) -> String {
    text.chars().filter(|c| !ZERO_WIDTH_CHARS.contains(c)).collect()
}

/// Parse WebVTT text into a validated cue sequence
pub fn parse_vtt(input: &str) -> Result<Vec<Cue>, FormatError> {
    let input = strip_zero_width(input).replace("\r\n", "\n").replace('\r', "\n");

    let mut blocks = split_blocks(&input).into_iter();
    let header = blocks.next().unwrap_or_default();

    if !header.starts_with("WEBVTT") {
        return Err(FormatError::MissingSignature);
    }
    // Metadata headers are allowed, a glued timing line is not
    if header.lines().skip(1).any(|line| line.contains(ARROW)) {
        return Err(FormatError::NoBlankLineAfterSignature);
    }

    let mut cues = Vec::new();
    for (index, block) in blocks.enumerate() {
        if is_comment_block(&block) {
            debug!("Skipping comment block #{}", index);
            continue;
        }
        cues.push(parse_cue(&block, index)?);
    }

    let overlaps = cues
        .windows(2)
        .filter(|pair| pair[0].end > pair[1].start)
        .count();
    if overlaps > 0 {
        warn!("Found {} overlapping cues", overlaps);
    }

    Ok(cues)
}

// @splits: Text into blank-line separated blocks, dropping empty ones
fn split_blocks(input: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in input.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        blocks.push(current.join("\n"));
    }

    blocks
}

fn is_comment_block(block: &str) -> bool {
    let first = block.lines().next().unwrap_or_default();
    (first == "NOTE" || first.starts_with("NOTE ") || first.starts_with("NOTE\t"))
        && !block.contains(ARROW)
}

// @parses: Single cue block
fn parse_cue(block: &str, index: usize) -> Result<Cue, FormatError> {
    let mut lines: Vec<&str> = block.lines().collect();

    if lines.len() == 1 && !lines[0].contains(ARROW) {
        return Err(FormatError::StandaloneIdentifier { cue: index });
    }
    if lines.len() > 1 && !(lines[0].contains(ARROW) || lines[1].contains(ARROW)) {
        return Err(FormatError::MissingTimestamp { cue: index });
    }

    let identifier = if lines.len() > 1 && lines[1].contains(ARROW) {
        lines.remove(0).trim().to_string()
    } else {
        String::new()
    };

    let (start, end, styles) = parse_timing_line(lines.remove(0), index)?;
    if end <= start {
        return Err(FormatError::InvertedTimestamps { cue: index });
    }

    Ok(Cue {
        identifier,
        start,
        end,
        text: lines.join("\n"),
        styles,
    })
}

// @parses: `start --> end [settings]`
fn parse_timing_line(line: &str, index: usize) -> Result<(f64, f64, String), FormatError> {
    let invalid = || FormatError::InvalidTimestamp { cue: index };

    let (start_part, end_part) = line.split_once(ARROW).ok_or_else(invalid)?;
    if end_part.contains(ARROW) {
        return Err(invalid());
    }

    let start_part = start_part.trim();
    let start_match = TIMESTAMP_REGEX.find(start_part).ok_or_else(invalid)?;
    if start_match.end() != start_part.len() {
        return Err(invalid());
    }

    let end_part = end_part.trim_start();
    let end_match = TIMESTAMP_REGEX.find(end_part).ok_or_else(invalid)?;

    let start = Cue::parse_timestamp(start_match.as_str()).ok_or_else(invalid)?;
    let end = Cue::parse_timestamp(end_match.as_str()).ok_or_else(invalid)?;
    let styles = end_part[end_match.end()..].trim().to_string();

    Ok((start, end, styles))
}

/// Convert SRT text into WebVTT text
///
/// Decimal commas between digits become periods, so `00:00:01,000` turns into
/// `00:00:01.000`; digits separated by a comma inside the cue text are
/// converted as well.
pub fn srt_to_vtt(input: &str) -> String {
    let converted = SRT_DECIMAL_COMMA_REGEX.replace_all(input, "$1.$2");
    format!("WEBVTT\r\n\r\n{}\r\n", converted.trim())
}

/// Whether the text looks like SRT rather than WebVTT
pub fn looks_like_srt(input: &str) -> bool {
    let input = strip_zero_width(input);
    !input.trim_start().starts_with("WEBVTT")
        && input
            .lines()
            .any(|line| line.contains(ARROW) && SRT_DECIMAL_COMMA_REGEX.is_match(line))
}

/// Parse either WebVTT or SRT text
pub fn parse_subtitle(input: &str) -> Result<Vec<Cue>, FormatError> {
    if looks_like_srt(input) {
        debug!("Input detected as SRT, converting to WebVTT");
        parse_vtt(&srt_to_vtt(input))
    } else {
        parse_vtt(input)
    }
}
