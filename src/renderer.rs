/*!
 * Rendering of cue sequences back into text.
 *
 * - WebVTT documents with renumbered cues
 * - Per-segment WebVTT files for HLS delivery
 * - The `#EXTM3U` media playlist that references those files
 */

use std::fmt::Write;

use crate::cue::{Cue, Segment};

const NEWLINE: &str = "\r\n";

/// Default `MPEGTS` value of the `X-TIMESTAMP-MAP` header
pub const DEFAULT_MPEGTS_OFFSET: &str = "900000";

/// Render cues as a WebVTT document, numbering them from 1
pub fn render_cues(cues: &[Cue]) -> String {
    let mut output = format!("WEBVTT{NEWLINE}");

    for (i, cue) in cues.iter().enumerate() {
        output.push_str(NEWLINE);
        let _ = write!(
            output,
            "{}{NEWLINE}{}{NEWLINE}{}{NEWLINE}",
            i + 1,
            cue.timing_line(),
            cue.text
        );
    }

    output
}

/// One WebVTT file of an HLS subtitle rendition
#[derive(Debug, Clone, PartialEq)]
pub struct HlsSegmentFile {
    /// File name referenced by the playlist (`{index}.vtt`)
    pub filename: String,
    /// Full WebVTT content including the timestamp map header
    pub content: String,
}

pub fn segment_filename(index: usize) -> String {
    format!("{}.vtt", index)
}

/// Render each segment as a standalone WebVTT file
pub fn hls_segment_files(segments: &[Segment], start_offset: &str) -> Vec<HlsSegmentFile> {
    segments
        .iter()
        .enumerate()
        .map(|(i, segment)| {
            let content = format!(
                "WEBVTT\nX-TIMESTAMP-MAP=MPEGTS:{},LOCAL:00:00:00.000\n\n{}\n",
                start_offset,
                printable_cues(&segment.cues)
            );
            HlsSegmentFile {
                filename: segment_filename(i),
                content,
            }
        })
        .collect()
}

/// Render the VOD media playlist for a list of segments
pub fn hls_playlist(segments: &[Segment]) -> String {
    let longest = segments
        .iter()
        .map(|segment| segment.duration)
        .fold(0.0_f64, f64::max);

    let entries = segments
        .iter()
        .enumerate()
        .map(|(i, segment)| format!("#EXTINF:{:.5},\n{}", segment.duration, segment_filename(i)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "#EXTM3U\n#EXT-X-TARGETDURATION:{}\n#EXT-X-VERSION:3\n#EXT-X-MEDIA-SEQUENCE:0\n#EXT-X-PLAYLIST-TYPE:VOD\n{}\n#EXT-X-ENDLIST\n",
        longest.round() as u64,
        entries
    )
}

fn printable_cues(cues: &[Cue]) -> String {
    cues.iter().map(printable_cue).collect::<Vec<_>>().join("\n\n")
}

fn printable_cue(cue: &Cue) -> String {
    let mut lines = Vec::with_capacity(3);

    if !cue.identifier.is_empty() {
        lines.push(cue.identifier.clone());
    }

    // players such as JWPlayer drop cues without a space after the end timestamp
    lines.push(format!(
        "{} --> {} {}",
        Cue::format_timestamp(cue.start),
        Cue::format_timestamp(cue.end),
        cue.styles
    ));

    if !cue.text.is_empty() {
        lines.push(cue.text.clone());
    }

    lines.join("\n")
}
