/*!
 * Integration tests for HLS segment and playlist output
 */

use anyhow::Result;
use std::fs;

use voicevtt::cue::Cue;
use voicevtt::file_utils::{FileManager, PLAYLIST_FILENAME};
use voicevtt::renderer::{DEFAULT_MPEGTS_OFFSET, hls_playlist, hls_segment_files, render_cues};
use voicevtt::segmentation::{segment_by_duration, segment_vtt};

use crate::common;

fn lecture() -> Vec<Cue> {
    (0..12)
        .map(|i| Cue::new(i as f64 * 3.0, i as f64 * 3.0 + 2.0, format!("Line {}.", i)))
        .collect()
}

#[test]
fn test_hls_output_shouldWriteOneFilePerSegment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().join("talk_hls");

    let segments = segment_by_duration(&lecture(), 10.0)?;
    let files = hls_segment_files(&segments, DEFAULT_MPEGTS_OFFSET);
    let playlist = hls_playlist(&segments);
    FileManager::write_hls_dir(&dir, &files, &playlist)?;

    for (i, segment) in segments.iter().enumerate() {
        let content = fs::read_to_string(dir.join(format!("{}.vtt", i)))?;
        assert!(content.starts_with("WEBVTT\nX-TIMESTAMP-MAP=MPEGTS:900000,LOCAL:00:00:00.000\n\n"));
        assert_eq!(content.matches(" --> ").count(), segment.cues.len());
    }

    let written = fs::read_to_string(dir.join(PLAYLIST_FILENAME))?;
    assert!(written.starts_with("#EXTM3U\n#EXT-X-TARGETDURATION:"));
    assert!(written.contains("#EXT-X-PLAYLIST-TYPE:VOD\n"));
    assert!(written.ends_with("#EXT-X-ENDLIST\n"));
    assert_eq!(written.matches("#EXTINF:").count(), segments.len());
    assert!(written.contains("#EXTINF:10.00000,\n0.vtt"));
    Ok(())
}

#[test]
fn test_segmentVtt_shouldMatchCueLevelSegmentation() -> Result<()> {
    let text = render_cues(&lecture());

    let from_text = segment_vtt(&text, 10.0)?;
    let from_cues = segment_by_duration(&lecture(), 10.0)?;

    assert_eq!(from_text.len(), from_cues.len());
    for (a, b) in from_text.iter().zip(&from_cues) {
        assert_eq!(a.duration, b.duration);
        assert_eq!(a.cues.len(), b.cues.len());
    }
    assert!(segment_vtt("not a subtitle", 10.0).is_err());
    Ok(())
}

#[test]
fn test_hls_output_withCustomOffset_shouldUseIt() {
    let segments = segment_by_duration(&lecture()[..2], 10.0).unwrap();
    let files = hls_segment_files(&segments, "0");

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].filename, "0.vtt");
    assert!(files[0].content.contains("MPEGTS:0,LOCAL"));
    assert!(files[0].content.contains("00:00:00.000 --> 00:00:02.000 \nLine 0."));
}
