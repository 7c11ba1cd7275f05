/*!
 * Tests for error types and conversions
 */

use voicevtt::errors::{AppError, CompatibilityError, CompatibilityTimesError, FormatError, SubtitleError};

#[test]
fn test_formatError_inDocument_shouldDisplayDocumentAndCause() {
    let error = FormatError::InvalidTimestamp { cue: 4 }.in_document("target");
    let display = format!("{}", error);

    assert!(display.contains("Error in target subtitle"));
    assert!(display.contains("Invalid cue timestamp (cue #4)"));
}

#[test]
fn test_compatibilityErrors_shouldNameCountsAndCue() {
    let counts = SubtitleError::from(CompatibilityError { source_count: 3, target_count: 4 });
    assert_eq!(
        counts.to_string(),
        "Compatibility error: Subtitles have different number of cues (3 and 4)"
    );

    let times = CompatibilityTimesError { cue: 7, tolerance: 0.5 };
    assert_eq!(times.to_string(), "Start and end times differ at cue 7");
}

#[test]
fn test_subtitleError_variants_shouldDisplayCorrectly() {
    assert_eq!(
        SubtitleError::CueIndexOutOfRange { index: 5, count: 2 }.to_string(),
        "Cue index 5 out of range (2 cues)"
    );
    assert!(SubtitleError::InvalidSegmentLength(-1.0).to_string().contains("-1"));
    assert!(SubtitleError::InvalidSpeakerModels("bad".into()).to_string().contains("bad"));
}

#[test]
fn test_appError_conversions_shouldWrapSources() {
    let from_format: AppError = FormatError::MissingSignature.into();
    assert!(matches!(from_format, AppError::Subtitle(SubtitleError::Format(FormatError::MissingSignature))));
    assert_eq!(
        from_format.to_string(),
        "Subtitle error: Format error: Must start with \"WEBVTT\""
    );

    let from_io: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(from_io, AppError::File(ref msg) if msg == "gone"));

    let from_anyhow: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(from_anyhow, AppError::Unknown(_)));

    let from_json: AppError = serde_json::from_str::<u32>("x").unwrap_err().into();
    assert!(matches!(from_json, AppError::Config(_)));
}
