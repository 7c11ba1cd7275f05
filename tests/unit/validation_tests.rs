/*!
 * Tests for equivalency checks and timing diagnostics
 */

use voicevtt::cue::Cue;
use voicevtt::errors::{CompatibilityError, CompatibilityTimesError, FormatError, SubtitleError};
use voicevtt::validation::{
    TimecodeIssue, TimecodeValidator, check_subtitles_equivalency,
    check_subtitles_times_equivalency, check_vtt_equivalency, check_vtt_times_equivalency,
};

use crate::common;

const SHIFTED_VTT: &str = "WEBVTT

00:00:00.000 --> 00:00:02.000
<v Bob>Hallo

00:00:02.500 --> 00:00:04.200
Welt, mein Freund. Wie geht

00:00:04.200 --> 00:00:05.000
es dir?
";

#[test]
fn test_vttEquivalency_withParallelDocuments_shouldPass() {
    assert_eq!(check_vtt_equivalency(common::DIALOGUE_VTT, SHIFTED_VTT), Ok(true));
}

#[test]
fn test_vttTimesEquivalency_shouldRespectTolerance() {
    assert_eq!(
        check_vtt_times_equivalency(common::DIALOGUE_VTT, SHIFTED_VTT, 0.1),
        Err(SubtitleError::CompatibilityTimes(CompatibilityTimesError { cue: 2, tolerance: 0.1 }))
    );
    assert_eq!(check_vtt_times_equivalency(common::DIALOGUE_VTT, SHIFTED_VTT, 0.25), Ok(true));
}

#[test]
fn test_vttEquivalency_withBrokenSource_shouldTagSource() {
    let err = check_vtt_equivalency("WEBVTT\n\nlonely\n", SHIFTED_VTT).unwrap_err();
    assert_eq!(
        err,
        SubtitleError::Format(FormatError::StandaloneIdentifier { cue: 0 }.in_document("src"))
    );
}

#[test]
fn test_equivalency_withDifferentCounts_shouldFailBeforeTimes() {
    let one = vec![Cue::new(0.0, 1.0, "a")];
    let two = vec![Cue::new(0.0, 1.0, "a"), Cue::new(1.0, 2.0, "b")];

    assert_eq!(
        check_subtitles_equivalency(&one, &two),
        Err(CompatibilityError { source_count: 1, target_count: 2 })
    );
    assert!(matches!(
        check_subtitles_times_equivalency(&one, &two, 10.0),
        Err(SubtitleError::Compatibility(_))
    ));
    assert_eq!(check_subtitles_times_equivalency(&[], &[], 0.0), Ok(true));
}

#[test]
fn test_timecodeValidator_shouldReportMessages() {
    let cues = vec![
        Cue::new(0.0, 2.0, "One."),
        Cue::new(1.0, 3.0, "Two."),
        Cue::new(4.0, 4.0, "Three."),
    ];
    let report = TimecodeValidator::new().validate(&cues);

    assert_eq!(report.issues.len(), 2);
    assert_eq!(report.issues[0].to_string(), "Cue 2: overlaps previous cue by 1000ms");
    assert_eq!(
        report.issues[1],
        TimecodeIssue::InvalidTimeRange { cue: 3, start: 4.0, end: 4.0 }
    );
    assert!(!report.is_well_formed());
}

#[test]
fn test_timecodeValidator_withCustomCps_shouldFlagFastCues() {
    let cues = vec![Cue::new(0.0, 1.0, "Twelve chars")];

    assert!(TimecodeValidator::with_max_cps(20.0).validate(&cues).issues.is_empty());
    assert_eq!(TimecodeValidator::with_max_cps(10.0).validate(&cues).issues.len(), 1);
}
