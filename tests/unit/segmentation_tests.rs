/*!
 * Tests for the sentence, display and fixed-duration segmenters
 */

use voicevtt::cue::Cue;
use voicevtt::markup;
use voicevtt::parser::parse_vtt;
use voicevtt::segmentation::{
    DisplayReflow, DurationSegmenter, SentenceSegmenter, ends_sentence, parse_to_sentences,
    reflow_for_display, segment_by_duration, segment_by_sentence,
};

use crate::common::{self, approx_eq};

fn dialogue() -> Vec<Cue> {
    parse_vtt(common::DIALOGUE_VTT).unwrap()
}

#[test]
fn test_sentences_withSpanningSentence_shouldMergeWithProsody() {
    let result = segment_by_sentence(&dialogue());

    assert_eq!(result.len(), 2);

    assert_eq!(result[0].start, 0.0);
    assert!(approx_eq(result[0].end, 3.58));
    assert!(result[0].text.starts_with(
        "<v Bob><prosody duration=\"2000ms\">Hello</prosody> <break time=\"500ms\"/><prosody duration=\""
    ));
    assert!(result[0].text.ends_with("\">world, my friend.</prosody>"));

    assert!(approx_eq(result[1].start, 3.58));
    assert_eq!(result[1].end, 5.0);
    assert!(result[1].text.starts_with("<v Bob><prosody duration=\""));
    assert!(result[1].text.ends_with("How are</prosody> <prosody duration=\"1000ms\">you?</prosody>"));
}

#[test]
fn test_sentences_everyOutputShouldEndASentence() {
    let cues = vec![
        Cue::new(0.0, 2.0, "<v Ann>First part"),
        Cue::new(2.0, 3.0, "and the end. Then"),
        Cue::new(3.5, 5.0, "a trailing thought"),
    ];
    let result = segment_by_sentence(&cues);

    assert!(!result.is_empty());
    for cue in &result {
        assert!(ends_sentence(&cue.text), "not a sentence: {:?}", cue.text);
        assert!(cue.end > cue.start);
    }
    assert_eq!(result.first().map(|c| c.start), Some(0.0));
    assert_eq!(result.last().map(|c| c.end), Some(5.0));
}

#[test]
fn test_sentences_voiceShouldPersistAcrossCues() {
    let cues = vec![
        Cue::new(0.0, 1.0, "<v Ann>One."),
        Cue::new(1.0, 2.0, "Two."),
        Cue::new(2.0, 3.0, "<v Bob>Three."),
        Cue::new(3.0, 4.0, "Four.</v>"),
    ];
    let texts: Vec<String> = segment_by_sentence(&cues).into_iter().map(|c| c.text).collect();

    assert_eq!(texts, vec!["<v Ann>One.", "<v Ann>Two.", "<v Bob>Three.", "<v Bob>Four."]);
}

#[test]
fn test_sentences_withVoiceInContinuationCue_shouldHandOverSpeaker() {
    let cues = vec![
        Cue::new(0.0, 1.0, "<v Bob>Are you"),
        Cue::new(1.0, 3.0, "<v Ann>sure? Yes I am"),
        Cue::new(3.0, 4.0, "certain."),
        Cue::new(4.0, 5.0, "Good."),
    ];
    let result = segment_by_sentence(&cues);

    assert_eq!(result.len(), 3);
    assert_eq!(
        result[0].text,
        "<v Bob><prosody duration=\"1000ms\">Are you</prosody> <prosody duration=\"1238ms\">sure?</prosody>"
    );
    assert!(result[1].text.starts_with("<v Ann><prosody duration=\""));
    assert!(result[1].text.ends_with("\">Yes I am</prosody> <prosody duration=\"1000ms\">certain.</prosody>"));
    assert_eq!(result[1].text.matches("<v ").count(), 1);
    assert_eq!(result[2].text, "<v Ann>Good.");
}

#[test]
fn test_sentences_withVoiceOnlyInClosingCue_shouldVoiceWholeSentence() {
    let cues = vec![
        Cue::new(0.0, 1.0, "Hello"),
        Cue::new(1.0, 2.0, "<v Ann>there."),
        Cue::new(2.0, 3.0, "Bye."),
    ];
    let texts: Vec<String> = segment_by_sentence(&cues).into_iter().map(|c| c.text).collect();

    assert_eq!(
        texts,
        vec![
            "<v Ann><prosody duration=\"1000ms\">Hello</prosody> <prosody duration=\"1000ms\">there.</prosody>",
            "<v Ann>Bye.",
        ]
    );
}

#[test]
fn test_sentences_withMiddleCues_shouldFoldThemIntoOpeningSpan() {
    let cues = vec![
        Cue::new(0.0, 1.0, "One"),
        Cue::new(1.5, 2.0, "two"),
        Cue::new(2.5, 3.5, "three."),
    ];
    let result = segment_by_sentence(&cues);

    assert_eq!(result.len(), 1);
    assert_eq!(
        result[0].text,
        "<v Speaker1><prosody duration=\"2000ms\">One two</prosody> <break time=\"500ms\"/><prosody duration=\"1000ms\">three.</prosody>"
    );
    assert_eq!(result[0].end, 3.5);

    let display = reflow_for_display(&result);
    let texts: Vec<&str> = display.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["One two", "three."]);
    assert!(approx_eq(display[0].end, 2.0));
    assert!(approx_eq(display[1].start, 2.5));
}

#[test]
fn test_sentences_withTrailingClosingTag_shouldKeepItWithSentence() {
    let cues = vec![Cue::new(0.0, 1.1, "Hello. </i>"), Cue::new(1.1, 2.0, "Next one.")];
    let result = segment_by_sentence(&cues);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].text, "<v Speaker1>Hello.</i>");
    assert_eq!(result[0].end, 1.1);
    assert_eq!(result[1].text, "<v Speaker1>Next one.");
    assert_eq!(result[1].start, 1.1);

    let merged = segment_by_sentence(&[
        Cue::new(0.0, 1.0, "Wait"),
        Cue::new(1.0, 2.0, "for it. </i>"),
        Cue::new(2.0, 3.0, "Done."),
    ]);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].end, 2.0);
    assert_eq!(merged[1].text, "<v Speaker1>Done.");
    assert_eq!(merged[1].start, 2.0);
}

#[test]
fn test_sentences_withCustomSpeakerAndEmptyCues() {
    let cues = vec![Cue::new(0.0, 1.0, "   "), Cue::new(1.0, 2.0, "Hi! Bye?")];
    let result = SentenceSegmenter::with_default_speaker("Narrator").segment(&cues);

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].text, "<v Narrator>Hi!");
    assert_eq!(result[1].text, "<v Narrator>Bye?");
    assert!(approx_eq(result[0].end, 1.5));
}

#[test]
fn test_sentences_voiceNameWithPeriod_shouldNotSplit() {
    let result = segment_by_sentence(&[Cue::new(0.0, 1.0, "<v Dr. Who>Run.")]);
    assert_eq!(result.len(), 1);
    assert_eq!(markup::voice_name_of(&result[0].text).as_deref(), Some("Dr. Who"));
}

#[test]
fn test_parseToSentences_shouldRenderVtt() {
    let text = "WEBVTT\n\n00:00:00.000 --> 00:00:04.000\nHello world. Goodbye now.\n";
    let rendered = parse_to_sentences(text).unwrap();

    assert_eq!(
        rendered,
        "WEBVTT\r\n\r\n1\r\n00:00:00.000 --> 00:00:02.080\r\n<v Speaker1>Hello world.\r\n\r\n2\r\n00:00:02.080 --> 00:00:04.000\r\n<v Speaker1>Goodbye now.\r\n"
    );
    assert!(parse_to_sentences("garbage").is_err());
}

#[test]
fn test_reflow_shouldUndoSentenceMerge() {
    let display = reflow_for_display(&segment_by_sentence(&dialogue()));
    let texts: Vec<&str> = display.iter().map(|c| c.text.as_str()).collect();

    assert_eq!(texts, vec!["Hello", "world, my friend.", "How are", "you?"]);
    assert_eq!(display[0].end, 2.0);
    assert!(approx_eq(display[1].start, 2.5));
    assert!(approx_eq(display[1].end, 3.58));
    assert!(approx_eq(display[2].start, 3.58));
    assert!(approx_eq(display[3].start, 4.0));
    assert_eq!(display[3].end, 5.0);
}

#[test]
fn test_reflow_withCustomLimit_shouldSplitPlainCues() {
    let cues = vec![Cue::new(0.0, 4.0, "<v A>one two three four five six")];

    assert_eq!(DisplayReflow::default().reflow(&cues).len(), 1);

    let split = DisplayReflow::new(12).reflow(&cues);
    assert_eq!(split.len(), 2);
    assert_eq!(split[0].text, "one two");
    assert_eq!(split[1].text, "three four five six");
}

#[test]
fn test_duration_segmentsShouldCoverPlaytime() {
    let cues: Vec<Cue> = (0..12)
        .map(|i| Cue::new(i as f64 * 3.0, i as f64 * 3.0 + 2.0, format!("Line {}.", i)))
        .collect();
    let segmenter = DurationSegmenter::new(10.0).unwrap();
    let segments = segmenter.segment(&cues);
    let last_end = cues.last().map(|c| c.end).unwrap();

    assert_eq!(segmenter.segment_length(), 10.0);
    assert!(segments.len() > 1);
    let total: f64 = segments.iter().map(|s| s.duration).sum();
    assert!((total - last_end).abs() <= 0.01, "total {} vs {}", total, last_end);
    for cue in &cues {
        assert!(segments.iter().any(|s| s.cues.contains(cue)), "missing {:?}", cue.text);
    }
}

#[test]
fn test_duration_withInvalidLength_shouldFail() {
    assert!(segment_by_duration(&dialogue(), -1.0).is_err());
    assert!(DurationSegmenter::new(f64::INFINITY).is_err());
}
