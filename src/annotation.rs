/*!
 * Speaker, style and synthesis annotations for cue sequences.
 *
 * Works on sentence-segmented cues: each cue names its speaker with a voice
 * tag and may carry an `<emphasis level="...">` style. From those the module
 * builds the JSON document that drives speech synthesis, and the noise-gate
 * envelope used to duck the original audio around synthesized speech.
 */

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::cue::Cue;
use crate::errors::SubtitleError;
use crate::language_utils;
use crate::markup::{self, Token};
use crate::segmentation::DEFAULT_SPEAKER;

/// Speaker named by a cue payload, if it has a voice tag
pub fn speaker_of(text: &str) -> Option<String> {
    markup::voice_name_of(text)
}

/// Distinct speakers in order of first appearance
///
/// Cues without a voice tag are attributed to the default speaker.
pub fn get_speakers(cues: &[Cue]) -> Vec<String> {
    let mut speakers: Vec<String> = Vec::new();
    for cue in cues {
        let speaker = speaker_of(&cue.text).unwrap_or_else(|| DEFAULT_SPEAKER.to_string());
        if !speakers.contains(&speaker) {
            speakers.push(speaker);
        }
    }
    speakers
}

/// Style level of a cue payload
pub fn get_style(text: &str) -> Option<String> {
    markup::emphasis_level(text)
}

/// Payload without its speaker tag
pub fn remove_speaker(text: &str) -> String {
    markup::remove_first_voice_tag(text)
}

/// Payload without any tag
pub fn remove_tags(text: &str) -> String {
    markup::strip_tags(text)
}

/// Set the style of the cue at `index`
///
/// An existing emphasis opening tag is replaced; otherwise the whole payload
/// is wrapped in a new emphasis span.
pub fn assign_style_to_cue(cues: &[Cue], style: &str, index: usize) -> Result<Vec<Cue>, SubtitleError> {
    let target = cues.get(index).ok_or(SubtitleError::CueIndexOutOfRange {
        index,
        count: cues.len(),
    })?;

    let emphasis = format!("<emphasis level=\"{}\">", style);
    let tokens = markup::scan(&target.text);
    let existing = tokens.iter().position(|t| matches!(t, Token::Emphasis { .. }));

    let text = match existing {
        Some(position) => tokens
            .iter()
            .enumerate()
            .map(|(i, token)| if i == position { emphasis.as_str() } else { token.raw() })
            .collect(),
        None => format!("{}{}</emphasis>", emphasis, target.text),
    };

    let mut styled = cues.to_vec();
    styled[index].text = text;
    Ok(styled)
}

/// Voice model assignment for one speaker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerModel {
    pub speaker: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub default_style: Option<String>,
}

impl SpeakerModel {
    pub fn new(speaker: impl Into<String>, model: Option<String>, default_style: Option<String>) -> Self {
        Self {
            speaker: speaker.into(),
            model,
            default_style,
        }
    }
}

/// Parse the compact `[["speaker", "model", "style"], ...]` form
///
/// The model may be `null` and the style may be omitted.
pub fn parse_speaker_models(json: &str) -> Result<Vec<SpeakerModel>, SubtitleError> {
    let rows: Vec<Vec<Option<String>>> =
        serde_json::from_str(json).map_err(|e| SubtitleError::InvalidSpeakerModels(e.to_string()))?;

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut fields = row.into_iter();
            let speaker = fields.next().flatten().ok_or_else(|| {
                SubtitleError::InvalidSpeakerModels(format!("entry {} has no speaker name", i))
            })?;
            Ok(SpeakerModel::new(speaker, fields.next().flatten(), fields.next().flatten()))
        })
        .collect()
}

/// One sentence to synthesize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub synthesize: bool,
}

/// Everything one speaker says
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeakerContent {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
    #[serde(rename = "defaultStyle", skip_serializing_if = "Option::is_none", default)]
    pub default_style: Option<String>,
    pub sentences: Vec<Sentence>,
}

/// Root of the synthesis JSON document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SynthesisDocument {
    pub speakers: BTreeMap<String, SpeakerContent>,
}

// Sound descriptions like "[music]" or "(laughs)" are shown, not spoken
fn is_speakable(text: &str) -> bool {
    let plain = markup::strip_tags(text);
    let plain = plain.trim();
    let described = (plain.starts_with('[') && plain.ends_with(']'))
        || (plain.starts_with('(') && plain.ends_with(')'));
    !described && plain.chars().any(char::is_alphanumeric)
}

/// Build the synthesis document for a sentence-segmented cue sequence
pub fn build_synthesis_document(language: &str, models: &[SpeakerModel], cues: &[Cue]) -> SynthesisDocument {
    let language = match language_utils::normalize_language(language) {
        Ok(code) => code,
        Err(e) => {
            warn!("Language code issue: {}", e);
            language.trim().to_string()
        }
    };

    let mut speakers: BTreeMap<String, SpeakerContent> = BTreeMap::new();

    for cue in cues {
        let speaker = speaker_of(&cue.text).unwrap_or_else(|| DEFAULT_SPEAKER.to_string());

        let content = speakers.entry(speaker.clone()).or_insert_with(|| {
            let model = models.iter().find(|m| m.speaker == speaker);
            SpeakerContent {
                language: language.clone(),
                model: model.and_then(|m| m.model.clone()),
                default_style: model.and_then(|m| m.default_style.clone()),
                sentences: Vec::new(),
            }
        });

        content.sentences.push(Sentence {
            text: remove_speaker(&cue.text),
            start: cue.start,
            end: cue.end,
            synthesize: is_speakable(&cue.text),
        });
    }

    debug!("Built synthesis document for {} speakers", speakers.len());
    SynthesisDocument { speakers }
}

/// Synthesis document serialized as JSON
pub fn synthesis_json(language: &str, models: &[SpeakerModel], cues: &[Cue]) -> Result<String, serde_json::Error> {
    serde_json::to_string(&build_synthesis_document(language, models, cues))
}

/// Gain envelope for the original audio track
///
/// Each point is `(time, gain)`; gain drops to 0 while cues play and ramps
/// back to 1 over `transition` seconds in gaps long enough to fit both ramps.
pub fn noise_gate_points(cues: &[Cue], transition: f64) -> Vec<(f64, f64)> {
    let mut points = Vec::new();

    for (i, cue) in cues.iter().enumerate() {
        let previous_end = if i > 0 { cues[i - 1].end } else { 0.0 };
        let next_start = cues.get(i + 1).map_or(cue.end + transition, |next| next.start);

        if cue.start - transition > previous_end + transition {
            points.push((cue.start - transition, 1.0));
            points.push((cue.start, 0.0));
        }

        if cue.end + transition < next_start - transition {
            points.push((cue.end, 0.0));
            points.push((cue.end + transition, 1.0));
        }
    }

    points
}

/// Noise-gate envelope as a JSON array of `[time, gain]` pairs
pub fn noise_gate_json(cues: &[Cue], transition: f64) -> Result<String, serde_json::Error> {
    serde_json::to_string(&noise_gate_points(cues, transition))
}
