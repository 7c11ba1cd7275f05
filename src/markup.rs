/*!
 * Inline cue markup scanning.
 *
 * Cue payloads carry a small tag vocabulary: voice spans (`<v Name>`),
 * emphasis (`<emphasis level="...">`), synthesis durations
 * (`<prosody duration="Nms">`) and pauses (`<break time="Nms"/>`).
 * The scanner turns a payload into a flat token stream so the segmenters
 * work on structure instead of string offsets. Unknown tags such as `<i>`
 * are kept as opaque tokens and survive a round trip untouched.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// `name="value"` attribute pairs inside a tag
static ATTRIBUTE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*"([^"]*)""#).unwrap());

/// Closing tags recognised by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosingTag {
    Voice,
    Emphasis,
    Prosody,
}

/// One piece of a scanned cue payload
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// Plain text between tags
    Text(&'a str),
    /// `<v Name>` opening tag
    Voice { name: String, raw: &'a str },
    /// `<emphasis level="...">` opening tag
    Emphasis { level: String, raw: &'a str },
    /// `<prosody duration="...">` opening tag, duration in milliseconds
    Prosody { duration_ms: Option<f64>, raw: &'a str },
    /// `<break time="..."/>` pause, time in milliseconds
    Break { time_ms: Option<f64>, raw: &'a str },
    /// `</v>`, `</emphasis>` or `</prosody>`
    Close { tag: ClosingTag, raw: &'a str },
    /// Any other tag, kept verbatim
    Other(&'a str),
}

impl<'a> Token<'a> {
    /// Source text the token was scanned from
    pub fn raw(&self) -> &'a str {
        match self {
            Token::Text(raw) | Token::Other(raw) => raw,
            Token::Voice { raw, .. }
            | Token::Emphasis { raw, .. }
            | Token::Prosody { raw, .. }
            | Token::Break { raw, .. }
            | Token::Close { raw, .. } => raw,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(_))
    }
}

/// Split a cue payload into tokens
///
/// A `<` without a matching `>` is treated as text.
pub fn scan(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        let Some(open) = rest.find('<') else {
            tokens.push(Token::Text(rest));
            break;
        };
        let Some(close) = rest[open..].find('>').map(|offset| open + offset) else {
            tokens.push(Token::Text(rest));
            break;
        };

        if open > 0 {
            tokens.push(Token::Text(&rest[..open]));
        }
        tokens.push(classify_tag(&rest[open..=close]));
        rest = &rest[close + 1..];
    }

    tokens
}

// @classifies: Single `<...>` tag
fn classify_tag(raw: &str) -> Token<'_> {
    let inner = raw[1..raw.len() - 1].trim();

    if let Some(closing) = inner.strip_prefix('/') {
        let tag = match closing.trim() {
            "v" => Some(ClosingTag::Voice),
            "emphasis" => Some(ClosingTag::Emphasis),
            "prosody" => Some(ClosingTag::Prosody),
            _ => None,
        };
        return match tag {
            Some(tag) => Token::Close { tag, raw },
            None => Token::Other(raw),
        };
    }

    let inner = inner.trim_end_matches('/').trim_end();
    let name_len = inner
        .find(|c: char| c.is_whitespace() || c == '.' || c == '=')
        .unwrap_or(inner.len());
    let (name, attributes) = inner.split_at(name_len);

    match name {
        "v" => Token::Voice {
            name: voice_name(attributes),
            raw,
        },
        "emphasis" => Token::Emphasis {
            level: attribute(attributes, "level").unwrap_or_default(),
            raw,
        },
        "prosody" => Token::Prosody {
            duration_ms: attribute(attributes, "duration").and_then(|d| parse_time_ms(&d)),
            raw,
        },
        "break" => Token::Break {
            time_ms: attribute(attributes, "time").and_then(|t| parse_time_ms(&t)),
            raw,
        },
        _ => Token::Other(raw),
    }
}

// Accepts `<v Name>`, `<v = Name>` and `<v.class Name>`
fn voice_name(annotation: &str) -> String {
    let annotation = if annotation.starts_with('.') {
        annotation
            .find(char::is_whitespace)
            .map_or("", |idx| &annotation[idx..])
    } else {
        annotation
    };
    annotation.trim().trim_start_matches('=').trim().to_string()
}

fn attribute(attributes: &str, key: &str) -> Option<String> {
    ATTRIBUTE_REGEX
        .captures_iter(attributes)
        .find(|caps| &caps[1] == key)
        .map(|caps| caps[2].to_string())
}

/// Parse `"250ms"` or `"1.5s"` into milliseconds
pub fn parse_time_ms(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Some(ms) = value.strip_suffix("ms") {
        ms.trim().parse::<f64>().ok()
    } else if let Some(secs) = value.strip_suffix('s') {
        secs.trim().parse::<f64>().ok().map(|s| s * 1000.0)
    } else {
        value.parse::<f64>().ok()
    }
}

/// Payload with every tag removed
pub fn strip_tags(text: &str) -> String {
    scan(text)
        .into_iter()
        .filter_map(|token| match token {
            Token::Text(t) => Some(t),
            _ => None,
        })
        .collect()
}

/// Payload with `</v>` markers removed
pub fn remove_voice_closings(text: &str) -> String {
    scan(text)
        .into_iter()
        .filter(|token| !matches!(token, Token::Close { tag: ClosingTag::Voice, .. }))
        .map(|token| token.raw())
        .collect()
}

/// First voice opening tag, verbatim
pub fn voice_tag(text: &str) -> Option<&str> {
    scan(text).into_iter().find_map(|token| match token {
        Token::Voice { raw, .. } => Some(raw),
        _ => None,
    })
}

/// Speaker named by the first voice tag
pub fn voice_name_of(text: &str) -> Option<String> {
    scan(text).into_iter().find_map(|token| match token {
        Token::Voice { name, .. } => Some(name),
        _ => None,
    })
}

/// Payload without its first voice tag
pub fn remove_first_voice_tag(text: &str) -> String {
    let mut removed = false;
    scan(text)
        .into_iter()
        .filter(|token| {
            if !removed && matches!(token, Token::Voice { .. }) {
                removed = true;
                return false;
            }
            true
        })
        .map(|token| token.raw())
        .collect()
}

/// Last voice opening tag, verbatim
pub fn last_voice_tag(text: &str) -> Option<&str> {
    scan(text).into_iter().rev().find_map(|token| match token {
        Token::Voice { raw, .. } => Some(raw),
        _ => None,
    })
}

/// Payload without any voice opening tag
pub fn remove_voice_tags(text: &str) -> String {
    scan(text)
        .into_iter()
        .filter(|token| !matches!(token, Token::Voice { .. }))
        .map(|token| token.raw())
        .collect()
}

/// Level of the first emphasis tag
pub fn emphasis_level(text: &str) -> Option<String> {
    scan(text).into_iter().find_map(|token| match token {
        Token::Emphasis { level, .. } => Some(level),
        _ => None,
    })
}

/// Whether the payload carries at least one prosody duration
pub fn has_duration_annotation(text: &str) -> bool {
    scan(text)
        .iter()
        .any(|token| matches!(token, Token::Prosody { duration_ms: Some(_), .. }))
}

pub fn prosody(text: &str, duration_ms: u64) -> String {
    format!("<prosody duration=\"{}ms\">{}</prosody>", duration_ms, text)
}

pub fn break_tag(time_ms: u64) -> String {
    format!("<break time=\"{}ms\"/>", time_ms)
}

pub fn voice(name: &str) -> String {
    format!("<v {}>", name)
}

/// Text spoken inside one `<prosody>` span
#[derive(Debug, Clone, PartialEq)]
pub struct ProsodyFragment {
    /// Pause preceding the fragment, in milliseconds
    pub pause_ms: f64,
    /// Declared speech duration, in milliseconds
    pub duration_ms: f64,
    /// Plain text of the fragment
    pub text: String,
}

/// Collect the duration-annotated spans of a payload
///
/// Text outside any span is attached to the nearest span: leading text to
/// the first one, everything else to the span before it.
pub fn prosody_fragments(text: &str) -> Vec<ProsodyFragment> {
    let mut fragments: Vec<ProsodyFragment> = Vec::new();
    let mut pending_text = String::new();
    let mut pending_pause = 0.0;
    let mut open: Option<ProsodyFragment> = None;

    for token in scan(text) {
        match token {
            Token::Prosody { duration_ms: Some(duration_ms), .. } => {
                if let Some(fragment) = open.take() {
                    fragments.push(fragment);
                }
                let leading = if fragments.is_empty() {
                    std::mem::take(&mut pending_text)
                } else {
                    String::new()
                };
                open = Some(ProsodyFragment {
                    pause_ms: std::mem::take(&mut pending_pause),
                    duration_ms,
                    text: leading,
                });
            }
            Token::Close { tag: ClosingTag::Prosody, .. } => {
                if let Some(fragment) = open.take() {
                    fragments.push(fragment);
                }
            }
            Token::Break { time_ms: Some(time_ms), .. } => pending_pause += time_ms,
            Token::Text(t) => match open.as_mut().or(fragments.last_mut()) {
                Some(fragment) => fragment.text.push_str(t),
                None => pending_text.push_str(t),
            },
            _ => {}
        }
    }

    if let Some(fragment) = open.take() {
        fragments.push(fragment);
    }
    fragments
}
