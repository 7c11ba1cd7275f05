//! Language utilities for the synthesis export
//!
//! Speech engines expect short ISO 639-1 codes where one exists. Users type
//! anything from `en` to `eng`, `ger` or `en-US`, so codes are normalized
//! before they reach the JSON document.

use anyhow::{Result, anyhow};
use isolang::Language;

/// ISO 639-2/B codes that differ from their ISO 639-2/T form
const BIBLIOGRAPHIC_CODES: [(&str, &str); 18] = [
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Split `en-US` / `pt_BR` into the primary subtag and the rest
fn split_region(code: &str) -> (String, Option<String>) {
    let code = code.trim();
    match code.split_once(['-', '_']) {
        Some((primary, region)) if !region.is_empty() => {
            (primary.to_lowercase(), Some(region.to_string()))
        }
        _ => (code.to_lowercase(), None),
    }
}

fn lookup(primary: &str) -> Option<Language> {
    match primary.len() {
        2 => Language::from_639_1(primary),
        3 => {
            let terminology = BIBLIOGRAPHIC_CODES
                .iter()
                .find(|(bibliographic, _)| *bibliographic == primary)
                .map_or(primary, |(_, terminology)| *terminology);
            Language::from_639_3(terminology)
        }
        _ => None,
    }
}

/// Normalize a language code to ISO 639-1 if possible, ISO 639-2/T otherwise
///
/// A region subtag is kept: `ger-AT` becomes `de-AT`.
pub fn normalize_language(code: &str) -> Result<String> {
    let (primary, region) = split_region(code);
    let language = lookup(&primary).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;

    let short = language
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| language.to_639_3().to_string());

    Ok(match region {
        Some(region) => format!("{}-{}", short, region),
        None => short,
    })
}

/// Check if a language code is recognised
pub fn is_valid_language(code: &str) -> bool {
    lookup(&split_region(code).0).is_some()
}

/// Check if two language codes represent the same language
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (lookup(&split_region(code1).0), lookup(&split_region(code2).0)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let (primary, _) = split_region(code);
    let language = lookup(&primary).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(language.to_name().to_string())
}
