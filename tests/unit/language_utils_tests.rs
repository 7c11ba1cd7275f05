/*!
 * Tests for language code utilities
 */

use voicevtt::language_utils::{get_language_name, is_valid_language, language_codes_match, normalize_language};

#[test]
fn test_normalize_language_withThreeLetterCodes_shouldReturnShortCodes() {
    assert_eq!(normalize_language("fra").unwrap(), "fr");
    assert_eq!(normalize_language("fre").unwrap(), "fr");
    assert_eq!(normalize_language("pt_BR").unwrap(), "pt-BR");
    assert_eq!(normalize_language("ger-AT").unwrap(), "de-AT");
}

#[test]
fn test_normalize_language_withoutShortForm_shouldKeepThreeLetters() {
    // Hawaiian has no ISO 639-1 code
    assert_eq!(normalize_language("haw").unwrap(), "haw");
}

#[test]
fn test_normalize_language_withInvalidCode_shouldFail() {
    assert!(normalize_language("").is_err());
    assert!(normalize_language("zz").is_err());
    assert!(normalize_language("toolong").is_err());
}

#[test]
fn test_is_valid_language_shouldAcceptRegions() {
    assert!(is_valid_language("en-GB"));
    assert!(is_valid_language("deu"));
    assert!(!is_valid_language("q"));
}

#[test]
fn test_language_codes_match_andNames() {
    assert!(language_codes_match("nl", "dut"));
    assert_eq!(get_language_name("ger").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
}
