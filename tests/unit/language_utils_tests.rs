/*!
 * Tests for ISO language code utilities
 */

use yajtwai::language_utils::{
    LanguageCodeType, get_language_name, language_codes_match, normalize_to_part1_or_part2t, normalize_to_part2t,
    validate_language_code,
};

/// Test validation of the three ISO 639 forms
#[test]
fn test_validate_language_code_withValidCodes_shouldReturnType() {
    assert_eq!(validate_language_code("ar").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("spa").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("ger").unwrap(), LanguageCodeType::Part2B);
    assert_eq!(validate_language_code("zh-TW").unwrap(), LanguageCodeType::Part1);
}

/// Test rejection of codes that are not languages
#[test]
fn test_validate_language_code_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("zz").is_err());
    assert!(validate_language_code("arabic").is_err());
    assert!(validate_language_code("pt-").is_err());
}

/// Test normalization to ISO 639-2/T
#[test]
fn test_normalize_to_part2t_withVariousCodes_shouldReturnThreeLetters() {
    assert_eq!(normalize_to_part2t("fr").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("fre").unwrap(), "fra");
    assert_eq!(normalize_to_part2t("pt-BR").unwrap(), "por");
    assert!(normalize_to_part2t("zz").is_err());
}

/// Test normalization to what translation services expect
#[test]
fn test_normalize_to_part1_withRegionSubtag_shouldKeepRegion() {
    assert_eq!(normalize_to_part1_or_part2t("ger").unwrap(), "de");
    assert_eq!(normalize_to_part1_or_part2t("pt_br").unwrap(), "pt-BR");
    assert_eq!(normalize_to_part1_or_part2t("AR").unwrap(), "ar");
}

/// Test matching of equivalent codes
#[test]
fn test_language_codes_match_withEquivalentCodes_shouldMatch() {
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("zh", "chi"));
    assert!(!language_codes_match("en", "auto"));
}

/// Test language name lookup
#[test]
fn test_get_language_name_withValidCode_shouldReturnEnglishName() {
    assert_eq!(get_language_name("fr").unwrap(), "French");
    assert_eq!(get_language_name("deu").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
}
