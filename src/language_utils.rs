use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating, normalizing, and
/// matching ISO 639-1 (2-letter) and ISO 639-2 (3-letter) language codes.
/// Region subtags (`pt-BR`, `zh_TW`) are accepted and carried through; only
/// the primary subtag is checked.
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
const PART2B_TO_PART2T: [(&str, &str); 18] = [
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

fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    PART2B_TO_PART2T
        .iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Split `pt-BR` / `zh_TW` into the lowercase primary subtag and the rest
fn split_tag(code: &str) -> (String, Option<&str>) {
    let code = code.trim();
    match code.find(['-', '_']) {
        Some(pos) => (code[..pos].to_lowercase(), Some(&code[pos + 1..])),
        None => (code.to_lowercase(), None),
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let (primary, region) = split_tag(code);

    if let Some(region) = region {
        let region_ok = (2..=4).contains(&region.len()) && region.chars().all(|c| c.is_ascii_alphanumeric());
        if !region_ok {
            return Err(anyhow!("Invalid region subtag in language code: {}", code));
        }
    }

    match primary.len() {
        2 if Language::from_639_1(&primary).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&primary).is_some() => Ok(LanguageCodeType::Part2T),
        3 if part2b_to_part2t(&primary).is_some() => Ok(LanguageCodeType::Part2B),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let (primary, _) = split_tag(code);

    if primary.len() == 2 {
        if let Some(lang) = Language::from_639_1(&primary) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if primary.len() == 3 {
        if Language::from_639_3(&primary).is_some() {
            return Ok(primary);
        }
        if let Some(part2t) = part2b_to_part2t(&primary) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to the form translation services expect
///
/// The primary subtag becomes ISO 639-1 when one exists (ISO 639-2/T
/// otherwise) and a region subtag is kept, upper-cased: `fre` -> `fr`,
/// `pt_br` -> `pt-BR`.
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let part2t = normalize_to_part2t(code)?;
    let primary = Language::from_639_3(&part2t)
        .and_then(|lang| lang.to_639_1())
        .map(|c| c.to_string())
        .unwrap_or(part2t);

    match split_tag(code).1 {
        Some(region) => Ok(format!("{}-{}", primary, region.to_uppercase())),
        None => Ok(primary),
    }
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
