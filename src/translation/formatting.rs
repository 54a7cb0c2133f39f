/*!
 * Post-processing of translated strings.
 *
 * Two concerns live here:
 * - sanitizing every translated leaf so it can be written back into a JSON
 *   bundle without manual correction
 * - cleaning up the chatter LLM providers wrap around a translation
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that are replaced by a plain apostrophe in translated output
const QUOTE_CHARS: [char; 3] = ['"', '\u{201C}', '\u{201D}'];

/// "Translation:" style prefixes some models emit before the answer
static ANSWER_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(translation|translated text|traduction|traducción)\s*:\s*").unwrap()
});

/// Sanitize a translated leaf
///
/// Double quotes (straight and typographic) become `'`, and control
/// characters other than newline and tab are dropped. The result is safe to
/// embed in a JSON string and reads the same to a translator.
pub fn sanitize_translation(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .map(|c| if QUOTE_CHARS.contains(&c) { '\'' } else { c })
        .collect()
}

/// Strip the wrapping an LLM tends to add around a one-string answer
///
/// Removes a leading "Translation:" label, a code fence, or a pair of
/// surrounding quotes that the source text did not have, then restores the
/// source's leading and trailing whitespace.
pub fn clean_model_output(source: &str, translated: &str) -> String {
    let mut result = translated.trim().to_string();

    if let Some(stripped) = strip_code_fence(&result) {
        result = stripped;
    }

    result = ANSWER_PREFIX_REGEX.replace(&result, "").to_string();

    let source_trimmed = source.trim();
    for (open, close) in [('"', '"'), ('\u{201C}', '\u{201D}'), ('\'', '\'')] {
        let wrapped = result.len() >= 2 && result.starts_with(open) && result.ends_with(close);
        let source_wrapped = source_trimmed.starts_with(open) && source_trimmed.ends_with(close);
        if wrapped && !source_wrapped {
            result = result[open.len_utf8()..result.len() - close.len_utf8()].trim().to_string();
            break;
        }
    }

    let leading = &source[..source.len() - source.trim_start().len()];
    let trailing = &source[source.trim_end().len()..];
    format!("{}{}{}", leading, result, trailing)
}

fn strip_code_fence(text: &str) -> Option<String> {
    let inner = text.strip_prefix("```")?.strip_suffix("```")?;
    // Drop an optional language tag on the opening fence line
    let inner = match inner.split_once('\n') {
        Some((tag, rest)) if !tag.contains(' ') => rest,
        _ => inner,
    };
    Some(inner.trim().to_string())
}
