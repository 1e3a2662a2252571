//! Cheap heuristic for hiding repository descriptions that are probably not
//! English. Misclassification only affects what is displayed.

use std::collections::HashSet;

use crate::model::{Repository, SearchResponse};

const MIN_CLASSIFIABLE_LEN: usize = 10;

const COMMON_ENGLISH_WORDS: [&str; 58] = [
    "the", "a", "an", "and", "or", "but", "is", "are", "in", "on", "at", "to", "for", "with",
    "by", "as", "of", "this", "that", "it", "from", "be", "have", "has", "had", "do", "does",
    "did", "can", "could", "will", "would", "should", "not", "you", "use", "using", "used",
    "simple", "easy", "library", "project", "code", "data", "time", "app", "application", "web",
    "make", "create", "build", "tool", "api", "cli", "user", "github", "repository", "repo",
];

const CODE_CHARS: [char; 9] = ['{', '}', '[', ']', '<', '>', '/', '\\', '='];

/// Returns true when `text` is empty, too short to judge, or looks English.
pub fn is_english_text(text: Option<&str>) -> bool {
    let Some(text) = text else {
        return true;
    };
    if text.trim().is_empty() {
        return true;
    }

    let total_chars = text.chars().count();
    if total_chars < MIN_CLASSIFIABLE_LEN {
        return true;
    }

    let common_words = count_common_words(text);
    let latin_chars = text.chars().filter(|c| c.is_ascii_alphabetic()).count();
    let latin_ratio = latin_chars as f64 / total_chars as f64;

    let non_latin_ratio = if text.chars().any(is_non_latin_script) {
        1.0 - latin_ratio
    } else {
        0.0
    };
    if non_latin_ratio > 0.5 {
        return false;
    }

    if looks_like_code(text) || has_identifier_naming(text) {
        return common_words >= 1 || latin_ratio > 0.6;
    }

    common_words >= 2 || latin_ratio > 0.7
}

/// Drops repositories whose description fails [`is_english_text`]. The
/// upstream `total_count` is left untouched so paging still lines up.
pub fn retain_english(response: &mut SearchResponse) -> usize {
    let before = response.items.len();
    response
        .items
        .retain(|repo: &Repository| is_english_text(repo.description.as_deref()));
    before - response.items.len()
}

/// Number of distinct common English words appearing as whole words.
fn count_common_words(text: &str) -> usize {
    let lower = text.to_lowercase();
    let words: HashSet<&str> = lower
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .collect();
    COMMON_ENGLISH_WORDS
        .iter()
        .filter(|w| words.contains(*w))
        .count()
}

fn is_non_latin_script(c: char) -> bool {
    matches!(c,
        '\u{4e00}'..='\u{9fff}'     // CJK unified ideographs
        | '\u{3040}'..='\u{309f}'   // hiragana
        | '\u{30a0}'..='\u{30ff}'   // katakana
        | '\u{ac00}'..='\u{d7af}'   // hangul
        | '\u{0400}'..='\u{04ff}'   // cyrillic
        | '\u{0600}'..='\u{06ff}'   // arabic
    )
}

fn looks_like_code(text: &str) -> bool {
    text.contains(&CODE_CHARS[..])
        || text.contains("http://")
        || text.contains("https://")
        || text.contains('`')
        || text.contains("/*")
        || text.contains("*/")
}

/// camelCase or snake_case somewhere in the text.
fn has_identifier_naming(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.windows(2).any(|pair| {
        (pair[0].is_ascii_lowercase() && pair[1].is_ascii_uppercase())
            || (pair[0] == '_' && pair[1].is_ascii_lowercase())
    })
}
