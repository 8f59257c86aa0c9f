//! Headword extraction.
//!
//! dict.cc phrases carry articles, grammatical annotations and whole idioms
//! ("das Haus {n}", "jdn. auf den Arm nehmen [ugs.]"). Each phrase is indexed
//! under a single headword: the longest word left after removing bracketed
//! annotations and punctuation. The choice is a heuristic and can pick a less
//! distinctive word for idioms.

use once_cell::sync::Lazy;
use regex::Regex;

// Each bracket kind is removed up to its first closing bracket; nesting is not tracked.
static ANNOTATIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\([^)]*\)|\{[^}]*\}|\[[^\]]*\]").expect("annotation pattern is valid")
});

// Keeps letters (umlauts and ß included), digits, underscore, whitespace and hyphen.
static NON_WORD_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s-]").expect("word character pattern is valid")
});

/// Returns the lowercase headword for `phrase`, or `None` if nothing indexable
/// remains.
///
/// # Examples
///
/// ```
/// use dictcc::builder::headword::extract_headword;
///
/// assert_eq!(extract_headword("Word").as_deref(), Some("word"));
/// assert_eq!(extract_headword("go (coll.)").as_deref(), Some("go"));
/// assert_eq!(extract_headword("a bb cc").as_deref(), Some("bb"));
/// assert_eq!(extract_headword("(only) [brackets]"), None);
/// ```
pub fn extract_headword(phrase: &str) -> Option<String> {
    let stripped = ANNOTATIONS.replace_all(phrase, "");
    let lowered = stripped.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    let cleaned = NON_WORD_CHARS.replace_all(&lowered, "");

    // max_by_key keeps the last maximum, so fold to keep the first one.
    cleaned
        .split_whitespace()
        .fold(None::<(usize, &str)>, |best, token| {
            let len = token.chars().count();
            match best {
                Some((best_len, _)) if best_len >= len => best,
                _ => Some((len, token)),
            }
        })
        .map(|(_, token)| token.to_string())
}
