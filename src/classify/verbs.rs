//! Text normalization and heuristic verb extraction.
//!
//! A lexicon-lookup tagger stands in for a full part-of-speech tagger: a
//! token counts as a verb when it, or its base form after stripping a
//! common inflection suffix, appears in the Bloom action-verb lexicon.
//! Extraction is total; text with no recognizable verbs yields an empty
//! bag, which simply disables the verb-overlap fallback downstream.

use std::sync::LazyLock;

use regex::Regex;

use super::bloom::LEVEL_RULES;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Lowercase, replace punctuation with spaces, collapse whitespace.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, " ");
    WHITESPACE.replace_all(cleaned.trim(), " ").into_owned()
}

/// Deduplicated lowercase keyword tokens of length >= 3, in text order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        let clean: String = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if clean.len() >= 3 && !keywords.contains(&clean) {
            keywords.push(clean);
        }
    }
    keywords
}

/// Extract the bag of recognized action verbs from raw text.
///
/// Returns base forms in text order, deduplicated.
pub fn extract_verbs(text: &str) -> Vec<String> {
    let normalized = normalize(text);
    let mut verbs: Vec<String> = Vec::new();
    for token in normalized.split_whitespace() {
        if let Some(base) = lookup_verb(token) {
            if !verbs.contains(&base) {
                verbs.push(base);
            }
        }
    }
    verbs
}

/// Match a token against the verb lexicon, trying the raw form first and
/// then stripping inflection suffixes ("designing" -> "design",
/// "applies" -> "apply").
fn lookup_verb(token: &str) -> Option<String> {
    if in_lexicon(token) {
        return Some(token.to_string());
    }

    for candidate in inflection_bases(token) {
        if in_lexicon(&candidate) {
            return Some(candidate);
        }
    }
    None
}

fn in_lexicon(token: &str) -> bool {
    LEVEL_RULES
        .iter()
        .any(|rules| rules.keywords.iter().any(|&kw| kw == token))
}

/// Candidate base forms for a possibly inflected token.
fn inflection_bases(token: &str) -> Vec<String> {
    let mut candidates = Vec::new();

    if let Some(stem) = token.strip_suffix("ies") {
        candidates.push(format!("{stem}y")); // applies -> apply
    }
    if let Some(stem) = token.strip_suffix("ing") {
        candidates.push(stem.to_string()); // designing -> design
        candidates.push(format!("{stem}e")); // evaluating -> evaluate
    }
    if let Some(stem) = token.strip_suffix("ed") {
        candidates.push(stem.to_string()); // designed -> design
        candidates.push(format!("{stem}e")); // analyzed -> analyze
    }
    if let Some(stem) = token.strip_suffix("es") {
        candidates.push(stem.to_string()); // analyzes -> analyze
    }
    if let Some(stem) = token.strip_suffix('s') {
        candidates.push(stem.to_string()); // designs -> design
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_collapses_space() {
        assert_eq!(
            normalize("What   is a DFA? (Give  an example.)"),
            "what is a dfa give an example"
        );
    }

    #[test]
    fn normalize_of_whitespace_only_is_empty() {
        assert_eq!(normalize("   \t  "), "");
    }

    #[test]
    fn keywords_filter_short_words_and_dedup() {
        let kws = extract_keywords("What is an NFA? An NFA is a machine");
        assert!(kws.contains(&"nfa".to_string()));
        assert!(kws.contains(&"machine".to_string()));
        assert!(!kws.contains(&"is".to_string()));
        assert!(!kws.contains(&"an".to_string()));
        assert_eq!(kws.iter().filter(|k| *k == "nfa").count(), 1);
    }

    #[test]
    fn verbs_found_in_base_form() {
        assert_eq!(extract_verbs("Design a compiler"), vec!["design"]);
    }

    #[test]
    fn verbs_found_in_inflected_forms() {
        assert_eq!(extract_verbs("Designing a compiler"), vec!["design"]);
        assert_eq!(extract_verbs("He evaluates options"), vec!["evaluate"]);
        assert_eq!(extract_verbs("She analyzed the data"), vec!["analyze"]);
    }

    #[test]
    fn no_verbs_yields_empty_bag() {
        assert!(extract_verbs("the quick brown fox").is_empty());
        assert!(extract_verbs("").is_empty());
    }
}
