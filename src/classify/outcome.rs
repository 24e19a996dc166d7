//! Course-outcome matcher.
//!
//! Scores every candidate outcome with two signals: substring-related
//! keyword pairs (strong, sparse) and Jaccard token overlap against the
//! outcome's description plus keywords (weak, dense). The dense signal
//! compensates for outcomes with thin or missing keyword lists. An
//! outcome is always selected when at least one exists — a poor match is
//! reported as low confidence, never as "no match".

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::verbs::extract_keywords;
use crate::error::{ServiceError, ServiceResult};
use crate::models::CourseOutcome;

/// Keyword-pair bonus per substring-related pair.
const KEYWORD_PAIR_BONUS: f64 = 2.0;
/// Weight applied to the Jaccard similarity signal.
const SIMILARITY_WEIGHT: f64 = 10.0;
/// Confidence floor and ceiling for any selection.
const CONFIDENCE_FLOOR: f64 = 60.0;
const CONFIDENCE_CEILING: f64 = 95.0;
const CONFIDENCE_SCALE: f64 = 5.0;

/// Outcome selection for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoResult {
    pub number: String,
    pub id: Uuid,
    pub description: String,
    pub confidence: u8,
    pub matched_keywords: Vec<String>,
}

/// Select the best-matching course outcome for a question text.
///
/// Deterministic: identical inputs yield identical selection and
/// confidence. Ties, including the all-zero-score case, resolve to the
/// first-declared outcome. Confidence is always within [60, 95].
pub fn match_outcome(question_text: &str, outcomes: &[CourseOutcome]) -> ServiceResult<CoResult> {
    let first = outcomes.first().ok_or_else(|| {
        ServiceError::Validation("At least one course outcome is required".into())
    })?;

    let question_keywords = extract_keywords(question_text);

    let mut best = first;
    let mut max_score = score_outcome(question_text, &question_keywords, first);

    for co in &outcomes[1..] {
        let score = score_outcome(question_text, &question_keywords, co);
        if score > max_score {
            max_score = score;
            best = co;
        }
    }

    let confidence = (CONFIDENCE_FLOOR + max_score * CONFIDENCE_SCALE)
        .min(CONFIDENCE_CEILING)
        .round() as u8;

    Ok(CoResult {
        number: best.co_number.clone(),
        id: best.id,
        description: best.description.clone(),
        confidence,
        matched_keywords: question_keywords,
    })
}

fn score_outcome(question_text: &str, question_keywords: &[String], co: &CourseOutcome) -> f64 {
    let mut score = 0.0;

    // Strong signal: substring-related keyword pairs, either direction.
    for q_kw in question_keywords {
        for co_kw in &co.keywords {
            let co_kw = co_kw.to_lowercase();
            if co_kw.contains(q_kw.as_str()) || q_kw.contains(co_kw.as_str()) {
                score += KEYWORD_PAIR_BONUS;
            }
        }
    }

    // Dense signal: whole-text overlap with description + keywords.
    let co_text = format!("{} {}", co.description, co.keywords.join(" "));
    score += jaccard_similarity(question_text, &co_text) * SIMILARITY_WEIGHT;

    score
}

/// Jaccard similarity on whitespace-split lowercase tokens.
fn jaccard_similarity(text1: &str, text2: &str) -> f64 {
    use std::collections::HashSet;

    let set1: HashSet<String> = text1.to_lowercase().split_whitespace().map(String::from).collect();
    let set2: HashSet<String> = text2.to_lowercase().split_whitespace().map(String::from).collect();

    let union = set1.union(&set2).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set1.intersection(&set2).count();
    intersection as f64 / union as f64
}
