//! Scrutinizer review workflow and paper-level aggregation.
//!
//! A paper's classification is derived state: it is recomputed from the
//! review rows on every mutation rather than patched incrementally, so
//! the aggregate can never drift from its source facts. Every
//! read-decide-write sequence runs inside one IMMEDIATE transaction and
//! rolls back as a unit on failure; a review row must never be visible
//! without its matching set-membership update.

use std::collections::BTreeMap;
use std::str::FromStr;

use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::{Deserialize, Serialize};

use crate::db::repository::{
    count_distinct_questions, delete_approved, delete_unapproved, distinct_paper_titles,
    distinct_question_numbers, get_all_reviews, get_approved_papers, get_questions_for_paper,
    get_review, get_unapproved_papers, review_counts, suggested_reviews, upsert_approved,
    upsert_review, upsert_unapproved,
};
use crate::db::DatabaseError;
use crate::error::{ServiceError, ServiceResult};
use crate::models::enums::{PaperStatus, ReviewStatus};
use crate::models::{
    ApprovedPaper, PaperClassification, Progress, QuestionReview, UnapprovedPaper,
};

/// Placeholder reason when a scrutinizer flagged a question without text.
const DEFAULT_SUGGESTION: &str = "revision needed";

/// One question of a paper joined with its current review, for listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewedQuestion {
    pub question_no: String,
    pub marks: i32,
    pub question: String,
    pub review_status: Option<ReviewStatus>,
    pub review_suggestion: Option<String>,
}

/// A paper with its questions grouped by section and its fresh
/// classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperView {
    pub paper_title: String,
    pub sections: BTreeMap<String, Vec<ReviewedQuestion>>,
    pub status: PaperStatus,
    pub progress: Progress,
}

/// Result of a bulk review action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkReviewResult {
    pub classification: PaperClassification,
    pub updated_count: usize,
}

/// Cross-paper review standing: both derived sets plus the papers in
/// neither.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperOverview {
    pub approved: Vec<ApprovedPaper>,
    pub unapproved: Vec<UnapprovedPaper>,
    pub pending: Vec<String>,
}

/// Exam sections a paper may carry, in presentation order.
const SECTIONS: &[&str] = &["2M", "6M", "12M"];

// ---------------------------------------------------------------------------
// Aggregation state machine
// ---------------------------------------------------------------------------

/// Recompute one paper's classification and update set membership.
///
/// Decision table, first match wins:
/// no questions -> PENDING; all approved -> APPROVED; any suggestion ->
/// NEEDS_REVISION; anything reviewed -> IN_PROGRESS; else PENDING.
/// Runs on the caller's transaction so the counts, the decision and the
/// membership writes see one consistent snapshot.
fn classify_paper_locked(
    tx: &Transaction<'_>,
    paper_title: &str,
) -> Result<PaperClassification, DatabaseError> {
    let total = count_distinct_questions(tx, paper_title)?;
    if total == 0 {
        return Ok(PaperClassification {
            status: PaperStatus::Pending,
            progress: Progress {
                total: 0,
                approved: 0,
                suggested: 0,
                reviewed: 0,
            },
        });
    }

    let (approved, suggested) = review_counts(tx, paper_title)?;
    let reviewed = approved + suggested;
    let progress = Progress {
        total,
        approved,
        suggested,
        reviewed,
    };

    tracing::debug!(
        paper = paper_title,
        total,
        approved,
        suggested,
        "Recomputing paper classification"
    );

    let status = if approved == total {
        upsert_approved(tx, paper_title)?;
        delete_unapproved(tx, paper_title)?;
        PaperStatus::Approved
    } else if suggested > 0 {
        let reason = revision_reason(tx, paper_title)?;
        upsert_unapproved(tx, paper_title, &reason)?;
        delete_approved(tx, paper_title)?;
        PaperStatus::NeedsRevision
    } else if reviewed > 0 {
        delete_approved(tx, paper_title)?;
        delete_unapproved(tx, paper_title)?;
        PaperStatus::InProgress
    } else {
        PaperStatus::Pending
    };

    Ok(PaperClassification { status, progress })
}

/// Join each suggested question's number and text into the needs-revision
/// reason, in question order.
fn revision_reason(tx: &Transaction<'_>, paper_title: &str) -> Result<String, DatabaseError> {
    let mut suggestions = suggested_reviews(tx, paper_title)?;
    suggestions.sort_by(|a, b| question_sort_key(&a.0).cmp(&question_sort_key(&b.0)));

    let parts: Vec<String> = suggestions
        .iter()
        .map(|(no, text)| {
            let text = match text.as_deref() {
                Some(t) if !t.trim().is_empty() => t,
                _ => DEFAULT_SUGGESTION,
            };
            format!("Q{no}: {text}")
        })
        .collect();
    Ok(parts.join(" | "))
}

/// Natural ordering key for question numbers: numeric part first, then
/// the raw string ("2" before "10", "1a" before "1b").
fn question_sort_key(question_no: &str) -> (i64, String) {
    let digits: String = question_no.chars().filter(|c| c.is_ascii_digit()).collect();
    (digits.parse().unwrap_or(0), question_no.to_string())
}

/// Recompute one paper's classification inside its own transaction.
pub fn classify_paper(
    conn: &mut Connection,
    paper_title: &str,
) -> ServiceResult<PaperClassification> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let classification = classify_paper_locked(&tx, paper_title)?;
    tx.commit()?;
    Ok(classification)
}

// ---------------------------------------------------------------------------
// Review submission
// ---------------------------------------------------------------------------

/// Record one scrutinizer decision and recompute the paper's aggregate.
///
/// Overwrites any prior review of the same question (latest write wins).
/// The upsert and the recomputation commit or roll back together.
pub fn submit_review(
    conn: &mut Connection,
    paper_title: &str,
    question_no: &str,
    status: &str,
    suggestion_text: Option<&str>,
) -> ServiceResult<PaperClassification> {
    if paper_title.trim().is_empty() || question_no.trim().is_empty() {
        return Err(ServiceError::Validation(
            "paper_title and question_no are required".into(),
        ));
    }
    let status = parse_review_status(status)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    upsert_review(&tx, paper_title, question_no, status, suggestion_text)?;
    let classification = classify_paper_locked(&tx, paper_title)?;
    tx.commit()?;

    tracing::info!(
        paper = paper_title,
        question = question_no,
        status = status.as_str(),
        outcome = classification.status.as_str(),
        "Review recorded"
    );
    Ok(classification)
}

/// Apply one status to every distinct question of a paper, then run a
/// single aggregation pass.
///
/// Clears suggestion text on every touched question.
pub fn bulk_review(
    conn: &mut Connection,
    paper_title: &str,
    status: &str,
) -> ServiceResult<BulkReviewResult> {
    if paper_title.trim().is_empty() {
        return Err(ServiceError::Validation("paper_title is required".into()));
    }
    let status = parse_review_status(status)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let numbers = distinct_question_numbers(&tx, paper_title)?;
    for question_no in &numbers {
        upsert_review(&tx, paper_title, question_no, status, None)?;
    }
    let classification = classify_paper_locked(&tx, paper_title)?;
    tx.commit()?;

    tracing::info!(
        paper = paper_title,
        status = status.as_str(),
        updated = numbers.len(),
        "Bulk review applied"
    );
    Ok(BulkReviewResult {
        classification,
        updated_count: numbers.len(),
    })
}

fn parse_review_status(status: &str) -> ServiceResult<ReviewStatus> {
    ReviewStatus::from_str(status)
        .map_err(|_| ServiceError::Validation(format!("Invalid review status: {status}")))
}

// ---------------------------------------------------------------------------
// Listing and overview
// ---------------------------------------------------------------------------

/// All papers with questions grouped by section, joined reviews, and a
/// freshly recomputed classification per paper.
pub fn list_papers(conn: &mut Connection) -> ServiceResult<Vec<PaperView>> {
    let titles = distinct_paper_titles(conn)?;

    let mut papers = Vec::with_capacity(titles.len());
    for title in titles {
        let mut questions = get_questions_for_paper(conn, &title)?;
        questions.sort_by(|a, b| {
            (a.section.as_str(), question_sort_key(&a.question_no))
                .cmp(&(b.section.as_str(), question_sort_key(&b.question_no)))
        });

        let mut sections: BTreeMap<String, Vec<ReviewedQuestion>> = SECTIONS
            .iter()
            .map(|s| (s.to_string(), Vec::new()))
            .collect();

        for q in questions {
            // Questions in unknown sections are not listed.
            let Some(bucket) = sections.get_mut(&q.section) else {
                continue;
            };
            let review = get_review(conn, &title, &q.question_no)?;
            bucket.push(ReviewedQuestion {
                question_no: q.question_no,
                marks: q.marks,
                question: q.question,
                review_status: review.as_ref().map(|r| r.status),
                review_suggestion: review.and_then(|r| r.suggestion_text),
            });
        }

        let classification = classify_paper(conn, &title)?;
        papers.push(PaperView {
            paper_title: title,
            sections,
            status: classification.status,
            progress: classification.progress,
        });
    }
    Ok(papers)
}

/// All reviews, most recent first.
pub fn list_reviews(conn: &Connection) -> ServiceResult<Vec<QuestionReview>> {
    Ok(get_all_reviews(conn)?)
}

/// Review standing across all papers.
///
/// A paper is pending when it belongs to neither derived set.
pub fn paper_overview(conn: &Connection) -> ServiceResult<PaperOverview> {
    let approved = get_approved_papers(conn)?;
    let unapproved = get_unapproved_papers(conn)?;
    let all_titles = distinct_paper_titles(conn)?;

    let classified: std::collections::HashSet<&str> = approved
        .iter()
        .map(|p| p.paper_title.as_str())
        .chain(unapproved.iter().map(|p| p.paper_title.as_str()))
        .collect();

    let pending: Vec<String> = all_titles
        .into_iter()
        .filter(|t| !classified.contains(t.as_str()))
        .collect();

    Ok(PaperOverview {
        approved,
        unapproved,
        pending,
    })
}
