//! Domain types for courses, outcomes, questions and reviews.
//!
//! Plain data structs mirroring the SQLite schema; all view types carry
//! serde derives so the embedding layer can pass them straight through.

pub mod enums;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use enums::{KlLevel, PaperStatus, ReviewStatus};

/// A course as set up by the department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub course_code: String,
    pub course_name: String,
    pub semester: Option<i32>,
    pub syllabus: Option<String>,
}

/// A stated learning objective of a course.
///
/// Keyword order is the declaration order and is significant for
/// tie-breaking in the outcome matcher; duplicates are harmless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOutcome {
    pub id: Uuid,
    pub course_id: Uuid,
    pub co_number: String,
    pub description: String,
    pub keywords: Vec<String>,
}

/// One question row of a named paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub paper_title: String,
    pub section: String,
    pub question_no: String,
    pub marks: i32,
    pub question: String,
    /// Null until the question has been classified.
    pub kl_level: Option<KlLevel>,
    /// Null until the question has been mapped to an outcome.
    pub co_id: Option<Uuid>,
}

/// A scrutinizer's decision on one question of one paper.
///
/// Keyed by (paper_title, question_no); the latest write wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReview {
    pub paper_title: String,
    pub question_no: String,
    pub status: ReviewStatus,
    pub suggestion_text: Option<String>,
    pub reviewed_at: NaiveDateTime,
}

/// Review progress counts for one paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub total: i64,
    pub approved: i64,
    pub suggested: i64,
    pub reviewed: i64,
}

/// Derived aggregate review state of a paper.
///
/// Recomputed from the review rows on every mutation, never patched
/// incrementally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperClassification {
    pub status: PaperStatus,
    pub progress: Progress,
}

/// Membership row of the approved set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovedPaper {
    pub paper_title: String,
    pub approved_at: NaiveDateTime,
}

/// Membership row of the needs-revision set, with the joined reasons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnapprovedPaper {
    pub paper_title: String,
    pub reason: String,
    pub updated_at: NaiveDateTime,
}
