//! Question analysis — KL and CO classification for one question.
//!
//! Pure orchestration over the two classifiers: load the course's outcome
//! set, run both classifiers independently, and return the combined
//! result. No additional logic lives here.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::{self, CoResult, KlResult};
use crate::db::repository::get_outcomes_for_course;
use crate::error::{ServiceError, ServiceResult};

/// Combined classification of one question against one course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub question: String,
    pub kl: KlResult,
    pub co: CoResult,
}

/// Analyze a question: Bloom's level plus best-matching course outcome.
///
/// Fails with `Validation` when the text is empty or whitespace, and with
/// `NotFound` when the course has no outcomes to match against.
pub fn analyze_question(
    conn: &Connection,
    question_text: &str,
    course_id: &Uuid,
) -> ServiceResult<AnalysisResult> {
    if question_text.trim().is_empty() {
        return Err(ServiceError::Validation("Question text is required".into()));
    }

    let outcomes = get_outcomes_for_course(conn, course_id)?;
    if outcomes.is_empty() {
        return Err(ServiceError::not_found(
            "course outcomes",
            course_id.to_string(),
        ));
    }

    // The two classifiers share no state and run independently.
    let kl = classify::classify(question_text);
    let co = classify::match_outcome(question_text, &outcomes)?;

    tracing::debug!(
        level = kl.level.as_str(),
        kl_confidence = kl.confidence,
        outcome = %co.number,
        co_confidence = co.confidence,
        "Question analyzed"
    );

    Ok(AnalysisResult {
        question: question_text.to_string(),
        kl,
        co,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::create_course_with_outcomes;
    use crate::models::enums::KlLevel;
    use crate::models::{Course, CourseOutcome};

    fn seed_course(conn: &Connection) -> Uuid {
        let course = Course {
            id: Uuid::new_v4(),
            course_code: "CS8492".into(),
            course_name: "Database Management Systems".into(),
            semester: Some(4),
            syllabus: None,
        };
        let outcomes = vec![
            CourseOutcome {
                id: Uuid::new_v4(),
                course_id: course.id,
                co_number: "CO1".into(),
                description: "Understand relational models and schemas".into(),
                keywords: vec!["relational".into(), "schema".into(), "model".into()],
            },
            CourseOutcome {
                id: Uuid::new_v4(),
                course_id: course.id,
                co_number: "CO2".into(),
                description: "Design normalized database schemas".into(),
                keywords: vec!["normalization".into(), "normal form".into()],
            },
        ];
        create_course_with_outcomes(conn, &course, &outcomes).unwrap();
        course.id
    }

    #[test]
    fn combines_both_classifier_results() {
        let conn = open_memory_database().unwrap();
        let course_id = seed_course(&conn);

        let result = analyze_question(
            &conn,
            "Design a normalized schema and justify the normalization steps",
            &course_id,
        )
        .unwrap();

        assert_eq!(result.kl.level, KlLevel::K5);
        assert_eq!(result.co.number, "CO2");
        assert!(result.co.confidence >= 60 && result.co.confidence <= 95);
    }

    #[test]
    fn empty_text_is_a_validation_error() {
        let conn = open_memory_database().unwrap();
        let course_id = seed_course(&conn);

        let err = analyze_question(&conn, "   ", &course_id);
        assert!(matches!(err, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn course_without_outcomes_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = analyze_question(&conn, "Define a schema", &Uuid::new_v4());
        assert!(matches!(err, Err(ServiceError::NotFound { .. })));
    }

    #[test]
    fn serializes_with_expected_shape() {
        let conn = open_memory_database().unwrap();
        let course_id = seed_course(&conn);

        let result = analyze_question(&conn, "Define the relational model", &course_id).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert!(json["kl"]["level"].is_string());
        assert!(json["kl"]["confidence"].is_number());
        assert!(json["co"]["number"].is_string());
        assert!(json["co"]["matched_keywords"].is_array());
    }
}
