//! Finalized paper structure handed to the external PDF renderer.
//!
//! The renderer is a separate collaborator; this module only assembles
//! the data it consumes.

use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::repository::{get_course, get_outcomes_for_course, get_questions_for_paper};
use crate::error::{ServiceError, ServiceResult};
use crate::models::enums::ExamFormat;
use crate::models::{Course, CourseOutcome, Question};

/// Everything the PDF renderer needs for one finalized paper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperExport {
    pub course_info: Course,
    pub course_outcomes: Vec<CourseOutcome>,
    pub questions: Vec<Question>,
    pub exam_format: ExamFormat,
}

/// Assemble the renderer payload for one paper of one course.
///
/// Fails with `NotFound` when the course does not exist or the paper has
/// no questions.
pub fn paper_export(
    conn: &Connection,
    course_id: &Uuid,
    paper_title: &str,
    exam_format: ExamFormat,
) -> ServiceResult<PaperExport> {
    let course = get_course(conn, course_id)?
        .ok_or_else(|| ServiceError::not_found("course", course_id.to_string()))?;

    let questions = get_questions_for_paper(conn, paper_title)?;
    if questions.is_empty() {
        return Err(ServiceError::not_found("paper", paper_title));
    }

    let course_outcomes = get_outcomes_for_course(conn, course_id)?;

    Ok(PaperExport {
        course_info: course,
        course_outcomes,
        questions,
        exam_format,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::repository::{create_course_with_outcomes, insert_question};

    fn seed(conn: &Connection) -> Uuid {
        let course = Course {
            id: Uuid::new_v4(),
            course_code: "CS8601".into(),
            course_name: "Compiler Design".into(),
            semester: Some(6),
            syllabus: None,
        };
        let outcomes = vec![CourseOutcome {
            id: Uuid::new_v4(),
            course_id: course.id,
            co_number: "CO1".into(),
            description: "Construct lexical analyzers".into(),
            keywords: vec!["lexer".into(), "token".into()],
        }];
        create_course_with_outcomes(conn, &course, &outcomes).unwrap();

        insert_question(
            conn,
            &Question {
                id: Uuid::new_v4(),
                paper_title: "CAT-I CD".into(),
                section: "2M".into(),
                question_no: "1".into(),
                marks: 2,
                question: "Define a token".into(),
                kl_level: None,
                co_id: None,
            },
        )
        .unwrap();
        course.id
    }

    #[test]
    fn export_carries_course_outcomes_and_questions() {
        let conn = open_memory_database().unwrap();
        let course_id = seed(&conn);

        let export = paper_export(&conn, &course_id, "CAT-I CD", ExamFormat::Cat).unwrap();
        assert_eq!(export.course_info.course_code, "CS8601");
        assert_eq!(export.course_outcomes.len(), 1);
        assert_eq!(export.questions.len(), 1);

        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["exam_format"], "CAT");
    }

    #[test]
    fn missing_course_is_not_found() {
        let conn = open_memory_database().unwrap();
        seed(&conn);
        let err = paper_export(&conn, &Uuid::new_v4(), "CAT-I CD", ExamFormat::Sem);
        assert!(matches!(err, Err(ServiceError::NotFound { .. })));
    }

    #[test]
    fn paper_without_questions_is_not_found() {
        let conn = open_memory_database().unwrap();
        let course_id = seed(&conn);
        let err = paper_export(&conn, &course_id, "nonexistent", ExamFormat::Sem);
        assert!(matches!(err, Err(ServiceError::NotFound { .. })));
    }
}
