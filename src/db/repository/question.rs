use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::course::parse_uuid;
use crate::db::DatabaseError;
use crate::models::enums::KlLevel;
use crate::models::Question;

pub fn insert_question(conn: &Connection, q: &Question) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO questions (id, paper_title, section, question_no, marks, question,
         kl_level, co_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            q.id.to_string(),
            q.paper_title,
            q.section,
            q.question_no,
            q.marks,
            q.question,
            q.kl_level.map(|l| l.as_str()),
            q.co_id.map(|id| id.to_string()),
        ],
    )?;
    Ok(())
}

/// Record the classifier outputs on an existing question.
pub fn update_question_classification(
    conn: &Connection,
    id: &Uuid,
    kl_level: KlLevel,
    co_id: Option<&Uuid>,
) -> Result<(), DatabaseError> {
    let updated = conn.execute(
        "UPDATE questions SET kl_level = ?2, co_id = ?3 WHERE id = ?1",
        params![
            id.to_string(),
            kl_level.as_str(),
            co_id.map(|c| c.to_string()),
        ],
    )?;
    if updated == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "Question".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// Distinct question count for one paper.
pub fn count_distinct_questions(conn: &Connection, paper_title: &str) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(DISTINCT question_no) FROM questions WHERE paper_title = ?1",
        params![paper_title],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

/// Distinct question numbers of one paper.
pub fn distinct_question_numbers(
    conn: &Connection,
    paper_title: &str,
) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT question_no FROM questions WHERE paper_title = ?1",
    )?;
    let rows = stmt.query_map(params![paper_title], |row| row.get::<_, String>(0))?;

    let mut numbers = Vec::new();
    for row in rows {
        numbers.push(row?);
    }
    Ok(numbers)
}

/// All distinct paper titles known to the store.
pub fn distinct_paper_titles(conn: &Connection) -> Result<Vec<String>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT DISTINCT paper_title FROM questions ORDER BY paper_title")?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut titles = Vec::new();
    for row in rows {
        titles.push(row?);
    }
    Ok(titles)
}

pub fn get_questions_for_paper(
    conn: &Connection,
    paper_title: &str,
) -> Result<Vec<Question>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, paper_title, section, question_no, marks, question, kl_level, co_id
         FROM questions WHERE paper_title = ?1",
    )?;

    let rows = stmt.query_map(params![paper_title], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i32>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, Option<String>>(7)?,
        ))
    })?;

    let mut questions = Vec::new();
    for row in rows {
        let (id, paper_title, section, question_no, marks, question, kl_level, co_id) = row?;
        questions.push(Question {
            id: parse_uuid(&id)?,
            paper_title,
            section,
            question_no,
            marks,
            question,
            kl_level: kl_level.as_deref().map(KlLevel::from_str).transpose()?,
            co_id: co_id.as_deref().map(parse_uuid).transpose()?,
        });
    }
    Ok(questions)
}
