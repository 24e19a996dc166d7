use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::db::DatabaseError;
use crate::models::enums::ReviewStatus;
use crate::models::{ApprovedPaper, QuestionReview, UnapprovedPaper};

/// Insert or overwrite the review for one question of one paper.
///
/// The (paper_title, question_no) key admits one row; a second submission
/// replaces status and suggestion and refreshes the timestamp.
pub fn upsert_review(
    conn: &Connection,
    paper_title: &str,
    question_no: &str,
    status: ReviewStatus,
    suggestion_text: Option<&str>,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO question_reviews (paper_title, question_no, status, suggestion_text, reviewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT (paper_title, question_no)
         DO UPDATE SET status = ?3, suggestion_text = ?4, reviewed_at = ?5",
        params![
            paper_title,
            question_no,
            status.as_str(),
            suggestion_text,
            Utc::now().naive_utc(),
        ],
    )?;
    Ok(())
}

/// Approved / suggested counts for one paper.
///
/// Only reviews whose question number still exists in the paper are
/// counted, so stale reviews of removed questions cannot skew the
/// aggregate.
pub fn review_counts(conn: &Connection, paper_title: &str) -> Result<(i64, i64), DatabaseError> {
    let counts = conn.query_row(
        "SELECT
           COALESCE(SUM(CASE WHEN qr.status = 'APPROVED' THEN 1 ELSE 0 END), 0),
           COALESCE(SUM(CASE WHEN qr.status = 'SUGGESTED' THEN 1 ELSE 0 END), 0)
         FROM (SELECT DISTINCT question_no FROM questions WHERE paper_title = ?1) qp
         LEFT JOIN question_reviews qr
           ON qr.question_no = qp.question_no AND qr.paper_title = ?1",
        params![paper_title],
        |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
    )?;
    Ok(counts)
}

/// Suggested reviews of one paper: (question_no, suggestion_text).
pub fn suggested_reviews(
    conn: &Connection,
    paper_title: &str,
) -> Result<Vec<(String, Option<String>)>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT question_no, suggestion_text FROM question_reviews
         WHERE paper_title = ?1 AND status = 'SUGGESTED'",
    )?;
    let rows = stmt.query_map(params![paper_title], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
    })?;

    let mut suggestions = Vec::new();
    for row in rows {
        suggestions.push(row?);
    }
    Ok(suggestions)
}

pub fn get_review(
    conn: &Connection,
    paper_title: &str,
    question_no: &str,
) -> Result<Option<QuestionReview>, DatabaseError> {
    let result = conn.query_row(
        "SELECT paper_title, question_no, status, suggestion_text, reviewed_at
         FROM question_reviews WHERE paper_title = ?1 AND question_no = ?2",
        params![paper_title, question_no],
        map_review_row,
    );

    match result {
        Ok(row) => Ok(Some(review_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// All reviews, most recent first.
pub fn get_all_reviews(conn: &Connection) -> Result<Vec<QuestionReview>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT paper_title, question_no, status, suggestion_text, reviewed_at
         FROM question_reviews ORDER BY reviewed_at DESC",
    )?;
    let rows = stmt.query_map([], map_review_row)?;

    let mut reviews = Vec::new();
    for row in rows {
        reviews.push(review_from_row(row?)?);
    }
    Ok(reviews)
}

type ReviewRow = (String, String, String, Option<String>, NaiveDateTime);

fn map_review_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReviewRow> {
    Ok((
        row.get::<_, String>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, String>(2)?,
        row.get::<_, Option<String>>(3)?,
        row.get::<_, NaiveDateTime>(4)?,
    ))
}

fn review_from_row(row: ReviewRow) -> Result<QuestionReview, DatabaseError> {
    let (paper_title, question_no, status, suggestion_text, reviewed_at) = row;
    Ok(QuestionReview {
        paper_title,
        question_no,
        status: ReviewStatus::from_str(&status)?,
        suggestion_text,
        reviewed_at,
    })
}

// ---------------------------------------------------------------------------
// Approved / needs-revision set membership
// ---------------------------------------------------------------------------

pub fn upsert_approved(conn: &Connection, paper_title: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO approved_papers (paper_title, approved_at) VALUES (?1, ?2)
         ON CONFLICT (paper_title) DO UPDATE SET approved_at = ?2",
        params![paper_title, Utc::now().naive_utc()],
    )?;
    Ok(())
}

pub fn delete_approved(conn: &Connection, paper_title: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM approved_papers WHERE paper_title = ?1",
        params![paper_title],
    )?;
    Ok(())
}

pub fn upsert_unapproved(
    conn: &Connection,
    paper_title: &str,
    reason: &str,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO unapproved_papers (paper_title, reason, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT (paper_title) DO UPDATE SET reason = ?2, updated_at = ?3",
        params![paper_title, reason, Utc::now().naive_utc()],
    )?;
    Ok(())
}

pub fn delete_unapproved(conn: &Connection, paper_title: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM unapproved_papers WHERE paper_title = ?1",
        params![paper_title],
    )?;
    Ok(())
}

pub fn get_approved_papers(conn: &Connection) -> Result<Vec<ApprovedPaper>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT paper_title, approved_at FROM approved_papers ORDER BY approved_at DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((row.get::<_, String>(0)?, row.get::<_, NaiveDateTime>(1)?))
    })?;

    let mut papers = Vec::new();
    for row in rows {
        let (paper_title, approved_at) = row?;
        papers.push(ApprovedPaper {
            paper_title,
            approved_at,
        });
    }
    Ok(papers)
}

pub fn get_unapproved_papers(conn: &Connection) -> Result<Vec<UnapprovedPaper>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT paper_title, reason, updated_at FROM unapproved_papers ORDER BY updated_at DESC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, NaiveDateTime>(2)?,
        ))
    })?;

    let mut papers = Vec::new();
    for row in rows {
        let (paper_title, reason, updated_at) = row?;
        papers.push(UnapprovedPaper {
            paper_title,
            reason,
            updated_at,
        });
    }
    Ok(papers)
}
