use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::{Course, CourseOutcome};

pub fn insert_course(conn: &Connection, course: &Course) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO courses (id, course_code, course_name, semester, syllabus)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            course.id.to_string(),
            course.course_code,
            course.course_name,
            course.semester,
            course.syllabus,
        ],
    )?;
    Ok(())
}

pub fn insert_course_outcome(conn: &Connection, co: &CourseOutcome) -> Result<(), DatabaseError> {
    let keywords_json = serde_json::to_string(&co.keywords)
        .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?;
    conn.execute(
        "INSERT INTO course_outcomes (id, course_id, co_number, description, keywords)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            co.id.to_string(),
            co.course_id.to_string(),
            co.co_number,
            co.description,
            keywords_json,
        ],
    )?;
    Ok(())
}

/// Create a course together with its outcomes in one atomic unit.
pub fn create_course_with_outcomes(
    conn: &Connection,
    course: &Course,
    outcomes: &[CourseOutcome],
) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    insert_course(&tx, course)?;
    for co in outcomes {
        insert_course_outcome(&tx, co)?;
    }
    tx.commit()?;

    tracing::info!(
        course_code = %course.course_code,
        outcomes = outcomes.len(),
        "Course created"
    );
    Ok(())
}

pub fn get_course(conn: &Connection, id: &Uuid) -> Result<Option<Course>, DatabaseError> {
    let result = conn.query_row(
        "SELECT id, course_code, course_name, semester, syllabus
         FROM courses WHERE id = ?1",
        params![id.to_string()],
        |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<i32>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        },
    );

    match result {
        Ok((id, course_code, course_name, semester, syllabus)) => Ok(Some(Course {
            id: parse_uuid(&id)?,
            course_code,
            course_name,
            semester,
            syllabus,
        })),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_all_courses(conn: &Connection) -> Result<Vec<Course>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, course_code, course_name, semester, syllabus
         FROM courses ORDER BY course_code",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<i32>>(3)?,
            row.get::<_, Option<String>>(4)?,
        ))
    })?;

    let mut courses = Vec::new();
    for row in rows {
        let (id, course_code, course_name, semester, syllabus) = row?;
        courses.push(Course {
            id: parse_uuid(&id)?,
            course_code,
            course_name,
            semester,
            syllabus,
        });
    }
    Ok(courses)
}

/// Outcomes of a course in declaration order.
///
/// Insertion order, not the CO label: `CO10` sorts lexicographically
/// before `CO2`, which would break first-declared tie-breaking.
pub fn get_outcomes_for_course(
    conn: &Connection,
    course_id: &Uuid,
) -> Result<Vec<CourseOutcome>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, course_id, co_number, description, keywords
         FROM course_outcomes WHERE course_id = ?1 ORDER BY rowid",
    )?;

    let rows = stmt.query_map(params![course_id.to_string()], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut outcomes = Vec::new();
    for row in rows {
        let (id, course_id, co_number, description, keywords) = row?;
        outcomes.push(CourseOutcome {
            id: parse_uuid(&id)?,
            course_id: parse_uuid(&course_id)?,
            co_number,
            description,
            keywords: serde_json::from_str(&keywords)
                .map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))?,
        });
    }
    Ok(outcomes)
}

pub(crate) fn parse_uuid(s: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(s).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}
