use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{Result, RosterError, StorageContext, ValidationError};
use crate::models::{Statistics, Student, StudentDraft};

/// Column list shared by every row-returning query so `map_student` can rely
/// on positional access. INTEGER affinity still lets older files hold REAL or
/// TEXT counters; the casts truncate them to whole numbers.
const STUDENT_COLUMNS: &str = "id, name, address, phone,
     CAST(attendance AS INTEGER), CAST(homework_score AS INTEGER)";

/// Build a `Student` from a row. Files created by older tools may hold NULL
/// in the optional columns, which read back as empty text or zero.
fn map_student(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        phone: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
        attendance: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
        homework_score: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
    })
}

/// Every student ordered by name. Names compare by their stored bytes; the id
/// breaks ties so duplicate names keep a stable order.
pub fn fetch_students(conn: &Connection) -> Result<Vec<Student>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students ORDER BY name, id"
        ))
        .storage("failed to prepare student query")?;

    let students = stmt
        .query_map([], map_student)
        .storage("failed to load students")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .storage("failed to collect students")?;

    debug!(count = students.len(), "loaded students");
    Ok(students)
}

/// Case-sensitive substring match over name, address and phone. `instr` is
/// used instead of `LIKE` because SQLite's `LIKE` folds ASCII case.
pub fn search_students(conn: &Connection, term: &str) -> Result<Vec<Student>> {
    if term.is_empty() {
        return fetch_students(conn);
    }

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students
             WHERE instr(name, ?1) > 0
                OR instr(COALESCE(address, ''), ?1) > 0
                OR instr(COALESCE(phone, ''), ?1) > 0
             ORDER BY name, id"
        ))
        .storage("failed to prepare student search")?;

    let students = stmt
        .query_map([term], map_student)
        .storage("failed to search students")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .storage("failed to collect search results")?;

    debug!(term, count = students.len(), "searched students");
    Ok(students)
}

pub fn fetch_student(conn: &Connection, id: i64) -> Result<Student> {
    conn.query_row(
        &format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?1"),
        [id],
        map_student,
    )
    .optional()
    .storage("failed to load student")?
    .ok_or(RosterError::NotFound { id })
}

/// Insert a new row and return the id SQLite assigned to it.
pub fn create_student(conn: &Connection, draft: &StudentDraft) -> Result<i64> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::NameRequired.into());
    }

    conn.execute(
        "INSERT INTO students (name, address, phone, attendance, homework_score)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            draft.name,
            draft.address,
            draft.phone,
            draft.attendance,
            draft.homework_score
        ],
    )
    .storage("failed to insert student")?;

    let id = conn.last_insert_rowid();
    info!(id, name = %draft.name, "created student");
    Ok(id)
}

/// Replace every mutable column of an existing row in one statement.
pub fn update_student(conn: &Connection, id: i64, draft: &StudentDraft) -> Result<()> {
    if draft.name.trim().is_empty() {
        return Err(ValidationError::NameRequired.into());
    }

    let updated = conn
        .execute(
            "UPDATE students
             SET name = ?1, address = ?2, phone = ?3, attendance = ?4, homework_score = ?5
             WHERE id = ?6",
            params![
                draft.name,
                draft.address,
                draft.phone,
                draft.attendance,
                draft.homework_score,
                id
            ],
        )
        .storage("failed to update student")?;

    if updated == 0 {
        Err(RosterError::NotFound { id })
    } else {
        info!(id, "updated student");
        Ok(())
    }
}

pub fn delete_student(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM students WHERE id = ?1", [id])
        .storage("failed to delete student")?;

    if deleted == 0 {
        Err(RosterError::NotFound { id })
    } else {
        info!(id, "deleted student");
        Ok(())
    }
}

/// Row count plus mean attendance and homework score, averaged over the same
/// whole-number values the list shows. `AVG` yields NULL on an empty table,
/// which is reported as 0.0.
pub fn fetch_statistics(conn: &Connection) -> Result<Statistics> {
    conn.query_row(
        "SELECT COUNT(*),
                COALESCE(AVG(COALESCE(CAST(attendance AS INTEGER), 0)), 0.0),
                COALESCE(AVG(COALESCE(CAST(homework_score AS INTEGER), 0)), 0.0)
         FROM students",
        [],
        |row| {
            Ok(Statistics {
                count: row.get(0)?,
                avg_attendance: row.get(1)?,
                avg_homework_score: row.get(2)?,
            })
        },
    )
    .storage("failed to compute statistics")
}
