//! Domain models that mirror the `students` table and flow between the store,
//! the controller and the terminal shell. They stay plain data holders; the
//! only logic here is turning raw form text into a validated draft.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::ValidationError;

/// Valid number of attended days in a school year.
pub const ATTENDANCE_RANGE: RangeInclusive<i64> = 0..=365;
/// Valid homework score.
pub const HOMEWORK_SCORE_RANGE: RangeInclusive<i64> = 0..=100;

/// A stored row. The `id` is assigned by SQLite and never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub attendance: i64,
    pub homework_score: i64,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validated field set used for inserts and full-row updates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentDraft {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub attendance: i64,
    pub homework_score: i64,
}

/// Raw text of the five input fields exactly as the shell captured it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StudentInput {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub attendance: String,
    pub homework_score: String,
}

impl StudentInput {
    /// Mirror a stored record into editable text.
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            address: student.address.clone(),
            phone: student.phone.clone(),
            attendance: student.attendance.to_string(),
            homework_score: student.homework_score.to_string(),
        }
    }

    /// Trim, check the required name, parse both counters, then range-check
    /// them. Every check runs before anything touches persistence.
    pub fn validate(&self) -> Result<StudentDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::NameRequired);
        }

        let attendance = parse_count("attendance", &self.attendance)?;
        let homework_score = parse_count("homework_score", &self.homework_score)?;

        check_range("attendance", attendance, &ATTENDANCE_RANGE)?;
        check_range("homework_score", homework_score, &HOMEWORK_SCORE_RANGE)?;

        Ok(StudentDraft {
            name: name.to_string(),
            address: self.address.trim().to_string(),
            phone: self.phone.trim().to_string(),
            attendance,
            homework_score,
        })
    }
}

/// Blank input counts as zero, matching the column defaults.
fn parse_count(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>()
        .map_err(|_| ValidationError::NotANumber { field })
}

fn check_range(
    field: &'static str,
    value: i64,
    range: &RangeInclusive<i64>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Aggregates shown under the student table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Statistics {
    pub count: i64,
    pub avg_attendance: f64,
    pub avg_homework_score: f64,
}

/// Everything the shell needs to re-render after an operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterView {
    pub students: Vec<Student>,
    pub statistics: Statistics,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, attendance: &str, score: &str) -> StudentInput {
        StudentInput {
            name: name.to_string(),
            address: "  12 Elm St ".to_string(),
            phone: " 555-0101".to_string(),
            attendance: attendance.to_string(),
            homework_score: score.to_string(),
        }
    }

    #[test]
    fn validate_trims_text_and_defaults_blank_counts() {
        let draft = input("  Kim  ", "", " ").validate().unwrap();
        assert_eq!(draft.name, "Kim");
        assert_eq!(draft.address, "12 Elm St");
        assert_eq!(draft.phone, "555-0101");
        assert_eq!(draft.attendance, 0);
        assert_eq!(draft.homework_score, 0);
    }

    #[test]
    fn whitespace_name_is_rejected_first() {
        let err = input("   ", "abc", "900").validate().unwrap_err();
        assert_eq!(err, ValidationError::NameRequired);
    }

    #[test]
    fn non_numeric_counts_are_rejected() {
        let err = input("Kim", "ten", "5").validate().unwrap_err();
        assert_eq!(err, ValidationError::NotANumber { field: "attendance" });
        let err = input("Kim", "10", "9.5").validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotANumber {
                field: "homework_score"
            }
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(input("Kim", "0", "0").validate().is_ok());
        assert!(input("Kim", "365", "100").validate().is_ok());

        for attendance in ["-1", "366", "10000"] {
            let err = input("Kim", attendance, "50").validate().unwrap_err();
            assert!(matches!(
                err,
                ValidationError::OutOfRange {
                    field: "attendance",
                    ..
                }
            ));
        }
        for score in ["-1", "101"] {
            let err = input("Kim", "10", score).validate().unwrap_err();
            assert!(matches!(
                err,
                ValidationError::OutOfRange {
                    field: "homework_score",
                    ..
                }
            ));
        }
    }

    #[test]
    fn from_student_mirrors_every_field() {
        let student = Student {
            id: 4,
            name: "Lee".to_string(),
            address: "Busan".to_string(),
            phone: "010".to_string(),
            attendance: 120,
            homework_score: 88,
        };
        let mirrored = StudentInput::from_student(&student);
        assert_eq!(
            mirrored.validate().unwrap(),
            StudentDraft {
                name: "Lee".to_string(),
                address: "Busan".to_string(),
                phone: "010".to_string(),
                attendance: 120,
                homework_score: 88,
            }
        );
    }
}
