//! Error taxonomy shared by the record store and the session controller.
//!
//! User-correctable problems (bad input, nothing selected, a record that has
//! vanished) are kept apart from storage failures so the terminal shell can
//! decide whether to simply show a message or also resynchronize its list.

use thiserror::Error;

/// Business-rule failures raised while turning raw form text into a draft.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,
    #[error("not a number: {field}")]
    NotANumber { field: &'static str },
    #[error("{field} out of range ({min}-{max})")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Update or delete requested while no record is loaded in the form.
    #[error("no student selected")]
    Selection,
    #[error("student #{id} no longer exists")]
    NotFound { id: i64 },
    #[error("{context}: {source}")]
    Storage {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl RosterError {
    /// True for errors the user can fix by correcting input or selection.
    /// Storage and I/O failures abort the operation instead.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            RosterError::Validation(_) | RosterError::Selection | RosterError::NotFound { .. }
        )
    }
}

/// Attach a short description to raw SQLite failures, in the same spirit as
/// `anyhow::Context` but keeping the typed error.
pub trait StorageContext<T> {
    fn storage(self, context: &'static str) -> Result<T, RosterError>;
}

impl<T> StorageContext<T> for Result<T, rusqlite::Error> {
    fn storage(self, context: &'static str) -> Result<T, RosterError> {
        self.map_err(|source| RosterError::Storage { context, source })
    }
}

pub type Result<T, E = RosterError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_read_like_the_form_labels() {
        assert_eq!(ValidationError::NameRequired.to_string(), "name required");
        let err = ValidationError::OutOfRange {
            field: "attendance",
            min: 0,
            max: 365,
        };
        assert_eq!(err.to_string(), "attendance out of range (0-365)");
        let err = ValidationError::NotANumber {
            field: "homework_score",
        };
        assert_eq!(err.to_string(), "not a number: homework_score");
    }

    #[test]
    fn storage_failures_are_not_recoverable() {
        let err = Err::<(), _>(rusqlite::Error::InvalidQuery).storage("failed to load students");
        let err = err.unwrap_err();
        assert!(!err.is_recoverable());
        assert!(err.to_string().starts_with("failed to load students"));
        assert!(RosterError::Selection.is_recoverable());
        assert!(RosterError::NotFound { id: 3 }.is_recoverable());
    }
}
