//! Session controller: the only place user intents turn into store calls.
//!
//! The terminal shell forwards raw form text and list selections here and
//! renders whatever comes back. Validation always completes before the store
//! is touched, so rejected input never reaches the database.

use tracing::{debug, warn};

use crate::db::RecordStore;
use crate::error::{Result, RosterError};
use crate::models::{RosterView, Student, StudentInput};

pub struct SessionController {
    store: RecordStore,
    selected_id: Option<i64>,
}

impl SessionController {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            selected_id: None,
        }
    }

    /// Id of the record currently mirrored into the form, if any.
    pub fn selected_id(&self) -> Option<i64> {
        self.selected_id
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn submit_create(&mut self, input: &StudentInput) -> Result<RosterView> {
        let draft = input.validate().inspect_err(|err| {
            warn!(%err, "rejected new student");
        })?;
        let view = self.store.in_transaction(|store| {
            store.create(&draft)?;
            snapshot(store)
        })?;
        self.selected_id = None;
        Ok(view)
    }

    /// Overwrite the selected record with the form contents. The selection is
    /// checked before the input so an empty selection is reported even when
    /// the form is also invalid.
    pub fn submit_update(&mut self, input: &StudentInput) -> Result<RosterView> {
        let id = self.selected_id.ok_or(RosterError::Selection)?;
        let draft = input.validate().inspect_err(|err| {
            warn!(id, %err, "rejected student update");
        })?;
        let view = self
            .store
            .in_transaction(|store| {
                store.update(id, &draft)?;
                snapshot(store)
            })
            .inspect_err(|err| self.forget_missing(err))?;
        self.selected_id = None;
        Ok(view)
    }

    /// Remove the selected record. Asking the user for confirmation is left to
    /// the shell.
    pub fn submit_delete(&mut self) -> Result<RosterView> {
        let id = self.selected_id.ok_or(RosterError::Selection)?;
        let view = self
            .store
            .in_transaction(|store| {
                store.delete(id)?;
                snapshot(store)
            })
            .inspect_err(|err| self.forget_missing(err))?;
        self.selected_id = None;
        Ok(view)
    }

    pub fn select(&mut self, id: i64) -> Result<Student> {
        let student = self.store.find(id)?;
        self.selected_id = Some(id);
        debug!(id, "selected student");
        Ok(student)
    }

    /// Drop the selection and hand back a blank form.
    pub fn clear(&mut self) -> StudentInput {
        self.selected_id = None;
        StudentInput::default()
    }

    pub fn search(&self, term: &str) -> Result<RosterView> {
        Ok(RosterView {
            students: self.store.search(term.trim())?,
            statistics: self.store.aggregate_statistics()?,
        })
    }

    pub fn refresh(&self) -> Result<RosterView> {
        snapshot(&self.store)
    }

    /// Release the database. Called once when the application exits.
    pub fn shutdown(self) -> Result<()> {
        self.store.close()
    }

    fn forget_missing(&mut self, err: &RosterError) {
        if let RosterError::NotFound { id } = err {
            warn!(id, "selected student vanished");
            self.selected_id = None;
        }
    }
}

/// Full list plus statistics. Mutations read this inside their transaction so
/// a failed read rolls the write back instead of reporting an error for a
/// change that was kept.
fn snapshot(store: &RecordStore) -> Result<RosterView> {
    Ok(RosterView {
        students: store.list_all()?,
        statistics: store.aggregate_statistics()?,
    })
}
