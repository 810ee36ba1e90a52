//! Persistence module split across logical submodules. The free functions in
//! `students` each wrap one query; `RecordStore` ties them to the connection
//! it owns.

mod connection;
mod students;

pub use connection::{init_schema, RecordStore};
pub use students::{
    create_student, delete_student, fetch_statistics, fetch_student, fetch_students,
    search_students, update_student,
};

use crate::error::{Result, StorageContext};
use crate::models::{Statistics, Student, StudentDraft};

impl RecordStore {
    pub fn create(&self, draft: &StudentDraft) -> Result<i64> {
        create_student(&self.conn, draft)
    }

    pub fn update(&self, id: i64, draft: &StudentDraft) -> Result<()> {
        update_student(&self.conn, id, draft)
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        delete_student(&self.conn, id)
    }

    pub fn find(&self, id: i64) -> Result<Student> {
        fetch_student(&self.conn, id)
    }

    pub fn list_all(&self) -> Result<Vec<Student>> {
        fetch_students(&self.conn)
    }

    pub fn search(&self, term: &str) -> Result<Vec<Student>> {
        search_students(&self.conn, term)
    }

    pub fn aggregate_statistics(&self) -> Result<Statistics> {
        fetch_statistics(&self.conn)
    }

    /// Run `f` inside one transaction. Any error rolls back everything `f`
    /// wrote; success commits before returning.
    pub fn in_transaction<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = self
            .conn
            .unchecked_transaction()
            .storage("failed to begin transaction")?;
        let value = f(self)?;
        tx.commit().storage("failed to commit transaction")?;
        Ok(value)
    }
}
