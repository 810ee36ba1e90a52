//! Core library surface for the Student Roster application.
//!
//! The record store and session controller are usable on their own; the `ui`
//! module is the terminal shell the binary runs on top of them.
pub mod config;
pub mod controller;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use config::Config;
pub use controller::SessionController;
pub use db::RecordStore;
pub use error::{RosterError, ValidationError};
pub use models::{RosterView, Statistics, Student, StudentDraft, StudentInput};
pub use ui::{run_app, App};
