//! Ratatui front-end for the roster. It owns no business rules: key events go
//! to the session controller and its results are rendered back.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
