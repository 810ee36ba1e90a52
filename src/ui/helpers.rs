use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::error::RosterError;
use crate::models::Statistics;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Turn a controller error into the sentence shown to the user.
pub(crate) fn surface_error(err: &RosterError) -> String {
    match err {
        RosterError::Validation(inner) => format!("Invalid input: {inner}."),
        RosterError::Selection => "Select a student first.".to_string(),
        RosterError::NotFound { .. } => "That student no longer exists.".to_string(),
        RosterError::Storage { .. } | RosterError::Io { .. } => format!("Database error: {err}"),
    }
}

pub(crate) fn statistics_line(stats: &Statistics) -> String {
    format!(
        "Students: {}  |  Avg attendance: {:.1} days  |  Avg homework: {:.1} pts",
        stats.count, stats.avg_attendance, stats.avg_homework_score
    )
}
