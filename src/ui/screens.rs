use crate::models::{RosterView, Statistics, Student};

/// The student table as currently displayed, with the highlighted row.
#[derive(Default)]
pub(crate) struct RosterScreen {
    pub(crate) students: Vec<Student>,
    pub(crate) statistics: Statistics,
    pub(crate) cursor: usize,
}

impl RosterScreen {
    pub(crate) fn new(view: RosterView) -> Self {
        let mut screen = Self::default();
        screen.apply(view);
        screen
    }

    /// Swap in a fresh result set, keeping the cursor on the same record when
    /// it is still listed.
    pub(crate) fn apply(&mut self, view: RosterView) {
        let focused = self.current_student().map(|s| s.id);
        self.students = view.students;
        self.statistics = view.statistics;
        if let Some(id) = focused {
            if let Some(idx) = self.students.iter().position(|s| s.id == id) {
                self.cursor = idx;
                return;
            }
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn focus(&mut self, id: i64) {
        if let Some(idx) = self.students.iter().position(|s| s.id == id) {
            self.cursor = idx;
        }
    }

    pub(crate) fn current_student(&self) -> Option<&Student> {
        self.students.get(self.cursor)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.students.is_empty() {
            return;
        }
        let len = self.students.len() as isize;
        let new = (self.cursor as isize + offset).clamp(0, len - 1);
        self.cursor = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.cursor = self.students.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.students.is_empty() {
            self.cursor = 0;
        } else if self.cursor >= self.students.len() {
            self.cursor = self.students.len() - 1;
        }
    }
}
