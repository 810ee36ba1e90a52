use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Student, StudentInput};

/// Fields of the student form, in focus order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum StudentField {
    #[default]
    Name,
    Address,
    Phone,
    Attendance,
    HomeworkScore,
}

impl StudentField {
    pub(crate) const ALL: [StudentField; 5] = [
        StudentField::Name,
        StudentField::Address,
        StudentField::Phone,
        StudentField::Attendance,
        StudentField::HomeworkScore,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            StudentField::Name => "Name",
            StudentField::Address => "Address",
            StudentField::Phone => "Phone",
            StudentField::Attendance => "Attendance",
            StudentField::HomeworkScore => "Homework",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            StudentField::Name => "<required>",
            StudentField::Attendance => "0-365",
            StudentField::HomeworkScore => "0-100",
            StudentField::Address | StudentField::Phone => "",
        }
    }

    fn numeric(self) -> bool {
        matches!(self, StudentField::Attendance | StudentField::HomeworkScore)
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Editable text behind the input panel, plus the last error shown in it.
#[derive(Default, Clone)]
pub(crate) struct StudentForm {
    pub(crate) input: StudentInput,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

impl StudentForm {
    /// Mirror a selected record into the fields.
    pub(crate) fn from_student(student: &Student) -> Self {
        Self {
            input: StudentInput::from_student(student),
            ..Self::default()
        }
    }

    pub(crate) fn reset(&mut self, input: StudentInput) {
        self.input = input;
        self.active = StudentField::Name;
        self.error = None;
    }

    pub(crate) fn focus_next(&mut self) {
        let next = (self.active.index() + 1) % StudentField::ALL.len();
        self.active = StudentField::ALL[next];
    }

    pub(crate) fn focus_prev(&mut self) {
        let len = StudentField::ALL.len();
        let prev = (self.active.index() + len - 1) % len;
        self.active = StudentField::ALL[prev];
    }

    fn value(&self, field: StudentField) -> &String {
        match field {
            StudentField::Name => &self.input.name,
            StudentField::Address => &self.input.address,
            StudentField::Phone => &self.input.phone,
            StudentField::Attendance => &self.input.attendance,
            StudentField::HomeworkScore => &self.input.homework_score,
        }
    }

    fn value_mut(&mut self, field: StudentField) -> &mut String {
        match field {
            StudentField::Name => &mut self.input.name,
            StudentField::Address => &mut self.input.address,
            StudentField::Phone => &mut self.input.phone,
            StudentField::Attendance => &mut self.input.attendance,
            StudentField::HomeworkScore => &mut self.input.homework_score,
        }
    }

    /// Append a character to the active field. Numeric fields accept digits
    /// and a leading sign so the controller can report range errors itself.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let field = self.active;
        let value = self.value_mut(field);
        if field.numeric() && !(ch.is_ascii_digit() || (value.is_empty() && ch == '-')) {
            return false;
        }
        value.push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Render one labelled field; the focused one is highlighted while the
    /// form is being edited.
    pub(crate) fn build_line(&self, field: StudentField, editing: bool) -> Line<'static> {
        let value = self.value(field);
        let is_active = editing && self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{:<12}", format!("{}:", field.label()))),
            Span::styled(display, style),
        ])
    }

    pub(crate) fn value_len(&self, field: StudentField) -> usize {
        self.value(field).chars().count()
    }
}

#[derive(Clone)]
pub(crate) struct ConfirmStudentDelete {
    pub(crate) id: i64,
    pub(crate) name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_wraps_in_both_directions() {
        let mut form = StudentForm::default();
        form.focus_prev();
        assert_eq!(form.active, StudentField::HomeworkScore);
        form.focus_next();
        assert_eq!(form.active, StudentField::Name);
        for _ in 0..3 {
            form.focus_next();
        }
        assert_eq!(form.active, StudentField::Attendance);
    }

    #[test]
    fn numeric_fields_filter_input() {
        let mut form = StudentForm {
            active: StudentField::Attendance,
            ..StudentForm::default()
        };
        assert!(form.push_char('-'));
        assert!(form.push_char('4'));
        assert!(!form.push_char('-'));
        assert!(!form.push_char('x'));
        assert_eq!(form.input.attendance, "-4");
        form.backspace();
        assert_eq!(form.input.attendance, "-");
        assert_eq!(form.value_len(StudentField::Attendance), 1);
    }

    #[test]
    fn text_fields_accept_any_printable_char() {
        let mut form = StudentForm::default();
        for ch in "김 Kim-1".chars() {
            assert!(form.push_char(ch));
        }
        assert!(!form.push_char('\n'));
        assert_eq!(form.input.name, "김 Kim-1");
        assert_eq!(form.value_len(StudentField::Name), 7);
    }

    #[test]
    fn reset_restores_blank_state() {
        let mut form = StudentForm::default();
        form.focus_next();
        form.push_char('a');
        form.error = Some("oops".to_string());
        form.reset(StudentInput::default());
        assert_eq!(form.input, StudentInput::default());
        assert_eq!(form.active, StudentField::Name);
        assert!(form.error.is_none());
    }
}
