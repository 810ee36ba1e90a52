use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::error;

use crate::controller::SessionController;
use crate::error::{Result as RosterResult, RosterError};
use crate::models::RosterView;

use super::forms::{ConfirmStudentDelete, StudentField, StudentForm};
use super::helpers::{centered_rect, statistics_line, surface_error};
use super::screens::RosterScreen;

const HEADER_HEIGHT: u16 = 3;
/// Five field rows, one message row and the border.
const FORM_HEIGHT: u16 = 8;
const SEARCH_HEIGHT: u16 = 3;
const STATS_HEIGHT: u16 = 1;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Width of the label column inside the form, `"Attendance: "` included.
const LABEL_WIDTH: u16 = 12;
const PAGE: isize = 10;

/// What keystrokes are currently routed to.
enum Mode {
    Normal,
    Editing,
    Searching,
    ConfirmDelete(ConfirmStudentDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal shell state. Business rules live in the controller; this type
/// only forwards keystrokes and renders what comes back.
pub struct App {
    controller: SessionController,
    screen: RosterScreen,
    form: StudentForm,
    search: String,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(controller: SessionController) -> RosterResult<Self> {
        let view = controller.refresh()?;
        Ok(Self {
            controller,
            screen: RosterScreen::new(view),
            form: StudentForm::default(),
            search: String::new(),
            mode: Mode::Normal,
            status: None,
        })
    }

    /// Hand the controller back so the caller can run the shutdown hook.
    pub fn into_controller(self) -> SessionController {
        self.controller
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Editing => self.handle_editing_key(code),
            Mode::Searching => self.handle_search_key(code),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        Ok(exit)
    }

    /// Ctrl shortcuts mirror the form buttons and work while typing. Returns
    /// whether the key was consumed.
    pub(crate) fn handle_ctrl(&mut self, code: KeyCode) -> Result<bool> {
        if matches!(self.mode, Mode::ConfirmDelete(_)) {
            return Ok(false);
        }
        let handled = match code {
            KeyCode::Char('a') => {
                self.add_student();
                true
            }
            KeyCode::Char('u') => {
                self.update_student();
                true
            }
            KeyCode::Char('d') => {
                if let Some(confirm) = self.request_delete() {
                    self.mode = Mode::ConfirmDelete(confirm);
                }
                true
            }
            KeyCode::Char('l') => {
                self.clear_form();
                true
            }
            _ => false,
        };
        Ok(handled)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-PAGE),
            KeyCode::PageDown => self.screen.move_selection(PAGE),
            KeyCode::Home => self.screen.select_first(),
            KeyCode::End => self.screen.select_last(),
            KeyCode::Enter => self.select_current(),
            KeyCode::Char('i') | KeyCode::Tab => {
                self.clear_status();
                return Mode::Editing;
            }
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.clear_status();
                return Mode::Searching;
            }
            KeyCode::Char('a') => self.add_student(),
            KeyCode::Char('u') => self.update_student(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(confirm) = self.request_delete() {
                    return Mode::ConfirmDelete(confirm);
                }
            }
            KeyCode::Char('c') => self.clear_form(),
            KeyCode::Char('r') => self.show_all(),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_editing_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter => return Mode::Normal,
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_prev(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(ch) => {
                if self.form.push_char(ch) {
                    self.form.error = None;
                }
            }
            _ => {}
        }
        Mode::Editing
    }

    /// The list follows every keystroke, like a live filter.
    fn handle_search_key(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Esc => {
                self.search.clear();
                self.show_all();
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::Backspace => {
                self.search.pop();
                self.apply_search();
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                self.search.push(ch);
                self.apply_search();
            }
            _ => {}
        }
        Mode::Searching
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmStudentDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&confirm);
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn add_student(&mut self) {
        let name = self.form.input.name.trim().to_string();
        match self.controller.submit_create(&self.form.input) {
            Ok(view) => {
                self.after_mutation(view);
                self.set_status(format!("'{name}' added."), StatusKind::Info);
            }
            Err(err) => self.report(err),
        }
    }

    fn update_student(&mut self) {
        let id = self.controller.selected_id();
        match self.controller.submit_update(&self.form.input) {
            Ok(view) => {
                self.after_mutation(view);
                if let Some(id) = id {
                    self.screen.focus(id);
                }
                self.set_status("Student updated.", StatusKind::Info);
            }
            Err(err) => self.report(err),
        }
    }

    /// Build the confirmation prompt for the selected student, or explain why
    /// there is nothing to delete.
    fn request_delete(&mut self) -> Option<ConfirmStudentDelete> {
        let Some(id) = self.controller.selected_id() else {
            self.report(RosterError::Selection);
            return None;
        };
        let name = self
            .screen
            .students
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| self.form.input.name.trim().to_string());
        self.clear_status();
        Some(ConfirmStudentDelete { id, name })
    }

    fn perform_delete(&mut self, confirm: &ConfirmStudentDelete) {
        match self.controller.submit_delete() {
            Ok(view) => {
                self.after_mutation(view);
                self.set_status(format!("'{}' deleted.", confirm.name), StatusKind::Info);
            }
            Err(err) => self.report(err),
        }
    }

    fn select_current(&mut self) {
        let Some(id) = self.screen.current_student().map(|s| s.id) else {
            self.set_status("No student to select.", StatusKind::Error);
            return;
        };
        match self.controller.select(id) {
            Ok(student) => {
                self.form = StudentForm::from_student(&student);
                self.set_status(format!("Loaded '{}'.", student.name), StatusKind::Info);
            }
            Err(err) => self.report(err),
        }
    }

    fn clear_form(&mut self) {
        let blank = self.controller.clear();
        self.form.reset(blank);
        self.mode = Mode::Normal;
        self.set_status("Fields cleared.", StatusKind::Info);
    }

    fn show_all(&mut self) {
        self.search.clear();
        let result = self.controller.refresh();
        self.apply_view(result);
    }

    fn apply_search(&mut self) {
        let result = self.controller.search(&self.search);
        self.apply_view(result);
    }

    fn apply_view(&mut self, result: RosterResult<RosterView>) {
        match result {
            Ok(view) => self.screen.apply(view),
            Err(err) => self.report(err),
        }
    }

    /// Successful add/update/delete: blank the form, drop the filter and show
    /// the full list the controller returned.
    fn after_mutation(&mut self, view: RosterView) {
        self.form.reset(self.controller.clear());
        self.search.clear();
        self.screen.apply(view);
        self.mode = Mode::Normal;
    }

    fn report(&mut self, err: RosterError) {
        let message = surface_error(&err);
        match err {
            RosterError::Validation(_) => self.form.error = Some(message.clone()),
            RosterError::NotFound { .. } => {
                // The list is stale; resynchronize it.
                self.search.clear();
                match self.controller.refresh() {
                    Ok(view) => self.screen.apply(view),
                    Err(refresh_err) => {
                        error!(%refresh_err, "failed to resynchronize student list");
                        let text = format!("{message} {}", surface_error(&refresh_err));
                        self.set_status(text, StatusKind::Error);
                        return;
                    }
                }
            }
            RosterError::Storage { .. } | RosterError::Io { .. } => {
                error!(%err, "operation aborted");
            }
            RosterError::Selection => {}
        }
        self.set_status(message, StatusKind::Error);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(FORM_HEIGHT),
                Constraint::Length(SEARCH_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(STATS_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_form(frame, chunks[1]);
        self.draw_search_bar(frame, chunks[2]);
        self.draw_table(frame, chunks[3]);
        self.draw_statistics(frame, chunks[4]);
        self.draw_footer(frame, chunks[5]);

        if let Mode::ConfirmDelete(confirm) = &self.mode {
            self.draw_confirm_delete(frame, area, confirm);
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(Span::styled(
            "Student Roster",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );
        frame.render_widget(title, area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let editing = matches!(self.mode, Mode::Editing);
        let title = match self.controller.selected_id() {
            Some(id) => format!("Student - Selected #{id}"),
            None => "Student - New".to_string(),
        };
        let border_style = if editing {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines: Vec<Line> = StudentField::ALL
            .iter()
            .map(|field| self.form.build_line(*field, editing))
            .collect();
        if let Some(error) = &self.form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(Paragraph::new(lines), inner);

        if editing {
            let row = StudentField::ALL
                .iter()
                .position(|f| *f == self.form.active)
                .unwrap_or(0) as u16;
            let cursor_x = inner.x + LABEL_WIDTH + self.form.value_len(self.form.active) as u16;
            frame.set_cursor_position((cursor_x, inner.y + row));
        }
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect) {
        let searching = matches!(self.mode, Mode::Searching);
        let style = if searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::default()
            .title("Search")
            .borders(Borders::ALL)
            .border_style(style);
        let inner = block.inner(area);
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", self.search))).block(block);
        frame.render_widget(paragraph, area);

        if searching {
            let cursor_x = inner.x + "Search: ".len() as u16 + self.search.chars().count() as u16;
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(["ID", "Name", "Address", "Phone", "Attendance", "Score"])
            .style(header_style);

        let selected_id = self.controller.selected_id();
        let rows = self.screen.students.iter().map(|student| {
            let style = if Some(student.id) == selected_id {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(student.id.to_string()),
                Cell::from(student.name.clone()),
                Cell::from(student.address.clone()),
                Cell::from(student.phone.clone()),
                Cell::from(student.attendance.to_string()),
                Cell::from(student.homework_score.to_string()),
            ])
            .style(style)
        });

        let title = if self.search.is_empty() {
            "Students".to_string()
        } else {
            format!("Students matching '{}'", self.search)
        };

        let widths = [
            Constraint::Length(5),
            Constraint::Percentage(20),
            Constraint::Min(12),
            Constraint::Percentage(18),
            Constraint::Length(10),
            Constraint::Length(6),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().title(title).borders(Borders::ALL))
            .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = TableState::default();
        if !self.screen.students.is_empty() {
            state.select(Some(self.screen.cursor));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_statistics(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            statistics_line(&self.screen.statistics),
            Style::default().fg(Color::Gray),
        ));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match self.mode {
            Mode::Normal => &[
                ("[Enter]", " Select   "),
                ("[i]", " Edit   "),
                ("[a]", " Add   "),
                ("[u]", " Update   "),
                ("[d]", " Delete   "),
                ("[c]", " Clear   "),
                ("[/]", " Search   "),
                ("[r]", " Show All   "),
                ("[q]", " Quit"),
            ],
            Mode::Editing => &[
                ("[Tab]", " Next Field   "),
                ("[Ctrl+A]", " Add   "),
                ("[Ctrl+U]", " Update   "),
                ("[Ctrl+D]", " Delete   "),
                ("[Ctrl+L]", " Clear   "),
                ("[Enter/Esc]", " Done"),
            ],
            Mode::Searching => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Keep Filter   "),
                ("[Esc]", " Show All"),
            ],
            Mode::ConfirmDelete(_) => &[("[Y]", " Delete   "), ("[N/Esc]", " Cancel")],
        };

        Line::from(
            hints
                .iter()
                .flat_map(|(key, label)| {
                    [Span::styled(*key, key_style), Span::raw(*label)]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmStudentDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}' (#{})?", confirm.name, confirm.id)),
            Line::from("This cannot be undone."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
