use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tickoff_core::{
    storage::KeyValueStore,
    tasks::{Filter, TaskId},
};
use tickoff_task::{BoardEvent, EditCommand, TaskBoard};

use super::render::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Adding,
    Editing,
}

const EMPTY_TEXT: &str = "Task text cannot be empty";

/// Footer message from the last action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Status {
    Info(String),
    Error(String),
}

impl Status {
    pub(crate) fn text(&self) -> &str {
        match self {
            Status::Info(text) | Status::Error(text) => text,
        }
    }
}

/// TUI state: the task board plus cursor, mode and status line.
pub(crate) struct App<S: KeyValueStore> {
    pub(crate) board: TaskBoard<S>,
    pub(crate) selected: usize,
    pub(crate) palette: Palette,
    pub(crate) status: Option<Status>,
    adding: bool,
    should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub(crate) fn new(board: TaskBoard<S>) -> Self {
        let palette = Palette::for_theme(board.theme());
        Self {
            board,
            selected: 0,
            palette,
            status: None,
            adding: false,
            should_quit: false,
        }
    }

    pub(crate) fn mode(&self) -> InputMode {
        if self.board.edit_session().is_some() {
            InputMode::Editing
        } else if self.adding {
            InputMode::Adding
        } else {
            InputMode::Normal
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub(crate) fn selected_id(&self) -> Option<TaskId> {
        self.board.visible_tasks().get(self.selected).map(|t| t.id)
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode() {
            InputMode::Normal => self.handle_normal(key),
            InputMode::Adding => self.handle_adding(key),
            InputMode::Editing => self.handle_editing(key),
        }

        for event in self.board.drain_events() {
            match event {
                BoardEvent::ThemeChanged(theme) => {
                    self.palette = Palette::for_theme(theme);
                    self.status = Some(Status::Info(format!("Theme: {theme}")));
                }
            }
        }
        self.clamp_selection();
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.adding = true;
                self.status = None;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.board.start_edit(id);
                }
            }
            KeyCode::Char(' ') | KeyCode::Char('c') => {
                if let Some(id) = self.selected_id() {
                    self.board.toggle_complete(id);
                }
            }
            KeyCode::Char('s') | KeyCode::Char('*') => {
                if let Some(id) = self.selected_id() {
                    self.board.toggle_important(id);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    if self.board.delete(id) {
                        self.status = Some(Status::Info("Task deleted".to_string()));
                    }
                }
            }
            KeyCode::Char('f') | KeyCode::Tab => self.set_filter(self.board.filter().next()),
            KeyCode::Char(c @ '1'..='4') => {
                let idx = c as usize - '1' as usize;
                self.set_filter(Filter::ALL[idx]);
            }
            KeyCode::Char('t') => {
                self.board.toggle_theme();
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = self.selected.saturating_add(1);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => self.selected = usize::MAX,
            _ => {}
        }
    }

    fn handle_adding(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.adding = false,
            KeyCode::Enter => {
                if let Some(id) = self.board.submit_input() {
                    self.status = Some(Status::Info(format!("Added task {id}")));
                    if let Some(pos) = self.board.visible_tasks().iter().position(|t| t.id == id) {
                        self.selected = pos;
                    }
                } else {
                    self.status = Some(Status::Error(EMPTY_TEXT.to_string()));
                }
            }
            KeyCode::Backspace => {
                let mut input = self.board.input().to_string();
                input.pop();
                self.board.set_input(input);
            }
            KeyCode::Char(c) => {
                let mut input = self.board.input().to_string();
                input.push(c);
                self.board.set_input(input);
            }
            _ => {}
        }
    }

    fn handle_editing(&mut self, key: KeyEvent) {
        let Some(draft) = self.board.edit_session().map(|e| e.draft.clone()) else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.board.apply_edit_command(EditCommand::Cancel);
            }
            KeyCode::Enter => {
                if self.board.apply_edit_command(EditCommand::Accept) {
                    self.status = Some(Status::Info("Task updated".to_string()));
                } else {
                    self.status = Some(Status::Error(EMPTY_TEXT.to_string()));
                }
            }
            KeyCode::Backspace => {
                let mut draft = draft;
                draft.pop();
                self.board.edit_change(draft);
            }
            KeyCode::Char(c) => {
                let mut draft = draft;
                draft.push(c);
                self.board.edit_change(draft);
            }
            _ => {}
        }
    }

    fn set_filter(&mut self, filter: Filter) {
        self.board.set_filter(filter);
        self.selected = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.board.visible_tasks().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}
