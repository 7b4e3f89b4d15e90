//! Task list controller: owns the canonical task list plus transient UI state
//! and mirrors every task or theme change into the slot store.

use std::collections::HashSet;

use tickoff_core::{
    storage::{KeyValueStore, SlotStore},
    tasks::{Filter, Task, TaskId, Theme, TASKS_SLOT, THEME_SLOT},
};
use tracing::{debug, info, instrument, warn};

/// The single task currently being re-worded, with its unsaved text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub task_id: TaskId,
    pub draft: String,
}

/// Abstract signals an input surface sends while an edit session is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Accept,
    Cancel,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardEvent {
    ThemeChanged(Theme),
}

/// Per-filter tallies over the full task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub important: usize,
}

/// Task list state machine backed by a `KeyValueStore`.
pub struct TaskBoard<S: KeyValueStore> {
    slots: SlotStore<S>,
    tasks: Vec<Task>,
    theme: Theme,
    filter: Filter,
    input: String,
    edit: Option<EditSession>,
    /// `None` once the counter has passed `u64::MAX`.
    next_id: Option<u64>,
    events: Vec<BoardEvent>,
}

impl<S: KeyValueStore> TaskBoard<S> {
    /// Load tasks and theme from `store`; missing or corrupt slots start empty/light.
    #[instrument(skip_all)]
    pub fn open(store: S) -> Self {
        let slots = SlotStore::new(store);
        let mut tasks: Vec<Task> = slots.load(TASKS_SLOT, Vec::new());
        let theme: Theme = slots.load(THEME_SLOT, Theme::default());

        let mut next_id = tasks
            .iter()
            .map(|t| t.id.0)
            .max()
            .map_or(Some(1), |max| max.checked_add(1));

        let mut taken: HashSet<TaskId> = tasks.iter().map(|t| t.id).collect();
        let mut seen = HashSet::new();
        let mut repaired = 0usize;
        for task in &mut tasks {
            if !seen.insert(task.id) {
                let Some(id) = allocate_id(&mut next_id, &taken) else {
                    break;
                };
                task.id = id;
                taken.insert(id);
                seen.insert(id);
                repaired += 1;
            }
        }
        if repaired > 0 {
            warn!(repaired, "stored tasks had duplicate ids, reassigned");
            slots.store(TASKS_SLOT, &tasks);
        }

        info!(tasks = tasks.len(), %theme, "task board loaded");
        Self {
            slots,
            tasks,
            theme,
            filter: Filter::default(),
            input: String::new(),
            edit: None,
            next_id,
            events: Vec::new(),
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        self.slots.inner()
    }

    /// Tasks visible under the current filter, in insertion order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| self.filter.matches(t))
            .collect()
    }

    pub fn counts(&self) -> TaskCounts {
        self.tasks.iter().fold(
            TaskCounts {
                total: self.tasks.len(),
                ..TaskCounts::default()
            },
            |mut acc, t| {
                if t.completed {
                    acc.completed += 1;
                } else {
                    acc.active += 1;
                }
                if t.is_important {
                    acc.important += 1;
                }
                acc
            },
        )
    }

    /// Pending notifications, oldest first; the queue is left empty.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Add the contents of the input buffer, clearing it on success.
    pub fn submit_input(&mut self) -> Option<TaskId> {
        let text = self.input.clone();
        self.add(&text)
    }

    /// Append a task with the trimmed `text`. Blank text is ignored.
    #[instrument(skip(self))]
    pub fn add(&mut self, text: &str) -> Option<TaskId> {
        let text = text.trim();
        if text.is_empty() {
            debug!("ignoring blank task text");
            return None;
        }

        let Some(id) = self.fresh_id() else {
            warn!("no task ids left, task not added");
            return None;
        };
        self.tasks.push(Task::new(id, text));
        self.input.clear();
        self.persist_tasks();
        Some(id)
    }

    /// Remove a task. Closes the edit session if it was editing this task.
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            debug!("no task to delete");
            return false;
        }

        if self.edit.as_ref().is_some_and(|e| e.task_id == id) {
            self.edit = None;
        }
        self.persist_tasks();
        true
    }

    #[instrument(skip(self))]
    pub fn toggle_complete(&mut self, id: TaskId) -> bool {
        self.update_task(id, |t| t.completed = !t.completed)
    }

    #[instrument(skip(self))]
    pub fn toggle_important(&mut self, id: TaskId) -> bool {
        self.update_task(id, |t| t.is_important = !t.is_important)
    }

    /// Open an edit session seeded with the task's text, replacing any open one.
    #[instrument(skip(self))]
    pub fn start_edit(&mut self, id: TaskId) -> bool {
        let Some(draft) = self.task(id).map(|t| t.text.clone()) else {
            debug!("no task to edit");
            return false;
        };
        self.edit = Some(EditSession { task_id: id, draft });
        true
    }

    pub fn edit_change(&mut self, draft: impl Into<String>) -> bool {
        match self.edit.as_mut() {
            Some(session) => {
                session.draft = draft.into();
                true
            }
            None => false,
        }
    }

    /// Commit the draft for `id`. A blank draft leaves the session open.
    #[instrument(skip(self))]
    pub fn save_edit(&mut self, id: TaskId) -> bool {
        let draft = match &self.edit {
            Some(session) if session.task_id == id => session.draft.trim().to_string(),
            _ => {
                debug!("no edit session for task");
                return false;
            }
        };
        if draft.is_empty() {
            debug!("ignoring blank edit draft");
            return false;
        }

        self.edit = None;
        self.update_task(id, |t| t.text = draft)
    }

    pub fn cancel_edit(&mut self) -> bool {
        self.edit.take().is_some()
    }

    /// Route an accept/cancel signal to the open edit session.
    pub fn apply_edit_command(&mut self, command: EditCommand) -> bool {
        let Some(id) = self.edit.as_ref().map(|e| e.task_id) else {
            return false;
        };
        match command {
            EditCommand::Accept => self.save_edit(id),
            EditCommand::Cancel => self.cancel_edit(),
        }
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    /// Flip the theme, persist it, and queue a `ThemeChanged` event.
    #[instrument(skip(self))]
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.slots.store(THEME_SLOT, &self.theme);
        self.events.push(BoardEvent::ThemeChanged(self.theme));
        self.theme
    }

    fn fresh_id(&mut self) -> Option<TaskId> {
        let taken = match self.next_id {
            Some(_) => HashSet::new(),
            None => self.tasks.iter().map(|t| t.id).collect(),
        };
        allocate_id(&mut self.next_id, &taken)
    }

    fn update_task(&mut self, id: TaskId, apply: impl FnOnce(&mut Task)) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            debug!(%id, "task not found");
            return false;
        };
        apply(task);
        self.persist_tasks();
        true
    }

    fn persist_tasks(&self) {
        self.slots.store(TASKS_SLOT, &self.tasks);
    }
}

/// Next counter value, or the lowest id not in `taken` once the counter is spent.
fn allocate_id(next_id: &mut Option<u64>, taken: &HashSet<TaskId>) -> Option<TaskId> {
    if let Some(id) = *next_id {
        *next_id = id.checked_add(1);
        return Some(TaskId(id));
    }
    (1..=u64::MAX).map(TaskId).find(|id| !taken.contains(id))
}
