use crate::error::AppError;
use crate::export::{self, ExportFormat};
use crate::filter::{TaskFilter, filter_tasks};
use crate::model::{NewTask, Task};
use crate::storage::csv_store;
use std::path::{Path, PathBuf};
use time::{Date, OffsetDateTime, UtcOffset};

/// The running task collection. Opened once per session; every mutation
/// persists the whole collection back to the store before returning.
///
/// Tasks are addressed by their `task-<n>` identifier, never by a
/// position in a (possibly filtered) listing. Identifiers are assigned
/// in file order on open and are never reused within a session, so a
/// delete cannot silently redirect a later toggle to the wrong task.
pub struct Session {
    path: PathBuf,
    tasks: Vec<Task>,
    next_id: u64,
}

impl Session {
    pub fn open(path: &Path) -> Result<Session, AppError> {
        let tasks = csv_store::load_tasks(path)?;
        let next_id = tasks.len() as u64 + 1;
        Ok(Session {
            path: path.to_path_buf(),
            tasks,
            next_id,
        })
    }

    pub fn open_default() -> Result<Session, AppError> {
        let path = csv_store::store_path()?;
        Session::open(&path)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn filtered(&self, filter: &TaskFilter) -> Vec<Task> {
        filter_tasks(&self.tasks, filter)
    }

    pub fn get(&self, id: &str) -> Result<&Task, AppError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("id is required"));
        }

        self.tasks
            .iter()
            .find(|task| task.id == trimmed)
            .ok_or_else(|| AppError::invalid_input("task not found"))
    }

    pub fn add(&mut self, draft: NewTask) -> Result<Task, AppError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(AppError::invalid_input("task text is required"));
        }

        let task = Task {
            id: format!("task-{}", self.next_id),
            text: text.to_string(),
            done: false,
            category: draft.category,
            due_date: draft.due_date.unwrap_or_else(today_local),
            priority: draft.priority,
        };

        self.next_id += 1;
        self.tasks.push(task.clone());
        self.save()?;

        Ok(task)
    }

    pub fn toggle_done(&mut self, id: &str) -> Result<Task, AppError> {
        let index = self.position(id)?;
        self.tasks[index].done = !self.tasks[index].done;
        let updated = self.tasks[index].clone();
        self.save()?;

        Ok(updated)
    }

    pub fn delete(&mut self, id: &str) -> Result<Task, AppError> {
        let index = self.position(id)?;
        let removed = self.tasks.remove(index);
        self.save()?;

        Ok(removed)
    }

    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, AppError> {
        export::export_tasks(&self.tasks, format)
    }

    fn position(&self, id: &str) -> Result<usize, AppError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("id is required"));
        }

        self.tasks
            .iter()
            .position(|task| task.id == trimmed)
            .ok_or_else(|| AppError::invalid_input("task not found"))
    }

    fn save(&self) -> Result<(), AppError> {
        csv_store::save_tasks(&self.path, &self.tasks)
    }
}

pub fn today_local() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc().to_offset(offset).date()
}
