use thiserror::Error;

use crate::domain::task::{Task, TaskId};

pub mod json;
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("no task with id {0}")]
    NotFound(TaskId),
}

pub trait TaskRepository {
    fn all(&self) -> Vec<Task>;
    fn add(
        &mut self,
        title: String,
        category: Option<String>,
        due_date: Option<String>,
    ) -> Result<Task, StoreError>;
    fn toggle(&mut self, id: TaskId) -> Result<Task, StoreError>;
    fn delete(&mut self, id: TaskId) -> Result<Task, StoreError>;
    fn clear_done(&mut self) -> usize;
}

/// Trims a submitted title; whitespace-only input is invalid.
pub(crate) fn clean_title(raw: &str) -> Result<String, StoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Trims an optional free-text field; empty input collapses to None.
pub(crate) fn clean_optional(raw: Option<String>) -> Option<String> {
    let value = raw?.trim().to_string();
    if value.is_empty() { None } else { Some(value) }
}
