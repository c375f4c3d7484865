use std::collections::VecDeque;

use super::{StoreError, TaskRepository, clean_optional, clean_title};
use crate::domain::task::{Task, TaskId};

#[derive(Default)]
pub struct InMemoryTaskRepo {
    items: VecDeque<Task>,
    // Highest id handed out so far; ids are never reused, even after delete.
    last_id: TaskId,
}

impl InMemoryTaskRepo {
    pub fn with_seed<I, S>(seed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut repo = Self::default();
        for title in seed {
            let _ = repo.add(title.into(), None, None);
        }
        repo
    }

    fn next_id(&mut self) -> TaskId {
        self.last_id += 1;
        self.last_id
    }
}

impl TaskRepository for InMemoryTaskRepo {
    fn all(&self) -> Vec<Task> {
        self.items.iter().cloned().collect()
    }

    fn add(
        &mut self,
        title: String,
        category: Option<String>,
        due_date: Option<String>,
    ) -> Result<Task, StoreError> {
        let title = clean_title(&title)?;
        let task = Task::with_details(
            self.next_id(),
            title,
            clean_optional(category),
            clean_optional(due_date),
        );
        self.items.push_back(task.clone());
        Ok(task)
    }

    fn toggle(&mut self, id: TaskId) -> Result<Task, StoreError> {
        for task in &mut self.items {
            if task.id == id {
                task.done = !task.done;
                return Ok(task.clone());
            }
        }
        Err(StoreError::NotFound(id))
    }

    fn delete(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let pos = self
            .items
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        self.items.remove(pos).ok_or(StoreError::NotFound(id))
    }

    fn clear_done(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|t| !t.done);
        before - self.items.len()
    }
}
