use std::sync::{Arc, Mutex, MutexGuard};

use crate::repo::TaskRepository;

pub type BoxedRepo = Box<dyn TaskRepository + Send>;

/// Shared state the handler layer holds: the task store behind one mutex.
/// Each request locks, performs its whole read-or-mutate step against the
/// store, and releases before the response is built, so every request sees
/// a consistent collection.
#[derive(Clone)]
pub struct AppState {
    repo: Arc<Mutex<BoxedRepo>>,
}

impl AppState {
    pub fn new(repo: BoxedRepo) -> Self {
        Self {
            repo: Arc::new(Mutex::new(repo)),
        }
    }

    pub fn repo(&self) -> MutexGuard<'_, BoxedRepo> {
        self.repo.lock().expect("task store mutex poisoned")
    }
}
