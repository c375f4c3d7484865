use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

use super::{StoreError, TaskRepository, clean_optional, clean_title};
use crate::domain::task::{Task, TaskId};

/// Task store backed by a single JSON file. Every mutation rewrites the whole
/// file; the in-memory collection stays authoritative for the session when a
/// write fails.
pub struct JsonFileTaskRepo {
    path: PathBuf,
    items: VecDeque<Task>,
    last_id: TaskId,
}

impl JsonFileTaskRepo {
    pub fn open_default() -> Result<Self> {
        let path = default_data_path()?;
        Self::open(path)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create data dir {}", parent.display()))?;
        }
        let items = load_tasks(path);
        let last_id = items.iter().map(|t| t.id).max().unwrap_or(0);
        Ok(Self {
            path: path.to_path_buf(),
            items,
            last_id,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_id(&mut self) -> TaskId {
        self.last_id += 1;
        self.last_id
    }

    fn save(&self) {
        if let Err(err) = write_atomic(&self.path, &self.items) {
            warn!(
                "failed to persist tasks to {}: {err:#}",
                self.path.display()
            );
        }
    }
}

impl TaskRepository for JsonFileTaskRepo {
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
        self.save();
        Ok(task)
    }

    fn toggle(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let pos = self
            .items
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let task = self.items.get_mut(pos).ok_or(StoreError::NotFound(id))?;
        task.done = !task.done;
        let updated = task.clone();
        self.save();
        Ok(updated)
    }

    fn delete(&mut self, id: TaskId) -> Result<Task, StoreError> {
        let pos = self
            .items
            .iter()
            .position(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        let removed = self.items.remove(pos).ok_or(StoreError::NotFound(id))?;
        self.save();
        Ok(removed)
    }

    fn clear_done(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|t| !t.done);
        let removed = before - self.items.len();
        if removed > 0 {
            self.save();
        }
        removed
    }
}

// Missing file means first run; anything unreadable is logged and treated as
// empty rather than surfaced. Records are recovered one by one so a single
// bad entry does not discard the rest.
fn load_tasks(path: &Path) -> VecDeque<Task> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return VecDeque::new(),
        Err(err) => {
            warn!("ignoring unreadable task file {}: {err}", path.display());
            return VecDeque::new();
        }
    };
    let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(err) => {
            warn!("ignoring malformed task file {}: {err}", path.display());
            return VecDeque::new();
        }
    };

    let mut items = VecDeque::with_capacity(records.len());
    let mut seen: HashSet<TaskId> = HashSet::new();
    for record in records {
        let Ok(mut task) = serde_json::from_value::<Task>(record) else {
            warn!("skipping unreadable task record in {}", path.display());
            continue;
        };
        let Ok(title) = clean_title(&task.title) else {
            warn!(
                "skipping task {} with empty title in {}",
                task.id,
                path.display()
            );
            continue;
        };
        if !seen.insert(task.id) {
            warn!(
                "skipping task with duplicate id {} in {}",
                task.id,
                path.display()
            );
            continue;
        }
        task.title = title;
        task.category = clean_optional(task.category);
        task.due_date = clean_optional(task.due_date);
        items.push_back(task);
    }
    items
}

fn write_atomic(path: &Path, items: &VecDeque<Task>) -> Result<()> {
    let tasks: Vec<&Task> = items.iter().collect();
    let body = serde_json::to_string_pretty(&tasks).context("failed to encode tasks")?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, body).with_context(|| format!("failed to write {}", tmp.display()))?;
    std::fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

fn default_data_path() -> Result<PathBuf> {
    let base = dirs::data_dir().context("failed to resolve data dir")?;
    Ok(base.join("fuda").join("tasks.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("tasks.json")
    }

    #[test]
    fn json_repo_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = repo_path(&dir);

        let added = {
            let mut repo = JsonFileTaskRepo::open(&path).unwrap();
            repo.add(
                "Finish report".to_string(),
                Some("School".to_string()),
                Some("2026-09-01".to_string()),
            )
            .unwrap()
        };

        // Reopening from the same path simulates a process restart.
        let repo = JsonFileTaskRepo::open(&path).unwrap();
        let listed = repo.all();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], added);
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileTaskRepo::open(repo_path(&dir)).unwrap();
        assert!(repo.all().is_empty());
    }

    #[test]
    fn unreadable_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = repo_path(&dir);
        // Not valid UTF-8, so the file cannot even be read as text.
        std::fs::write(&path, [0xff, 0xfe, 0x80]).unwrap();

        let repo = JsonFileTaskRepo::open(&path).unwrap();
        assert!(repo.all().is_empty());
    }

    #[test]
    fn malformed_file_starts_empty() {
        for junk in ["", "not json at all", "{\"tasks\": 1}", "42"] {
            let dir = tempfile::tempdir().unwrap();
            let path = repo_path(&dir);
            std::fs::write(&path, junk).unwrap();

            let repo = JsonFileTaskRepo::open(&path).unwrap();
            assert!(repo.all().is_empty(), "expected empty store for {junk:?}");
        }
    }

    #[test]
    fn bad_records_are_skipped_without_losing_good_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = repo_path(&dir);
        std::fs::write(
            &path,
            r#"[
                {"id": 7, "title": "  keep me  ", "done": true, "category": null, "due_date": null},
                42,
                {"id": 8, "title": "   ", "done": false, "category": null, "due_date": null},
                {"id": 7, "title": "duplicate id", "done": false, "category": null, "due_date": null},
                {"title": "no id", "done": false}
            ]"#,
        )
        .unwrap();

        let mut repo = JsonFileTaskRepo::open(&path).unwrap();
        let listed = repo.all();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, 7);
        assert_eq!(listed[0].title, "keep me");
        assert!(listed[0].done);

        // The id counter resumes above the highest surviving id.
        let fresh = repo.add("new".to_string(), None, None).unwrap();
        assert_eq!(fresh.id, 8);
    }

    #[test]
    fn every_mutation_rewrites_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = repo_path(&dir);
        let mut repo = JsonFileTaskRepo::open(&path).unwrap();

        let task = repo.add("persisted".to_string(), None, None).unwrap();
        let on_disk: Vec<Task> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec![task.clone()]);

        repo.toggle(task.id).unwrap();
        let on_disk: Vec<Task> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(on_disk[0].done);

        repo.delete(task.id).unwrap();
        let on_disk: Vec<Task> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(on_disk.is_empty());
    }

    #[test]
    fn ids_resume_above_persisted_maximum() {
        let dir = tempfile::tempdir().unwrap();
        let path = repo_path(&dir);

        {
            let mut repo = JsonFileTaskRepo::open(&path).unwrap();
            let first = repo.add("one".to_string(), None, None).unwrap();
            repo.add("two".to_string(), None, None).unwrap();
            repo.delete(first.id).unwrap();
        }

        let mut repo = JsonFileTaskRepo::open(&path).unwrap();
        assert_eq!(repo.all().len(), 1);
        let next = repo.add("three".to_string(), None, None).unwrap();
        assert_eq!(next.id, 3);
    }
}
