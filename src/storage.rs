//! Load/save capabilities for the task sequence.
//!
//! The store never touches the filesystem itself; it is handed a [`TaskStorage`]
//! and calls `load` once on construction and `save` with the full sequence after
//! every successful mutation.

use std::cell::{Cell, RefCell};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::StorageError;
use crate::task::Task;

/// Persistence capability injected into the store.
pub trait TaskStorage {
    /// Read the stored sequence; an absent store yields an empty sequence.
    fn load(&self) -> Result<Vec<Task>, StorageError>;

    /// Replace the stored sequence with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// A JSON array of tasks in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        let buf = match fs::read_to_string(&self.path) {
            Ok(buf) => buf,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no data file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if buf.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&buf).map_err(|source| StorageError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        write_json_atomic(&self.path, tasks)
    }
}

/// Write `tasks` as pretty JSON via a temp file and rename.
pub fn write_json_atomic(path: &Path, tasks: &[Task]) -> Result<(), StorageError> {
    let data = serde_json::to_string_pretty(tasks).map_err(StorageError::Serialise)?;
    let tmp = path.with_extension("json.tmp");
    let write_err = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let written = File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(data.as_bytes())?;
            f.flush()
        })
        .and_then(|()| fs::rename(&tmp, path));
    if let Err(source) = written {
        // Best effort; the original error is what matters.
        let _ = fs::remove_file(&tmp);
        return Err(write_err(source));
    }
    tracing::debug!(path = %path.display(), count = tasks.len(), "tasks written");
    Ok(())
}

/// Default export file name, stamped with the local time.
pub fn default_export_name() -> String {
    format!("tasks_export_{}.json", chrono::Local::now().format("%Y%m%d_%H%M%S"))
}

/// In-process storage. Records every saved snapshot and can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    initial: Vec<Task>,
    saved: RefCell<Option<Vec<Task>>>,
    saves: Cell<usize>,
    fail_saves: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose `load` returns `tasks`.
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        MemoryStorage {
            initial: tasks,
            ..Default::default()
        }
    }

    /// Most recent sequence passed to `save`.
    pub fn last_saved(&self) -> Option<Vec<Task>> {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }
}

impl TaskStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        Ok(self.initial.clone())
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        if self.fail_saves.get() {
            return Err(StorageError::Unavailable("memory storage set to fail".into()));
        }
        self.saves.set(self.saves.get() + 1);
        *self.saved.borrow_mut() = Some(tasks.to_vec());
        Ok(())
    }
}

impl<T: TaskStorage + ?Sized> TaskStorage for &T {
    fn load(&self) -> Result<Vec<Task>, StorageError> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        (**self).save(tasks)
    }
}
