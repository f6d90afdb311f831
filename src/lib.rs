//! # taskmgr
//!
//! A local task tracker. Tasks live in a flat JSON file and carry a priority,
//! a status, a case-insensitive tag set, an optional project and an optional
//! due date given as `YYYY-MM-DD` or a relative expression (`today`,
//! `tomorrow`, `+3d`, `+2w`, `+1m`).
//!
//! The engine is [`TaskStore`]: it owns the task sequence, validates every
//! change before applying it and writes the full sequence through an injected
//! [`TaskStorage`] after each successful mutation.
//!
//! ```no_run
//! use taskmgr::{JsonFileStorage, ListCriteria, NewTask, TaskStore};
//!
//! let mut store = TaskStore::open(JsonFileStorage::new("tasks.json"))?;
//! store.add(NewTask::new("Buy groceries").priority("high").due("tomorrow"))?;
//! let overdue = store.list(&ListCriteria { overdue_only: true, ..Default::default() })?;
//! println!("{} overdue", overdue.len());
//! # Ok::<(), taskmgr::TaskError>(())
//! ```

pub mod config;
pub mod dates;
pub mod error;
pub mod fields;
pub mod filter;
pub mod logging;
pub mod stats;
pub mod storage;
pub mod store;
pub mod task;
pub mod update;

pub use dates::{is_valid_calendar_date, parse_due_date, Clock, FixedClock, SystemClock};
pub use error::{StorageError, TaskError};
pub use fields::{Priority, SearchField, Status};
pub use filter::ListCriteria;
pub use stats::Statistics;
pub use storage::{JsonFileStorage, MemoryStorage, TaskStorage};
pub use store::TaskStore;
pub use task::{NewTask, Task, TaskPatch};
