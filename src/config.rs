//! Runtime configuration for the binary.
//!
//! The data file is chosen from, in order: the `--db` flag, the `TASKMGR_DB`
//! environment variable, and `tasks.json` in the working directory.

use std::path::PathBuf;

pub const DB_ENV: &str = "TASKMGR_DB";
pub const LOG_ENV: &str = "TASKMGR_LOG";
pub const DEFAULT_DB_FILE: &str = "tasks.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_file: PathBuf,
    pub log_filter: String,
}

impl Config {
    /// Resolve configuration from CLI values and the process environment.
    pub fn resolve(db_flag: Option<PathBuf>, verbosity: u8) -> Self {
        Self::resolve_with(db_flag, verbosity, |key| std::env::var(key).ok())
    }

    /// Like [`Config::resolve`], reading variables through `env`.
    pub fn resolve_with<F>(db_flag: Option<PathBuf>, verbosity: u8, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| env(key).filter(|v| !v.trim().is_empty());
        let data_file = db_flag
            .or_else(|| non_blank(DB_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE));
        let log_filter = non_blank(LOG_ENV)
            .or_else(|| non_blank("RUST_LOG"))
            .unwrap_or_else(|| default_filter(verbosity).to_string());
        Config {
            data_file,
            log_filter,
        }
    }
}

fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn flag_beats_environment() {
        let cfg = Config::resolve_with(Some("a.json".into()), 0, env(&[(DB_ENV, "b.json")]));
        assert_eq!(cfg.data_file, PathBuf::from("a.json"));
    }

    #[test]
    fn environment_beats_default() {
        let cfg = Config::resolve_with(None, 0, env(&[(DB_ENV, "b.json")]));
        assert_eq!(cfg.data_file, PathBuf::from("b.json"));
        let cfg = Config::resolve_with(None, 0, env(&[(DB_ENV, "  ")]));
        assert_eq!(cfg.data_file, PathBuf::from(DEFAULT_DB_FILE));
    }

    #[test]
    fn log_filter_sources() {
        assert_eq!(Config::resolve_with(None, 0, env(&[])).log_filter, "warn");
        assert_eq!(Config::resolve_with(None, 2, env(&[])).log_filter, "debug");
        assert_eq!(
            Config::resolve_with(None, 2, env(&[("RUST_LOG", "info"), (LOG_ENV, "taskmgr=trace")])).log_filter,
            "taskmgr=trace"
        );
        assert_eq!(Config::resolve_with(None, 0, env(&[("RUST_LOG", "info")])).log_filter, "info");
    }
}
