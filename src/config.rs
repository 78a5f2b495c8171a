// diffseek/src/config.rs
//! Runtime knobs for enumeration and search.
//!
//! `#[serde(default)]` keeps partial JSON files valid: anything missing falls
//! back to `Config::default()`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// File picked up from the working directory when no `--config=` is given.
pub const DEFAULT_CONFIG_FILE: &str = ".diffseek.json";

/// Ceiling on results returned by one search.
pub const MAX_RESULTS: usize = 20;
/// Ceiling on files enumerated across all roots.
pub const MAX_SUBMENU_ITEMS: usize = 10_000;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub max_results: usize,
    pub max_submenu_items: usize,
    /// Shortest unique path suffix as the description; `false` = full relative path.
    pub disambiguate: bool,
    /// Honor `.gitignore` / `.ignore` and skip hidden entries while walking.
    pub respect_ignore_files: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_results: MAX_RESULTS,
            max_submenu_items: MAX_SUBMENU_ITEMS,
            disambiguate: true,
            respect_ignore_files: true,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Config = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }

    /// Explicit path wins; otherwise `./.diffseek.json` if present; else defaults.
    pub fn load(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::from_file(p);
        }
        let implicit = cwd.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            tracing::debug!(path = %implicit.display(), "loading workspace config");
            return Self::from_file(&implicit);
        }
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_limits() {
        let c = Config::default();
        assert_eq!(c.max_results, 20);
        assert_eq!(c.max_submenu_items, 10_000);
        assert!(c.disambiguate);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: Config = serde_json::from_str(r#"{ "disambiguate": false }"#).unwrap();
        assert!(!c.disambiguate);
        assert_eq!(c.max_results, 20);
        assert!(c.respect_ignore_files);
    }

    #[test]
    fn load_prefers_explicit_then_workspace_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(None, dir.path()).unwrap(), Config::default());

        fs::write(dir.path().join(DEFAULT_CONFIG_FILE), r#"{ "max_results": 5 }"#).unwrap();
        assert_eq!(Config::load(None, dir.path()).unwrap().max_results, 5);

        let explicit = dir.path().join("other.json");
        fs::write(&explicit, r#"{ "max_results": 7 }"#).unwrap();
        assert_eq!(Config::load(Some(&explicit), dir.path()).unwrap().max_results, 7);
    }

    #[test]
    fn bad_json_is_an_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("bad.json");
        fs::write(&p, "{ nope").unwrap();
        let err = Config::from_file(&p).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }
}
