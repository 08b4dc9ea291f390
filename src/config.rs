// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::env;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Valuebatch", "valuebatch"));

pub const STORE_ENV: &str = "VALUEBATCH_STORE";
pub const LOG_ENV: &str = "VALUEBATCH_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Resolved once in `main` and handed to the command handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_path: PathBuf,
    pub log_filter: String,
}

impl Settings {
    /// `--store` wins over the environment, which wins over the platform
    /// data dir.
    pub fn resolve(store_flag: Option<&str>) -> Result<Self> {
        Self::resolve_with(store_flag, |k| env::var(k).ok())
    }

    pub fn resolve_with<F>(store_flag: Option<&str>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let store_path = match store_flag.map(str::trim).filter(|s| !s.is_empty()) {
            Some(p) => PathBuf::from(p),
            None => match from_env(STORE_ENV) {
                Some(p) => PathBuf::from(p),
                None => default_store_path()?,
            },
        };
        Ok(Settings {
            store_path,
            log_filter: from_env(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

pub fn default_store_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().join("values.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_env() {
        let s = Settings::resolve_with(Some(" /tmp/a.csv "), |k| match k {
            STORE_ENV => Some("/tmp/b.json".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(s.store_path, PathBuf::from("/tmp/a.csv"));
        assert_eq!(s.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn env_used_when_no_flag() {
        let s = Settings::resolve_with(None, |k| match k {
            STORE_ENV => Some("/tmp/b.json".into()),
            LOG_ENV => Some("debug".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(s.store_path, PathBuf::from("/tmp/b.json"));
        assert_eq!(s.log_filter, "debug");
    }
}
