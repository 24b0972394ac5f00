//! Environment-driven settings.
//!
//! | Variable | Default |
//! |---|---|
//! | `ART_INSIGHT_ARTIFACT_DIR` | `models` |
//! | `ART_INSIGHT_LOG_MODE` | `stderr` (`file` or `stderr`) |
//! | `ART_INSIGHT_LOG_FILE` | `art-insight.log` |
//! | `ART_INSIGHT_REQUIRE_MANIFEST` | false |
//! | `ART_INSIGHT_SANITIZE_MAX_BYTES` | 16384 |

use std::path::PathBuf;

pub const ARTIFACT_DIR_ENV: &str = "ART_INSIGHT_ARTIFACT_DIR";
pub const LOG_MODE_ENV: &str = "ART_INSIGHT_LOG_MODE";
pub const LOG_FILE_ENV: &str = "ART_INSIGHT_LOG_FILE";
pub const REQUIRE_MANIFEST_ENV: &str = "ART_INSIGHT_REQUIRE_MANIFEST";
pub const SANITIZE_MAX_BYTES_ENV: &str = "ART_INSIGHT_SANITIZE_MAX_BYTES";

pub const DEFAULT_ARTIFACT_DIR: &str = "models";
pub const DEFAULT_LOG_FILE: &str = "art-insight.log";
pub const DEFAULT_SANITIZE_MAX_BYTES: usize = 16 * 1024;

/// Where log output goes. Stdout is reserved for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Stderr,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub artifact_dir: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub require_manifest: bool,
}

/// `1`, `true`, `TRUE`, `yes` and `YES` are true; anything else is false.
#[must_use]
pub fn parse_bool(value: &str) -> bool {
    matches!(value, "1" | "true" | "TRUE" | "yes" | "YES")
}

impl Settings {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let log_mode = match non_empty(LOG_MODE_ENV).as_deref().map(str::trim) {
            Some("file") => LogMode::File,
            _ => LogMode::Stderr,
        };

        Self {
            artifact_dir: non_empty(ARTIFACT_DIR_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR), PathBuf::from),
            log_mode,
            log_file: non_empty(LOG_FILE_ENV)
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
            require_manifest: lookup(REQUIRE_MANIFEST_ENV).is_some_and(|v| parse_bool(&v)),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
