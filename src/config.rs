use std::{env, path::PathBuf};

use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::{IdeaError, Result};

/// Environment variable naming the itrk home directory.
pub const HOME_ENV_VAR: &str = "ITRKHOME";

/// Numeric log level used when none is given (info).
pub const DEFAULT_LOG_LEVEL: u8 = 20;

/// Number of backup archives kept by default.
pub const DEFAULT_MAX_BACKUPS: u32 = 7;

/// Application configuration settings.
///
/// Built once by the entry point and handed by reference to whatever needs it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root directory holding the ideas and backup directories
    pub home: PathBuf,

    /// Directory where idea files are stored
    pub ideas_dir: PathBuf,

    /// Directory for backup archives
    pub backup_dir: PathBuf,

    /// Maximum number of backups to keep (0 keeps all)
    pub max_backups: u32,

    /// Log level on the 10/20/30/40 scale (debug/info/warn/error)
    pub log_level: u8,
}

impl Config {
    /// Builds a configuration rooted at `home` with default settings.
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Config {
            ideas_dir: home.join("notes"),
            backup_dir: home.join("backup"),
            home,
            max_backups: DEFAULT_MAX_BACKUPS,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }

    /// Resolves the configuration for this process.
    ///
    /// The home directory is the explicit path if given, else `$ITRKHOME`,
    /// else the current directory.
    pub fn resolve(home: Option<PathBuf>, log_level: Option<u8>) -> Result<Self> {
        let env_home = env::var_os(HOME_ENV_VAR)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let home = match choose_home(home, env_home) {
            Some(home) => home,
            None => env::current_dir().map_err(|e| IdeaError::Config {
                message: format!("cannot determine current directory: {}", e),
            })?,
        };

        let mut config = Config::with_home(home);
        if let Some(level) = log_level {
            config.log_level = level;
        }
        Ok(config)
    }

    /// Maps the numeric log level onto a `log` filter.
    pub fn level_filter(&self) -> LevelFilter {
        match self.log_level {
            0..=9 => LevelFilter::Trace,
            10..=19 => LevelFilter::Debug,
            20..=29 => LevelFilter::Info,
            30..=39 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    }
}

fn choose_home(explicit: Option<PathBuf>, from_env: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or(from_env)
}
