//! Zip backups of the ideas directory.
//!
//! Backups treat the ideas directory as a set of files: entries are selected
//! by file name only and are never parsed.
use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    fs::{self, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::Local;
use log::{debug, info, warn};
use walkdir::WalkDir;
use zip::{write::SimpleFileOptions, ZipArchive, ZipWriter};

use crate::{Config, IdeaError, IdeaStore, RestoreSummary, Result};

const BACKUP_PREFIX: &str = "itrk_backup_";

/// Creates, lists and restores zip archives of the ideas directory.
#[derive(Debug, Clone)]
pub struct BackupManager {
    ideas_dir: PathBuf,
    backup_dir: PathBuf,
    /// 0 keeps every archive
    max_backups: u32,
}

impl BackupManager {
    pub fn new(
        ideas_dir: impl Into<PathBuf>,
        backup_dir: impl Into<PathBuf>,
        max_backups: u32,
    ) -> Self {
        Self {
            ideas_dir: ideas_dir.into(),
            backup_dir: backup_dir.into(),
            max_backups,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.ideas_dir, &config.backup_dir, config.max_backups)
    }

    /// Zips every idea file into a new timestamped archive and prunes old
    /// archives beyond the retention limit.
    ///
    /// # Returns
    ///
    /// The path to the created archive
    pub fn create_backup(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| IdeaError::storage(&self.backup_dir, e))?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_path = self
            .backup_dir
            .join(format!("{}{}.zip", BACKUP_PREFIX, timestamp));

        let file = File::create(&backup_path).map_err(|e| IdeaError::storage(&backup_path, e))?;
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated)
            .unix_permissions(0o644);

        let mut count = 0;
        for (name, path) in self.idea_files()? {
            let bytes = fs::read(&path).map_err(|e| IdeaError::storage(&path, e))?;
            zip.start_file(name.as_str(), options)?;
            zip.write_all(&bytes).map_err(|e| IdeaError::Backup {
                message: format!("Failed to write {} to backup: {}", name, e),
            })?;
            count += 1;
        }

        zip.finish()?;
        self.cleanup_old_backups()?;

        info!(
            "Backup created with {} ideas at {}",
            count,
            backup_path.display()
        );
        Ok(backup_path)
    }

    /// Backup archives in the backup directory, newest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = self.backup_files()?;
        backups.sort_by(|a, b| b.cmp(a));
        Ok(backups.into_iter().map(|b| b.path).collect())
    }

    /// Extracts the idea files of an archive into the ideas directory.
    ///
    /// Existing idea files are left alone unless `overwrite` is set. Entries
    /// whose names are not idea file names are skipped.
    pub fn restore_backup(&self, backup_path: &Path, overwrite: bool) -> Result<RestoreSummary> {
        if !backup_path.is_file() {
            return Err(IdeaError::Backup {
                message: format!("Backup file not found: {}", backup_path.display()),
            });
        }

        let file = File::open(backup_path).map_err(|e| IdeaError::storage(backup_path, e))?;
        let mut archive = ZipArchive::new(file)?;
        fs::create_dir_all(&self.ideas_dir).map_err(|e| IdeaError::storage(&self.ideas_dir, e))?;

        let mut summary = RestoreSummary {
            backup_file: backup_path.to_path_buf(),
            total_ideas: 0,
            ideas_restored: 0,
            entries_skipped: 0,
            failed_entries: Vec::new(),
        };

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();

            if entry.is_dir() || IdeaStore::parse_idea_file_name(&name).is_none() {
                debug!("Skipping non-idea archive entry: {}", name);
                summary.entries_skipped += 1;
                continue;
            }
            summary.total_ideas += 1;

            let target = self.ideas_dir.join(&name);
            if !overwrite && target.exists() {
                debug!("Keeping existing idea file: {}", target.display());
                summary.entries_skipped += 1;
                continue;
            }

            match extract_entry(&mut entry, &target) {
                Ok(()) => summary.ideas_restored += 1,
                Err(e) => {
                    warn!("Failed to restore {}: {}", name, e);
                    summary.failed_entries.push((name, e.to_string()));
                }
            }
        }

        info!(
            "Restore complete: restored {}, skipped {}, failed {} from {}",
            summary.ideas_restored,
            summary.entries_skipped,
            summary.failed_entries.len(),
            backup_path.display()
        );
        Ok(summary)
    }

    /// Idea files currently in the ideas directory, as (file name, path).
    fn idea_files(&self) -> Result<Vec<(String, PathBuf)>> {
        if !self.ideas_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(&self.ideas_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| IdeaError::storage(&self.ideas_dir, e.into()))?;
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            if entry.file_type().is_file() && IdeaStore::parse_idea_file_name(name).is_some() {
                files.push((name.to_string(), entry.path().to_path_buf()));
            }
        }
        files.sort();
        Ok(files)
    }

    fn backup_files(&self) -> Result<Vec<BackupFile>> {
        let mut backups = Vec::new();
        for entry in WalkDir::new(&self.backup_dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| IdeaError::storage(&self.backup_dir, e.into()))?;
            let path = entry.path();

            let is_backup = path.is_file()
                && path.extension().is_some_and(|ext| ext == "zip")
                && path
                    .file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with(BACKUP_PREFIX));
            if !is_backup {
                continue;
            }

            let modified_time = entry
                .metadata()
                .map_err(|e| IdeaError::storage(path, e.into()))?
                .modified()
                .map_err(|e| IdeaError::storage(path, e))?;
            backups.push(BackupFile {
                path: path.to_path_buf(),
                modified_time,
            });
        }
        Ok(backups)
    }

    /// Removes the oldest archives once there are more than `max_backups`.
    fn cleanup_old_backups(&self) -> Result<()> {
        if self.max_backups == 0 {
            return Ok(());
        }

        // Min-heap: the oldest archive sits on top.
        let mut newest: BinaryHeap<Reverse<BackupFile>> =
            BinaryHeap::with_capacity(self.max_backups as usize + 1);
        let mut removed = 0;

        for backup in self.backup_files()? {
            newest.push(Reverse(backup));
            if newest.len() > self.max_backups as usize {
                if let Some(Reverse(oldest)) = newest.pop() {
                    match fs::remove_file(&oldest.path) {
                        Ok(()) => {
                            debug!("Removed old backup: {}", oldest.path.display());
                            removed += 1;
                        }
                        Err(e) => warn!(
                            "Failed to remove old backup {}: {}",
                            oldest.path.display(),
                            e
                        ),
                    }
                }
            }
        }

        if removed > 0 {
            debug!(
                "Cleanup complete: kept {} backups, removed {}",
                newest.len(),
                removed
            );
        }
        Ok(())
    }
}

/// Archive on disk, ordered by modification time then path.
#[derive(Debug, PartialEq, Eq)]
struct BackupFile {
    path: PathBuf,
    modified_time: SystemTime,
}

impl PartialOrd for BackupFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BackupFile {
    fn cmp(&self, other: &Self) -> Ordering {
        self.modified_time
            .cmp(&other.modified_time)
            .then_with(|| self.path.cmp(&other.path))
    }
}

fn extract_entry(entry: &mut impl Read, target: &Path) -> io::Result<()> {
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    fs::write(target, bytes)
}
