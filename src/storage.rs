use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use log::{debug, error, info, trace, warn};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

use crate::{
    ensure_declared_id, load_idea_from_file, Config, Idea, IdeaError, IdeaUpdate, Result,
    ScanReport,
};

const IDEA_FILE_PREFIX: &str = "idea";
const IDEA_FILE_EXTENSION: &str = ".md";

/// Manages a directory holding one Markdown file per idea.
///
/// Nothing is cached between calls: every operation reads from or writes to
/// the directory, so edits made by hand show up on the next call.
#[derive(Debug, Clone)]
pub struct IdeaStore {
    /// Directory where idea files live
    dir: PathBuf,
}

impl IdeaStore {
    /// Opens the store rooted at `dir`, creating the directory and any
    /// missing parents.
    ///
    /// # Errors
    ///
    /// `IdeaError::Storage` if `dir` exists but is not a directory, or if it
    /// cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();

        if dir.exists() {
            if !dir.is_dir() {
                error!("Ideas path is not a directory: {}", dir.display());
                return Err(IdeaError::storage(
                    dir,
                    io::Error::new(
                        io::ErrorKind::AlreadyExists,
                        "path exists but is not a directory",
                    ),
                ));
            }
        } else {
            debug!("Ideas directory does not exist, creating: {}", dir.display());
            fs::create_dir_all(&dir).map_err(|e| {
                error!("Failed to create ideas directory {}: {}", dir.display(), e);
                IdeaError::storage(&dir, e)
            })?;
        }

        info!("Opened idea store at {}", dir.display());
        Ok(Self { dir })
    }

    /// Opens the store at the configured ideas directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::open(&config.ideas_dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name holding the idea with the given id, e.g. `idea241025154736.md`.
    pub fn idea_file_name(id: u64) -> String {
        format!("{}{}{}", IDEA_FILE_PREFIX, id, IDEA_FILE_EXTENSION)
    }

    /// Extracts the id from an idea file name; `None` for any other name.
    pub fn parse_idea_file_name(name: &str) -> Option<u64> {
        let digits = name
            .strip_prefix(IDEA_FILE_PREFIX)?
            .strip_suffix(IDEA_FILE_EXTENSION)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }

    /// Path of the file backing `id`, whether or not it exists.
    pub fn path_for(&self, id: u64) -> PathBuf {
        self.dir.join(Self::idea_file_name(id))
    }

    /// Current local time as a `YYMMDDHHMMSS` integer.
    ///
    /// Ids have one-second resolution: two creates within the same second get
    /// the same id and the second overwrites the first.
    pub fn generate_id(&self) -> u64 {
        timestamp_id(&Local::now())
    }

    /// Returns every idea in the directory, ordered by id.
    ///
    /// Files that cannot be read or parsed are logged and left out; use
    /// [`IdeaStore::scan`] to get them.
    pub fn list_all(&self) -> Result<Vec<Idea>> {
        let report = self.scan()?;
        if !report.failures.is_empty() {
            warn!(
                "Skipped {} unreadable idea file(s) in {}",
                report.failures.len(),
                self.dir.display()
            );
        }
        Ok(report.ideas)
    }

    /// Walks the directory, parsing every idea file and collecting failures.
    pub fn scan(&self) -> Result<ScanReport> {
        debug!("Scanning ideas directory: {}", self.dir.display());
        let mut report = ScanReport::default();

        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                error!("Failed to read ideas directory {}: {}", self.dir.display(), e);
                let path = e.path().map_or_else(|| self.dir.clone(), Path::to_path_buf);
                IdeaError::storage(path, e.into())
            })?;

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(Self::parse_idea_file_name)
            else {
                trace!("Ignoring non-idea file: {}", entry.path().display());
                continue;
            };

            match load_idea_from_file(entry.path())
                .and_then(|idea| ensure_declared_id(idea, id, entry.path()))
            {
                Ok(idea) => report.ideas.push(idea),
                Err(e) => {
                    warn!("Failed to load idea from {}: {}", entry.path().display(), e);
                    report.failures.push((entry.path().to_path_buf(), e));
                }
            }
        }

        report.ideas.sort_by_key(|idea| idea.id);
        debug!(
            "Scan found {} ideas and {} failures",
            report.ideas.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Loads the idea with the given id, or `None` if no file backs it.
    ///
    /// A file whose metadata declares a different id is a format error.
    pub fn load(&self, id: u64) -> Result<Option<Idea>> {
        let path = self.path_for(id);
        match load_idea_from_file(&path) {
            Ok(idea) => ensure_declared_id(idea, id, &path).map(Some),
            Err(IdeaError::Storage { ref source, .. })
                if source.kind() == io::ErrorKind::NotFound =>
            {
                debug!("Idea not found: {}", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Creates and persists a new idea with a freshly generated id.
    ///
    /// No collision check is made: an idea created in the same second as an
    /// existing one replaces its file.
    pub fn create(&self, title: &str, tags: Vec<String>, content: &str) -> Result<Idea> {
        let id = self.generate_id();
        if self.path_for(id).exists() {
            warn!("Idea {} already exists and will be overwritten", id);
        }

        let idea = Idea::new(id, title, tags, content);
        self.save(&idea)?;
        info!("Created idea {}", idea.id);
        Ok(idea)
    }

    /// Applies `changes` to the idea with the given id and bumps `modified`.
    ///
    /// Returns `false` when the idea does not exist.
    pub fn update(&self, id: u64, changes: IdeaUpdate) -> Result<bool> {
        let Some(mut idea) = self.load(id)? else {
            debug!("Cannot update missing idea {}", id);
            return Ok(false);
        };

        changes.apply_to(&mut idea);
        idea.modified = self.generate_id().max(idea.id);

        self.save(&idea)?;
        info!("Updated idea {}", id);
        Ok(true)
    }

    /// Removes the file backing `id`. Returns whether it existed.
    pub fn delete(&self, id: u64) -> Result<bool> {
        let path = self.path_for(id);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted idea {}", id);
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Cannot delete missing idea {}", id);
                Ok(false)
            }
            Err(e) => {
                error!("Failed to remove idea file {}: {}", path.display(), e);
                Err(IdeaError::storage(path, e))
            }
        }
    }

    /// Writes `idea` to its file through a temporary file in the same
    /// directory, so readers never see a half-written idea.
    pub fn save(&self, idea: &Idea) -> Result<()> {
        let file_path = self.path_for(idea.id);
        debug!("Saving idea {} to {}", idea.id, file_path.display());

        let text = idea.render()?;

        let mut temp_file = NamedTempFile::new_in(&self.dir).map_err(|e| {
            error!("Failed to create temporary file: {}", e);
            IdeaError::storage(&self.dir, e)
        })?;

        temp_file
            .write_all(text.as_bytes())
            .and_then(|_| temp_file.flush())
            .map_err(|e| {
                error!("Failed to write temporary file: {}", e);
                IdeaError::storage(temp_file.path(), e)
            })?;

        temp_file.persist(&file_path).map_err(|e| {
            error!("Failed to persist file {}: {}", file_path.display(), e.error);
            IdeaError::storage(&file_path, e.error)
        })?;

        trace!("Idea {} written", idea.id);
        Ok(())
    }
}

/// Formats a point in time as a `YYMMDDHHMMSS` integer.
pub fn timestamp_id<Tz: TimeZone>(at: &DateTime<Tz>) -> u64 {
    let year = at.year().rem_euclid(100) as u64;
    let date = year * 10_000 + at.month() as u64 * 100 + at.day() as u64;
    let time = at.hour() as u64 * 10_000 + at.minute() as u64 * 100 + at.second() as u64;
    date * 1_000_000 + time
}
