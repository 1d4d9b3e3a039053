//! Supporting data structures shared by the store and its collaborators.
use std::path::PathBuf;

use crate::{Idea, IdeaError};

/// A specialized Result type for itrk operations.
pub type Result<T> = std::result::Result<T, IdeaError>;

/// Field changes applied by `IdeaStore::update`.
///
/// `None` leaves a field untouched. An empty `title` or `content` is ignored
/// as well, while an empty `tags` list clears the tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaUpdate {
    pub title: Option<String>,
    pub tags: Option<Vec<String>>,
    pub content: Option<String>,
}

impl IdeaUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Applies the changes to `idea`, leaving `modified` alone.
    pub(crate) fn apply_to(self, idea: &mut Idea) {
        if let Some(title) = self.title.filter(|t| !t.is_empty()) {
            idea.title = title;
        }
        if let Some(tags) = self.tags {
            idea.tags = tags;
        }
        if let Some(content) = self.content.filter(|c| !c.is_empty()) {
            idea.content = content.trim().to_string();
        }
    }
}

/// Result of walking the ideas directory.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Successfully parsed ideas, ordered by id.
    pub ideas: Vec<Idea>,
    /// Idea files that could not be read or parsed.
    pub failures: Vec<(PathBuf, IdeaError)>,
}

/// Summary of a backup restoration operation
#[derive(Debug, Clone)]
pub struct RestoreSummary {
    /// Path to the backup file that was restored
    pub backup_file: PathBuf,
    /// Number of idea files found in the archive
    pub total_ideas: usize,
    /// Number of idea files written to the ideas directory
    pub ideas_restored: usize,
    /// Entries skipped (existing file without overwrite, or not an idea file)
    pub entries_skipped: usize,
    /// Entries that failed to restore
    pub failed_entries: Vec<(String, String)>, // (entry name, error message)
}
