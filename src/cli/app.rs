use std::{
    fs::read_to_string,
    io::{stdin, stdout, Write},
    path::Path,
};

use console::style;
use log::info;

use crate::{
    content_preview, parse_tags, BackupManager, Commands, Config, Idea, IdeaError, IdeaStore,
    IdeaUpdate, Result,
};

/// CLI Application handler - processes CLI commands and interfaces with IdeaStore
pub struct App {
    /// The idea store backend
    store: IdeaStore,

    /// Backup collaborator working on the same directory
    backups: BackupManager,
}

impl App {
    /// Create a new CLI application for the given configuration
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            store: IdeaStore::from_config(config)?,
            backups: BackupManager::from_config(config),
        })
    }

    pub fn store(&self) -> &IdeaStore {
        &self.store
    }

    /// Run the CLI application with the given command
    pub fn run(&self, command: Commands) -> Result<()> {
        match command {
            Commands::List { json, brief } => self.list_ideas(json, brief)?,

            Commands::Show { id, json } => self.show_idea(id, json)?,

            Commands::Add {
                title,
                tags,
                content,
                file,
            } => {
                let content = read_content(content, file.as_deref())?.unwrap_or_default();
                self.add_idea(&title, parse_tags(tags), &content)?;
            }

            Commands::Update {
                id,
                title,
                tags,
                content,
                file,
            } => {
                let changes = IdeaUpdate {
                    title,
                    tags: tags.map(|t| parse_tags(Some(t))),
                    content: read_content(content, file.as_deref())?,
                };
                self.update_idea(id, changes)?;
            }

            Commands::Delete { id, force } => self.delete_idea(id, force)?,

            Commands::Backup => {
                let path = self.backups.create_backup()?;
                println!("Backup written to {}", path.display());
            }

            Commands::Backups => self.list_backups()?,

            Commands::Restore { backup_file, force } => {
                let summary = self.backups.restore_backup(&backup_file, force)?;
                println!("Restored from {}", summary.backup_file.display());
                println!("  Ideas in archive:  {}", summary.total_ideas);
                println!("  Restored:          {}", summary.ideas_restored);
                println!("  Skipped:           {}", summary.entries_skipped);
                for (name, error) in &summary.failed_entries {
                    eprintln!("  Failed {}: {}", name, error);
                }
            }
        }

        Ok(())
    }

    /// Creates the idea and returns it
    pub fn add_idea(&self, title: &str, tags: Vec<String>, content: &str) -> Result<Idea> {
        let idea = self.store.create(title, tags, content)?;
        println!("Idea created with ID: {}", idea.id);
        Ok(idea)
    }

    /// Applies the changes, failing with `IdeaNotFound` for an unknown id
    pub fn update_idea(&self, id: u64, changes: IdeaUpdate) -> Result<()> {
        if !self.store.update(id, changes)? {
            return Err(IdeaError::IdeaNotFound { id });
        }
        println!("Idea {} updated successfully", id);
        Ok(())
    }

    fn list_ideas(&self, json: bool, brief: bool) -> Result<()> {
        let report = self.store.scan()?;
        for (path, error) in &report.failures {
            eprintln!("{} {}: {}", style("skipped").yellow(), path.display(), error);
        }

        let ideas = report.ideas;
        if json {
            println!("{}", serde_json::to_string_pretty(&ideas)?);
            return Ok(());
        }

        if ideas.is_empty() {
            println!("No ideas recorded yet.");
            return Ok(());
        }

        for (i, idea) in ideas.iter().enumerate() {
            if brief {
                println!("{}  {}", idea.id, idea.title);
                continue;
            }

            if i > 0 {
                println!("{}", "-".repeat(50));
            }
            print_summary(idea);
            let preview = content_preview(&idea.content, 100);
            if !preview.is_empty() {
                println!("\n{}", preview);
            }
        }

        println!(
            "\nFound {} idea{}",
            ideas.len(),
            if ideas.len() == 1 { "" } else { "s" }
        );
        Ok(())
    }

    fn show_idea(&self, id: u64, json: bool) -> Result<()> {
        let idea = self
            .store
            .load(id)?
            .ok_or(IdeaError::IdeaNotFound { id })?;

        if json {
            println!("{}", serde_json::to_string_pretty(&idea)?);
        } else {
            print_summary(&idea);
            if !idea.content.is_empty() {
                println!("\n{}", idea.content);
            }
        }
        Ok(())
    }

    fn delete_idea(&self, id: u64, force: bool) -> Result<()> {
        let idea = self
            .store
            .load(id)?
            .ok_or(IdeaError::IdeaNotFound { id })?;

        if !force {
            println!("You are about to delete the following idea:");
            print_summary(&idea);

            println!("\nThis action cannot be undone!");
            print!("Are you sure you want to delete this idea? [y/N]: ");
            stdout().flush()?;

            let mut input = String::new();
            stdin().read_line(&mut input)?;

            let input = input.trim().to_lowercase();
            if input != "y" && input != "yes" {
                println!("Deletion cancelled.");
                return Ok(());
            }
        }

        if !self.store.delete(id)? {
            return Err(IdeaError::IdeaNotFound { id });
        }
        println!(
            "Idea '{}' ({}) has been permanently deleted.",
            idea.title, idea.id
        );
        Ok(())
    }

    fn list_backups(&self) -> Result<()> {
        let backups = self.backups.list_backups()?;
        if backups.is_empty() {
            println!("No backups found.");
        }
        for path in backups {
            println!("{}", path.display());
        }
        Ok(())
    }
}

/// Prints the metadata lines of an idea
fn print_summary(idea: &Idea) {
    println!("ID: {} | Modified: {}", idea.id, idea.modified);
    println!("Title: {}", style(&idea.title).bold());
    if !idea.tags.is_empty() {
        let tags = idea
            .tags
            .iter()
            .map(|tag| format!("#{}", tag))
            .collect::<Vec<_>>()
            .join(" ");
        println!("Tags: {}", style(tags).cyan());
    }
}

/// Content from `--content`, else from `--file`, else `None`.
fn read_content(content: Option<String>, file: Option<&Path>) -> Result<Option<String>> {
    match (content, file) {
        (Some(c), _) => Ok(Some(c)),
        (None, Some(path)) => {
            info!("Reading content from {}", path.display());
            read_to_string(path)
                .map(Some)
                .map_err(|e| IdeaError::storage(path, e))
        }
        (None, None) => Ok(None),
    }
}
