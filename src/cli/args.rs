use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Main CLI application arguments and command structure
#[derive(Parser, Debug)]
#[clap(
    name = "itrk",
    version,
    about = "Track ideas as one Markdown file per idea"
)]
pub struct Cli {
    /// Home directory holding `notes/` and `backup/`
    /// (default: $ITRKHOME, then the current directory)
    #[clap(long, value_parser)]
    pub home: Option<PathBuf>,

    /// Log level: 10 debug, 20 info, 30 warn, 40 error
    #[clap(short = 'l', long)]
    pub log_level: Option<u8>,

    /// Subcommands for the itrk application
    #[clap(subcommand)]
    pub command: Commands,
}

/// Available subcommands for the itrk application
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List all ideas, oldest first
    List {
        /// Format output as JSON
        #[clap(short, long)]
        json: bool,

        /// Only show idea IDs and titles
        #[clap(short, long)]
        brief: bool,
    },

    /// Show an idea by ID
    Show {
        /// ID of the idea to show
        id: u64,

        /// Format output as JSON
        #[clap(short, long)]
        json: bool,
    },

    /// Record a new idea
    Add {
        /// Title of the idea
        #[clap(short = 'T', long)]
        title: String,

        /// Tags to associate with the idea (comma-separated)
        #[clap(short = 't', long)]
        tags: Option<String>,

        /// Content of the idea
        #[clap(short, long, conflicts_with = "file")]
        content: Option<String>,

        /// Path to a file containing the idea's content
        #[clap(short, long)]
        file: Option<PathBuf>,
    },

    /// Change an existing idea
    Update {
        /// ID of the idea to update
        id: u64,

        /// New title (an empty title is ignored)
        #[clap(short = 'T', long)]
        title: Option<String>,

        /// Replacement tags (comma-separated, an empty string clears them)
        #[clap(short = 't', long)]
        tags: Option<String>,

        /// New content (empty content is ignored)
        #[clap(short, long, conflicts_with = "file")]
        content: Option<String>,

        /// Path to a file containing the new content
        #[clap(short, long)]
        file: Option<PathBuf>,
    },

    /// Delete an idea by ID
    Delete {
        /// ID of the idea to delete
        id: u64,

        /// Skip confirmation prompt
        #[clap(short, long)]
        force: bool,
    },

    /// Create a backup archive of all ideas
    Backup,

    /// List backup archives, newest first
    Backups,

    /// Restore ideas from a backup archive
    Restore {
        /// Path to the backup archive
        backup_file: PathBuf,

        /// Overwrite ideas that already exist
        #[clap(short, long)]
        force: bool,
    },
}
