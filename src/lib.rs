//! Personal idea tracker library
//!
//! Each idea is stored as one human-editable Markdown file with a YAML
//! metadata header. `IdeaStore` provides create/read/update/delete over a
//! directory of such files; the command-line driver and backup helper are
//! built on top of it.

mod backup;
mod cli;
mod config;
mod errors;
mod helper;
mod idea;
mod storage;
mod types;

// Re-export key components
pub use backup::*;
pub use cli::*;
pub use config::*;
pub use errors::*;
pub use helper::*;
pub use idea::*;
pub use storage::*;
pub use types::*;
