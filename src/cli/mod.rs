//! Command-line driver for the itrk idea store.
//!
//! Parses arguments, calls into `IdeaStore` / `BackupManager` and formats the
//! results for the terminal. The library core never prints.
mod app;
mod args;

pub use app::*;
pub use args::*;
