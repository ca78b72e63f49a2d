//! Kinship CLI library.
//!
//! Operator surface over a SQLite relationship database: seeding users and
//! relationship types, and driving every lifecycle transition from a shell.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use commands::{Events, Service};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
