//! Kinship CLI - Command-line interface for the relationship service.

use clap::Parser;
use kinship_cli::commands;
use kinship_cli::{Cli, Command, Config, Events, Formatter, Service};
use kinship_service::{RecordingNotifier, RelationshipService, TracingNotifier};
use kinship_store::SqliteStore;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> kinship_cli::Result<()> {
    // An explicit --config must exist; the default one is created on first run
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_create()?,
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    let database = cli.db.clone().unwrap_or_else(|| config.database.clone());
    if let Some(parent) = database.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    debug!(database = %database.display(), "opening relationship store");

    let store = SqliteStore::new(&database)?;
    let events = Events::new(TracingNotifier, RecordingNotifier::new());
    let mut service: Service =
        RelationshipService::new(store, events.clone(), events, config.service.clone());
    debug!(rules = ?service.config(), "relationship service ready");

    match cli.command {
        Command::User(args) => commands::execute_user(args, &mut service, &formatter)?,
        Command::Type(args) => commands::execute_type(args, &mut service, &formatter)?,
        Command::Propose(args) => commands::execute_propose(args, &mut service, &formatter)?,
        Command::Approve(args) => commands::execute_approve(args, &mut service, &formatter)?,
        Command::Deny(args) => commands::execute_deny(args, &mut service, &formatter)?,
        Command::Remove(args) => commands::execute_remove(args, &mut service, &formatter)?,
        Command::List(args) => commands::execute_list(args, &service, &formatter)?,
        Command::Show(args) => commands::execute_show(args, &service, &formatter)?,
    }

    Ok(())
}
