//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kinship CLI - Manage typed relationships between users.
///
/// Users and relationship types can be given by name or by numeric id.
#[derive(Debug, Parser)]
#[command(name = "kinship")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file (overrides the config file)
    #[arg(long, global = true, env = "KINSHIP_DB")]
    pub db: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true, env = "KINSHIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage users
    User(UserArgs),

    /// Manage relationship types
    Type(TypeArgs),

    /// Propose a relationship from one user to another
    Propose(ProposeArgs),

    /// Approve a pending relationship
    Approve(AnswerArgs),

    /// Deny a pending relationship
    Deny(AnswerArgs),

    /// Remove a relationship
    Remove(RemoveArgs),

    /// List a user's relationships
    List(ListArgs),

    /// Show a single relationship
    Show(ShowArgs),
}

/// Arguments for user management.
#[derive(Debug, Parser)]
pub struct UserArgs {
    #[command(subcommand)]
    pub action: UserAction,
}

/// User management actions.
#[derive(Debug, Subcommand)]
pub enum UserAction {
    /// Register a user
    Add {
        /// Username
        username: String,
    },

    /// List all users
    List,
}

/// Arguments for relationship type management.
#[derive(Debug, Parser)]
pub struct TypeArgs {
    #[command(subcommand)]
    pub action: TypeAction,
}

/// Relationship type actions.
#[derive(Debug, Subcommand)]
pub enum TypeAction {
    /// Create a relationship type
    Add {
        /// Type name (e.g. friend, colleague)
        name: String,
    },

    /// List all relationship types
    List,
}

/// Arguments for the propose command.
#[derive(Debug, Parser)]
pub struct ProposeArgs {
    /// User proposing the relationship
    pub requester: String,

    /// User asked to approve
    pub target: String,

    /// Relationship type
    #[arg(value_name = "TYPE")]
    pub relationship_type: String,
}

/// Arguments for approve and deny.
#[derive(Debug, Parser)]
pub struct AnswerArgs {
    /// Relationship ID
    pub id: String,

    /// Act as this user, who must be the target
    #[arg(long = "as", value_name = "USER")]
    pub actor: Option<String>,
}

/// Arguments for the remove command.
#[derive(Debug, Parser)]
pub struct RemoveArgs {
    /// Relationship ID
    pub id: String,

    /// Party ending the relationship; the other party is notified
    #[arg(long = "as", value_name = "USER")]
    pub actor: String,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// User whose relationships to list
    pub user: String,

    /// List pending relationships instead of approved ones
    #[arg(long, conflicts_with = "incoming")]
    pub pending: bool,

    /// List pending proposals waiting on this user
    #[arg(long)]
    pub incoming: bool,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Relationship ID
    pub id: String,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl Cli {
    /// Log filter directive implied by `-v`, used when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propose_command() {
        let cli = Cli::parse_from(["kinship", "propose", "alice", "bob", "friend"]);
        match cli.command {
            Command::Propose(args) => {
                assert_eq!(args.requester, "alice");
                assert_eq!(args.target, "bob");
                assert_eq!(args.relationship_type, "friend");
            }
            _ => panic!("Expected Propose command"),
        }
    }

    #[test]
    fn test_answer_with_actor() {
        let cli = Cli::parse_from(["kinship", "approve", "3", "--as", "bob"]);
        match cli.command {
            Command::Approve(args) => {
                assert_eq!(args.id, "3");
                assert_eq!(args.actor.as_deref(), Some("bob"));
            }
            _ => panic!("Expected Approve command"),
        }

        let cli = Cli::parse_from(["kinship", "deny", "3"]);
        assert!(matches!(cli.command, Command::Deny(AnswerArgs { actor: None, .. })));
    }

    #[test]
    fn test_remove_requires_actor() {
        assert!(Cli::try_parse_from(["kinship", "remove", "3"]).is_err());
        let cli = Cli::parse_from(["kinship", "remove", "3", "--as", "alice"]);
        assert!(matches!(cli.command, Command::Remove(_)));
    }

    #[test]
    fn test_list_flags_conflict() {
        assert!(Cli::try_parse_from(["kinship", "list", "alice", "--pending", "--incoming"]).is_err());
        let cli = Cli::parse_from(["kinship", "list", "alice", "--incoming"]);
        match cli.command {
            Command::List(args) => assert!(args.incoming && !args.pending),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "kinship", "user", "list", "--db", "/tmp/k.db", "-f", "json", "-vv", "--no-color",
        ]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/k.db")));
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.no_color);
        assert_eq!(cli.log_directive(), "trace");
        assert!(matches!(
            cli.command,
            Command::User(UserArgs { action: UserAction::List })
        ));
    }
}
