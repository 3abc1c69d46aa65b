//! Pairing Pears CLI
//!
//! Command-line front end over the application facade. The database lives
//! next to this executable.

use clap::{Parser, Subcommand};
use pairing_pears::{App, Result};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Pairing Pears CLI
#[derive(Parser, Debug)]
#[command(name = "pairing-pears")]
#[command(about = "Manage developers and pairing groups")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Developer operations
    #[command(subcommand)]
    Dev(DevCommand),

    /// Group operations
    #[command(subcommand)]
    Group(GroupCommand),

    /// Rewrite the database file without its history
    Compact,
}

#[derive(Subcommand, Debug)]
enum DevCommand {
    /// List all developers
    List,

    /// Add a developer
    Add {
        /// Developer name
        name: String,
    },

    /// Delete a developer by id
    Rm {
        /// Developer id
        id: String,
    },

    /// Delete all developers
    Clear,
}

#[derive(Subcommand, Debug)]
enum GroupCommand {
    /// List all groups
    List,

    /// Add an empty group
    Add {
        /// Group name
        name: String,
    },

    /// Replace a group's name and members
    Update {
        /// Group id
        id: String,

        /// New group name
        name: String,

        /// Member developer ids (replaces the current list)
        members: Vec<String>,
    },

    /// Delete a group by id
    Rm {
        /// Group id
        id: String,
    },

    /// Delete all groups
    Clear,

    /// Spread unassigned developers across groups at random
    Assign,

    /// Remove all members from all groups
    Unassign,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,pairing_pears=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("Pairing Pears v{}", pairing_pears::VERSION);

    let mut app = match App::from_executable_dir() {
        Ok(app) => app,
        Err(e) => {
            tracing::error!("Failed to resolve database path: {}", e);
            std::process::exit(1);
        }
    };

    if app.startup().is_err() {
        std::process::exit(1);
    }

    let outcome = run(&app, args.command);

    if let Err(e) = app.shutdown() {
        tracing::error!("Failed to close database: {}", e);
    }

    if let Err(e) = outcome {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Execute one command against a started app
fn run(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Dev(DevCommand::List) => print_json(&app.get_all_developers()?),
        Commands::Dev(DevCommand::Add { name }) => print_json(&app.add_developer(&name)?),
        Commands::Dev(DevCommand::Rm { id }) => app.delete_developer(&id),
        Commands::Dev(DevCommand::Clear) => app.clear_all_developers(),

        Commands::Group(GroupCommand::List) => print_json(&app.get_all_groups()?),
        Commands::Group(GroupCommand::Add { name }) => print_json(&app.add_group(&name)?),
        Commands::Group(GroupCommand::Update { id, name, members }) => {
            app.update_group(&id, &name, members)
        }
        Commands::Group(GroupCommand::Rm { id }) => app.delete_group(&id),
        Commands::Group(GroupCommand::Clear) => app.clear_all_groups(),
        Commands::Group(GroupCommand::Assign) => print_json(&app.auto_assign_developers()?),
        Commands::Group(GroupCommand::Unassign) => print_json(&app.clear_group_members()?),

        Commands::Compact => {
            let stats = app.compact()?;
            tracing::info!(
                "Compacted: {} -> {} bytes ({} keys)",
                stats.bytes_before,
                stats.bytes_after,
                stats.keys
            );
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
