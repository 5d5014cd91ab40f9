//! kvnest CLI
//!
//! Command-line tools for kvnest database maintenance.
//!
//! # Commands
//!
//! - `tables` - List the tables of a namespace with their key counts
//! - `keys` - List the keys of a table and whether they are encrypted
//! - `namespaces` - List nested namespaces
//! - `crypt-reset` - Delete every encrypted value so a lost padlock can be replaced

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// kvnest command-line database tools.
#[derive(Parser)]
#[command(name = "kvnest")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the database file
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Padlock the database was sealed with (empty if omitted)
    #[arg(global = true, long, default_value = "")]
    padlock: String,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List tables with their key counts
    Tables {
        /// Namespace to list, segments joined with '/'
        #[arg(short, long)]
        namespace: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the keys of a table
    Keys {
        /// Table name
        table: String,

        /// Namespace holding the table, segments joined with '/'
        #[arg(short, long)]
        namespace: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List nested namespaces
    Namespaces {
        /// Namespace to start from, segments joined with '/'
        #[arg(short, long)]
        namespace: Option<String>,

        /// List every nested table path instead of direct children only
        #[arg(short, long)]
        all: bool,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Delete every encrypted value and forget the padlock
    CryptReset {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let padlock = cli.padlock.as_bytes();

    match cli.command {
        Commands::Tables { namespace, format } => {
            let path = cli.path.ok_or("Database path required for tables")?;
            commands::tables::run(&path, padlock, namespace.as_deref(), &format)?;
        }
        Commands::Keys {
            table,
            namespace,
            format,
        } => {
            let path = cli.path.ok_or("Database path required for keys")?;
            commands::keys::run(&path, padlock, namespace.as_deref(), &table, &format)?;
        }
        Commands::Namespaces {
            namespace,
            all,
            format,
        } => {
            let path = cli.path.ok_or("Database path required for namespaces")?;
            commands::namespaces::run(&path, padlock, namespace.as_deref(), all, &format)?;
        }
        Commands::CryptReset { yes } => {
            let path = cli.path.ok_or("Database path required for crypt-reset")?;
            commands::crypt_reset::run(&path, yes)?;
        }
        Commands::Version => {
            println!("kvnest CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
