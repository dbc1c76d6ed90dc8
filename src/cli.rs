//! CLI definitions and entry point

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands;
use crate::output::OutputMode;

/// prescan - License compliance scanning for pull requests
#[derive(Parser, Debug)]
#[command(
    name = "prescan",
    version,
    about = "License compliance scanning for pull requests",
    long_about = "Receives pull-request webhooks, scans the changed files for\n\
                  license matches, and flags conflicts against the repository's\n\
                  declared license."
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output in JSON format (machine-readable)
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Top-level subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the webhook server and scan workers
    Serve {
        /// Path to the config file (default: ./prescan.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Scan a local directory once and print the verdicts
    Scan {
        /// Directory to scan
        path: PathBuf,

        /// Declared license of the project (SPDX id)
        #[arg(short = 'l', long)]
        repo_license: Option<String>,

        /// Policy file to classify against (default: built-in policy)
        #[arg(short, long)]
        policy: Option<PathBuf>,
    },

    /// Inspect the license policy
    Policy {
        /// What to do with the policy
        #[command(subcommand)]
        action: PolicyAction,
    },

    /// Show version
    Version,
}

/// Policy subcommands
#[derive(Subcommand, Debug)]
pub enum PolicyAction {
    /// List every license in the policy
    List {
        /// Policy file (default: built-in policy)
        #[arg(short, long)]
        policy: Option<PathBuf>,
    },

    /// Show one license by SPDX id
    Show {
        /// SPDX id
        id: String,

        /// Policy file (default: built-in policy)
        #[arg(short, long)]
        policy: Option<PathBuf>,
    },
}

/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    match cli.command {
        Some(Command::Serve { config }) => commands::serve(config.as_deref()),
        Some(Command::Scan { path, repo_license, policy }) => {
            commands::scan(&path, repo_license.as_deref(), policy.as_deref(), output_mode)
        },
        Some(Command::Policy { action }) => commands::policy_cmd(&action, output_mode),
        Some(Command::Version) => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION")
                    })
                );
            } else {
                println!("prescan v{}", env!("CARGO_PKG_VERSION"));
            }
            Ok(())
        },
        None => {
            if output_mode == OutputMode::Json {
                println!(
                    "{}",
                    serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "hint": "Use --help for usage"
                    })
                );
            } else {
                println!("prescan v{}", env!("CARGO_PKG_VERSION"));
                println!("\nRun 'prescan --help' for usage");
                println!("Run 'prescan serve' to start the webhook server");
            }
            Ok(())
        },
    }
}
