//! # calcd CLI Module
//!
//! This module implements the CLI interface for calcd.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server (the default when no command is given)
//! - `eval` - Evaluate an expression locally
//! - `check` - Run only the character-set check on an expression
//! - `config` - Show the effective configuration

mod commands;

use crate::config::Config;
use calcd_core::CalcError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

/// Default bind host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// calcd - arithmetic expression server
///
/// Evaluates arithmetic expressions submitted over HTTP and keeps the
/// results in memory for later retrieval.
#[derive(Parser, Debug)]
#[command(name = "calcd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (overrides LOG_LEVEL)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether this invocation runs the HTTP server.
    pub fn is_server(&self) -> bool {
        matches!(self.command, None | Some(Commands::Server { .. }))
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = DEFAULT_HOST)]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Evaluate an expression and print the result
    Eval {
        /// The expression, e.g. "(2 + 3) * 4"
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },

    /// Check that an expression only uses accepted characters
    Check {
        /// The expression to check
        #[arg(allow_hyphen_values = true)]
        expression: String,
    },

    /// Show the effective configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments and loaded configuration.
pub async fn execute(cli: Cli, config: Config) -> Result<(), CalcError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => cmd_server(&config, &host, port).await,
        Some(Commands::Eval { expression }) => cmd_eval(&expression, json_mode),
        Some(Commands::Check { expression }) => cmd_check(&expression, json_mode),
        Some(Commands::Config) => cmd_config(&config, json_mode),
        None => cmd_server(&config, DEFAULT_HOST, DEFAULT_PORT).await,
    }
}

// =============================================================================
// TESTS
// =============================================================================
