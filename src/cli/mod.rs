//! Command-line interface for Folio.

mod commands;

use clap::{Parser, Subcommand};

/// Folio - portfolio and blog backend
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server and the digest scheduler (default)
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Grant or revoke the admin flag
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Send the contact digest for the last window right now
    Digest,
}

#[derive(Subcommand)]
pub enum AdminCommands {
    /// Give an account admin access
    Grant {
        /// Account email
        email: String,
    },
    /// Remove admin access from an account
    Revoke {
        /// Account email
        email: String,
    },
}

pub use commands::*;
