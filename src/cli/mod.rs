//! CLI module for the access key issuer
//!
//! Provides subcommands for running the service in different modes:
//! - `serve`: HTTP server with the background eviction sweeper (default)
//! - `sweep`: evict expired keys once and exit

pub mod serve;
pub mod sweep;

use clap::{Parser, Subcommand};

/// Access Key Issuer - rate-limited issuance of short-lived access keys
#[derive(Parser)]
#[command(name = "access-key-issuer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default mode)
    Serve,

    /// Evict expired keys once and exit
    Sweep,
}
