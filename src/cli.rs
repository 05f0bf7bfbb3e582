//! Command-line interface for globetrotter.

use clap::{Parser, Subcommand};

/// Globetrotter - guess the destination from its clues
#[derive(Parser, Debug)]
#[command(name = "globetrotter")]
#[command(about = "Destination trivia in your terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play,

    /// Sign in and store credentials
    Login {
        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Create an account and store credentials
    Signup {
        /// Display name
        #[arg(long)]
        name: String,

        /// Account email
        #[arg(long)]
        email: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// Forget stored credentials
    Logout,

    /// Print the top players
    Leaderboard,

    /// Print your answer statistics
    Profile,
}
