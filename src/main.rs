//! Globetrotter - Unified CLI
//!
//! Terminal trivia client with one-shot account and stats commands.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use globetrotter::{
    AuthClient, ClientConfig, SignUpForm, StatsClient, is_valid_email, run_tui,
};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE: &str = "globetrotter.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Play);

    if matches!(command, Command::Play) {
        initialize_file_tracing()?;
    } else {
        initialize_stderr_tracing();
    }

    let config = ClientConfig::load(cli.config.as_deref())?;

    match command {
        Command::Play => run_tui(config).await,
        Command::Login { email, password } => run_login(&config, &email, &password).await,
        Command::Signup {
            name,
            email,
            password,
        } => run_signup(&config, name, email, password).await,
        Command::Logout => run_logout(&config),
        Command::Leaderboard => run_leaderboard(&config).await,
        Command::Profile => run_profile(&config).await,
    }
}

/// Sign in and persist the credentials
#[instrument(skip(config, password))]
async fn run_login(config: &ClientConfig, email: &str, password: &str) -> Result<()> {
    if !is_valid_email(email) {
        bail!("Invalid email format: {}", email);
    }
    let api = config.api_client()?;
    let auth = AuthClient::new(api)
        .sign_in(email, password)
        .await
        .context("Sign-in failed")?;
    config.credential_store().save(&auth)?;
    println!("Signed in as {}", auth.username());
    Ok(())
}

/// Create an account and persist the credentials
#[instrument(skip(config, password))]
async fn run_signup(
    config: &ClientConfig,
    name: String,
    email: String,
    password: String,
) -> Result<()> {
    let form = SignUpForm {
        name,
        email,
        password,
    };
    if let Some(problem) = form.first_error() {
        bail!("{}", problem);
    }
    let api = config.api_client()?;
    let auth = AuthClient::new(api)
        .sign_up(form.name.trim(), &form.email, &form.password)
        .await
        .context("Sign-up failed")?;
    config.credential_store().save(&auth)?;
    println!("Welcome aboard, {}!", auth.username());
    Ok(())
}

/// Forget stored credentials
#[instrument(skip(config))]
fn run_logout(config: &ClientConfig) -> Result<()> {
    config.credential_store().clear()?;
    println!("Signed out");
    Ok(())
}

/// Print the leaderboard
#[instrument(skip(config))]
async fn run_leaderboard(config: &ClientConfig) -> Result<()> {
    let api = config.api_client()?;
    let entries = StatsClient::new(api)
        .leaderboard()
        .await
        .context("Failed to fetch leaderboard")?;

    if entries.is_empty() {
        println!("No scores yet. Be the first!");
        return Ok(());
    }
    println!("🏆 Top Globetrotters");
    for entry in &entries {
        let medal = entry
            .medal()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "  ".to_string());
        println!(
            "{} {:>2}. {:<24} {:>6}",
            medal,
            entry.rank(),
            entry.username(),
            entry.score()
        );
    }
    Ok(())
}

/// Print the signed-in player's statistics
#[instrument(skip(config))]
async fn run_profile(config: &ClientConfig) -> Result<()> {
    let Some(auth) = config.credential_store().load()? else {
        bail!("Not signed in. Run `globetrotter login` first.");
    };
    let api = config.api_client()?;
    let stats = StatsClient::new(api)
        .profile(&auth)
        .await
        .context("Failed to fetch profile")?;

    println!(
        "Profile: {}",
        stats.username.as_deref().unwrap_or(auth.username())
    );
    println!("  Questions attempted: {}", stats.questions_attempted);
    println!("  Correct answers:     {}", stats.correct_answers);
    println!("  Wrong answers:       {}", stats.wrong_answers);
    println!("  Accuracy:            {:.1}%", stats.accuracy());
    Ok(())
}

/// Logs to a file so output does not corrupt the terminal UI
fn initialize_file_tracing() -> Result<()> {
    let log_file = std::fs::File::create(LOG_FILE)
        .with_context(|| format!("Failed to create log file {}", LOG_FILE))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init();
    info!("File tracing initialized");
    Ok(())
}

fn initialize_stderr_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
