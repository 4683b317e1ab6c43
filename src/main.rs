use clap::{Parser, Subcommand};

mod app;
mod auth;
mod config;
mod courses;
mod db;
mod error;
mod extract;
mod state;
#[cfg(test)]
mod test_utils;
mod users;

use crate::{auth::services::normalize_email, state::AppState};

#[derive(Debug, Parser)]
#[command(name = "course-catalog", about = "Course catalog REST backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Grant the admin role to an existing account.
    Promote { email: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "course_catalog=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();
    let state = AppState::init().await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => app::serve(app::build_app(state)).await,
        Command::Promote { email } => promote(&state, &email).await,
    }
}

async fn promote(state: &AppState, email: &str) -> anyhow::Result<()> {
    let email = normalize_email(email);
    let Some(user) = state.users.find_by_email(&email).await? else {
        anyhow::bail!("no account registered for {email}");
    };
    state.users.set_admin(user.id, true).await?;
    tracing::info!(user_id = user.id, %email, "account promoted to admin");
    Ok(())
}
