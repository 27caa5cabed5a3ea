//! Operator CLI that issues a session token for a user, creating the user on
//! first use. Only the token's SHA-256 digest is stored; the token itself is
//! printed once.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use job_tracker::{
    auth::{generate_token, hash_token},
    config::ConfigLoader,
    db,
    repositories::{SessionRepository, UserRepository},
};

#[derive(Parser)]
#[command(name = "issue_session")]
#[command(about = "Create a session token for a job tracker user")]
struct Cli {
    /// Email of the user to sign in as
    email: String,

    /// Display name used when the user does not exist yet
    #[arg(short, long)]
    name: Option<String>,

    /// Session lifetime in hours (defaults to JOB_TRACKER_SESSION_TTL_HOURS)
    #[arg(long)]
    ttl_hours: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ConfigLoader::new().load().context("loading configuration")?;

    let connection = db::init_pool(&config)
        .await
        .context("initializing database connection pool")?;
    if config.run_migrations {
        db::run_migrations(&connection).await?;
    }
    let connection = Arc::new(connection);

    let users = UserRepository::new(Arc::clone(&connection));
    let user = match users
        .find_by_email(&cli.email)
        .await
        .context("looking up user")?
    {
        Some(user) => user,
        None => users
            .create(&cli.email, cli.name)
            .await
            .context("creating user")?,
    };

    let ttl_hours = cli.ttl_hours.unwrap_or(config.session_ttl_hours);
    let ttl = i64::try_from(ttl_hours)
        .ok()
        .and_then(Duration::try_hours)
        .context("session lifetime is out of range")?;
    let expires_at = (Utc::now() + ttl).fixed_offset();

    let token = generate_token();
    SessionRepository::new(connection)
        .create(user.id, hash_token(&token), expires_at)
        .await
        .context("storing session")?;

    eprintln!(
        "Issued session for {} ({}) valid until {}",
        user.email,
        user.id,
        expires_at.to_rfc3339()
    );
    println!("{token}");

    Ok(())
}
