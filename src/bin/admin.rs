//! CLI administration tool for snaplink.
//!
//! Provides commands for managing API tokens and basic database diagnostics
//! without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Create a new API token for an owner
//! cargo run --bin admin -- token create --owner alice
//!
//! # List all tokens
//! cargo run --bin admin -- token list
//!
//! # Revoke a token by label
//! cargo run --bin admin -- token revoke "Production API"
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `token create`): must match the
//!   server's secret, otherwise minted tokens will not authenticate
//!
//! # Security
//!
//! Only the HMAC-SHA256 hash of a token is stored; the raw token is
//! displayed once at creation and cannot be recovered later.

use snaplink::application::services::hash_token;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage API tokens
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Token management subcommands.
#[derive(Subcommand)]
enum TokenAction {
    /// Create a new API token
    Create {
        /// Owner identifier the token authenticates as
        #[arg(short, long)]
        owner: Option<String>,

        /// Token label (e.g., "Production API", "Mobile App")
        #[arg(short, long)]
        label: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all tokens
    List,

    /// Revoke a token
    Revoke {
        /// Token label (exact match) or full token hash
        label_or_hash: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

/// Token row as stored, for listing and revocation lookups.
#[derive(sqlx::FromRow)]
struct TokenRow {
    token_hash: String,
    owner_id: String,
    label: String,
    created_at: DateTime<Utc>,
    last_used_at: Option<DateTime<Utc>>,
    revoked_at: Option<DateTime<Utc>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Token { action } => handle_token_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches token management commands.
async fn handle_token_action(action: TokenAction, pool: &PgPool) -> Result<()> {
    match action {
        TokenAction::Create { owner, label, yes } => {
            create_token(pool, owner, label, yes).await?;
        }
        TokenAction::List => {
            list_tokens(pool).await?;
        }
        TokenAction::Revoke { label_or_hash } => {
            revoke_token(pool, label_or_hash).await?;
        }
    }

    Ok(())
}

/// Creates a new API token with interactive prompts.
///
/// # Flow
///
/// 1. Prompt for owner and label (or use provided)
/// 2. Generate a random token
/// 3. Display token details with warning
/// 4. Confirm creation (unless `--yes` flag)
/// 5. Hash token with HMAC-SHA256 under `TOKEN_SIGNING_SECRET`
/// 6. Store the hash in the database
/// 7. Display usage instructions
async fn create_token(
    pool: &PgPool,
    owner: Option<String>,
    label: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    let signing_secret = std::env::var("TOKEN_SIGNING_SECRET")
        .context("TOKEN_SIGNING_SECRET must be set to mint tokens")?;

    println!("{}", "🔑 Create API Token".bright_blue().bold());
    println!();

    let owner_id = match owner {
        Some(o) => o,
        None => Input::new().with_prompt("Owner identifier").interact_text()?,
    };

    let token_label = match label {
        Some(l) => l,
        None => Input::new()
            .with_prompt("Token label")
            .with_initial_text("Production API")
            .interact_text()?,
    };

    let token_value = generate_token()?;
    println!("{}", "✨ Generated new token".green());

    println!();
    println!("{}", "Token details:".bright_white().bold());
    println!("  Owner: {}", owner_id.cyan());
    println!("  Label: {}", token_label.cyan());
    println!("  Token: {}", token_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this token?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let token_hash = hash_token(&signing_secret, &token_value);

    sqlx::query(
        r#"
        INSERT INTO api_tokens (token_hash, owner_id, label)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&token_hash)
    .bind(&owner_id)
    .bind(&token_label)
    .execute(pool)
    .await
    .context("Failed to create token")?;

    println!();
    println!("{}", "✅ Token created successfully!".green().bold());
    println!();
    println!("{}", "Add this to your requests:".bright_white());
    println!(
        "  {}: Bearer {}",
        "Authorization".bright_cyan(),
        token_value.bright_yellow()
    );
    println!();
    println!("{}", "Example:".bright_white());
    println!(
        "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
        token_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists all API tokens with status indicators.
async fn list_tokens(pool: &PgPool) -> Result<()> {
    println!("{}", "📋 API Tokens".bright_blue().bold());
    println!();

    let tokens = sqlx::query_as::<_, TokenRow>(
        r#"
        SELECT token_hash, owner_id, label, created_at, last_used_at, revoked_at
        FROM api_tokens
        ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list tokens")?;

    if tokens.is_empty() {
        println!("{}", "  No tokens found".yellow());
        println!();
        println!(
            "  Create one with: {} admin token create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<14} {:<16} {:<26} {:<18} {:<10}",
        "Hash".bright_white().bold(),
        "Owner".bright_white().bold(),
        "Label".bright_white().bold(),
        "Created".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(86).bright_black());

    for token in &tokens {
        let status = if token.revoked_at.is_some() {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<14} {:<16} {:<26} {:<18} {}",
            short_hash(&token.token_hash).bright_black(),
            token.owner_id.cyan(),
            token.label.cyan(),
            token
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            status
        );
    }

    println!();
    println!(
        "  Total: {}",
        tokens.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Revokes a token by label or full hash with confirmation prompt.
///
/// # Lookup
///
/// - 64 hex characters: lookup by token hash
/// - Otherwise, lookup by label (exact match)
///
/// # Safety
///
/// - Requires confirmation (default: No)
/// - Prevents double-revocation
async fn revoke_token(pool: &PgPool, label_or_hash: String) -> Result<()> {
    println!("{}", "🔒 Revoke API Token".bright_blue().bold());
    println!();

    let by_hash = label_or_hash.len() == 64
        && label_or_hash.chars().all(|c| c.is_ascii_hexdigit());

    let column = if by_hash { "token_hash" } else { "label" };
    let query = format!(
        "SELECT token_hash, owner_id, label, created_at, last_used_at, revoked_at \
         FROM api_tokens WHERE {} = $1",
        column
    );

    let token = sqlx::query_as::<_, TokenRow>(&query)
        .bind(&label_or_hash)
        .fetch_optional(pool)
        .await
        .context("Database error")?;

    let token = token.context("Token not found")?;

    if token.revoked_at.is_some() {
        println!("{}", "⚠️  This token is already revoked".yellow());
        return Ok(());
    }

    println!("  Label: {}", token.label.cyan());
    println!("  Owner: {}", token.owner_id.cyan());
    println!("  Hash:  {}", short_hash(&token.token_hash).bright_black());
    if let Some(last_used) = token.last_used_at {
        println!(
            "  Last used: {}",
            last_used.format("%Y-%m-%d %H:%M").to_string().bright_black()
        );
    }
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Revoke this token?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    sqlx::query("UPDATE api_tokens SET revoked_at = now() WHERE token_hash = $1")
        .bind(&token.token_hash)
        .execute(pool)
        .await
        .context("Failed to revoke token")?;

    println!();
    println!("{}", "✅ Token revoked successfully!".green().bold());
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of short links
/// - Total number of recorded visits
/// - Number of active API tokens
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM short_links")
        .fetch_one(pool)
        .await?;

    let visits_count: Option<i64> = sqlx::query_scalar("SELECT SUM(visits) FROM short_links")
        .fetch_one(pool)
        .await?;

    let tokens_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM api_tokens WHERE revoked_at IS NULL")
            .fetch_one(pool)
            .await?;

    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Visits:        {}",
        visits_count.unwrap_or(0).to_string().bright_green().bold()
    );
    println!(
        "  Active tokens: {}",
        tokens_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Generates a cryptographically random token.
///
/// 32 random bytes, URL-safe base64 without padding (43 characters).
fn generate_token() -> Result<String> {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes).map_err(|e| anyhow::anyhow!("RNG failure: {}", e))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Truncates a token hash for display.
fn short_hash(hash: &str) -> String {
    format!("{}…", &hash[..hash.len().min(12)])
}
