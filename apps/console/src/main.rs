//! Opsdesk console: drives the user detail view from the command line.

#![forbid(unsafe_code)]

mod console_config;
mod render;

use std::sync::Arc;

use clap::Parser;
use opsdesk_application::{SubmitOutcome, UserDetailSnapshot, UserDetailView};
use opsdesk_core::{AppError, AppResult};
use opsdesk_domain::FormField;
use opsdesk_infrastructure::{
    FileAccessTokenStore, HttpUserApiClient, InMemoryUserQueryCache, TracingNotifier,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::console_config::ConsoleConfig;

/// View a user record and optionally update it.
#[derive(Debug, Parser)]
#[command(name = "opsdesk-console", version)]
struct Cli {
    /// User identifier as it appears in the console route, e.g. `7`.
    user_id: String,

    /// New display name.
    #[arg(long)]
    name: Option<String>,

    /// New email address.
    #[arg(long)]
    email: Option<String>,

    /// New role name.
    #[arg(long)]
    role: Option<String>,

    /// Print form snapshots as JSON.
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn edits(&self) -> Vec<(FormField, String)> {
        [
            (FormField::Name, &self.name),
            (FormField::Email, &self.email),
            (FormField::Role, &self.role),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.clone().map(|value| (field, value)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = ConsoleConfig::load()?;
    let view = build_view(&config)?;

    info!(
        api_base_url = %config.api_base_url,
        token_store = %config.token_store_path.display(),
        user_id = %cli.user_id,
        "opsdesk-console started"
    );

    view.activate(cli.user_id.as_str()).await?;
    print_snapshot(&view.snapshot()?, cli.json)?;

    let edits = cli.edits();
    if edits.is_empty() {
        return Ok(());
    }

    for (field, value) in edits {
        view.edit(field, value)?;
    }

    let outcome = view.submit().await?;
    print_snapshot(&view.snapshot()?, cli.json)?;

    match outcome {
        SubmitOutcome::Updated { refreshed } => {
            info!(refreshed, "user update acknowledged");
            Ok(())
        }
        SubmitOutcome::Unacknowledged { status } => {
            warn!(status, "user update was accepted without confirmation");
            Ok(())
        }
        SubmitOutcome::Failed => Err(AppError::Internal("user update failed".to_owned())),
    }
}

fn build_view(config: &ConsoleConfig) -> AppResult<UserDetailView> {
    let http_client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

    let api_client = Arc::new(HttpUserApiClient::new(
        http_client,
        config.api_base_url.clone(),
    ));
    let query_service = Arc::new(InMemoryUserQueryCache::new(
        api_client.clone(),
        config.query_stale_after,
    ));
    let token_store = Arc::new(FileAccessTokenStore::new(config.token_store_path.clone()));

    Ok(UserDetailView::new(
        query_service,
        api_client,
        token_store,
        Arc::new(TracingNotifier::new()),
    ))
}

fn print_snapshot(snapshot: &UserDetailSnapshot, json: bool) -> AppResult<()> {
    let rendered = if json {
        render::render_json(snapshot)?
    } else {
        render::render_text(snapshot)
    };
    println!("{rendered}");

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
