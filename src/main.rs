mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod services;
#[cfg(test)]
mod testing;
mod triage;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cmd::config::{self as config_cmd, ConfigArgs};
use crate::cmd::ticket::{self, CreateArgs, ListArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::jira::{JiraClient, JiraSettings};
use crate::infra::llm::GeminiClient;
use crate::services::LanguageModelService;
use crate::triage::{TriageEngine, TriageRules};

#[derive(Parser)]
#[command(
    name = "deskflow",
    author,
    version,
    about = "Helpdesk ticket intake and triage"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Raise a new service-desk request with inferred category, tags and assignee.
    Create(CreateArgs),
    /// List open requests grouped by topic.
    List(ListArgs),
    /// Show a ticket and the hashtags in its description.
    Show { key: String },
    /// Delete a ticket.
    Delete { key: String },
    /// Move a ticket to another status.
    Transition { key: String, status: String },
    /// Manage CLI configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config(args) => config_cmd::run(args.command),
        command => {
            let context = build_context(AppConfig::load()?)?;
            dispatch(&context, command).await
        }
    }
}

async fn dispatch(context: &AppContext, command: Commands) -> AppResult<()> {
    match command {
        Commands::Create(args) => ticket::create(context, args).await,
        Commands::List(args) => ticket::list(context, args).await,
        Commands::Show { key } => ticket::show(context, &key).await,
        Commands::Delete { key } => ticket::delete(context, &key).await,
        Commands::Transition { key, status } => ticket::transition(context, &key, &status).await,
        Commands::Config(args) => config_cmd::run(args.command),
    }
}

fn build_context(config: AppConfig) -> AppResult<AppContext> {
    if config.jira_domain.is_none() {
        warn!("Jira domain not configured; ticket operations will fail.");
    }
    if config.jira_email.is_none() || config.jira_token.is_none() {
        warn!("Jira credentials not configured; ticket operations will fail.");
    }
    if config.service_desk_id.is_none() {
        warn!("service desk id not configured; creation and listing will fail.");
    }
    if config.gemini_api_key.is_none() {
        warn!("Gemini API key not configured; classification falls back to keyword rules.");
    }

    let language_model: Arc<dyn LanguageModelService> = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    )?);

    let issue_tracker = Arc::new(JiraClient::new(
        JiraSettings {
            domain: config.jira_domain.clone(),
            email: config.jira_email.clone(),
            token: config.jira_token.clone(),
            service_desk_id: config.service_desk_id.clone(),
            request_type_id: config.request_type_id.clone(),
        },
        config.listing_timeout,
    )?);

    let triage = TriageEngine::new(language_model, TriageRules::default());
    Ok(AppContext::new(config, issue_tracker, triage))
}
