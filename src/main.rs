//! agentdesk - Main CLI Entry Point

use agentdesk::{
    bootstrap,
    cli::{Args, Commands, Config, StoreBackend},
    memory::KnowledgeStore,
    planning::{KeywordPlanner, Planner},
    repl::{commands, ReplSession},
    telemetry::{self, TelemetryCollector},
};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if let Err(msg) = args.validate() {
        eprintln!("{} {}", "Error:".red().bold(), msg);
        std::process::exit(2);
    }

    let config = Config::load(args.config.clone()).context("failed to load configuration")?;
    telemetry::init_logging(&telemetry::level_for(args.verbosity(), &config.logging.level))?;
    tracing::debug!(verbosity = args.verbosity().as_str(), "configuration loaded");

    let result = run(&args, &config).await;
    tracing::info!("Shutting down.");
    result
}

async fn run(args: &Args, config: &Config) -> Result<()> {
    match &args.command {
        Some(Commands::Config) => {
            println!("{}", config.to_toml()?);
            Ok(())
        }
        Some(Commands::Plan { query }) => {
            let plan = KeywordPlanner::new().create_plan(query);
            println!("{}", serde_json::to_string_pretty(&plan)?);
            Ok(())
        }
        Some(Commands::History { last }) => {
            let store = open_store(config).await?;
            let turns = store.conversation_history().await?;
            println!(
                "{}",
                commands::render_history(&turns, last.unwrap_or(turns.len()))
            );
            Ok(())
        }
        Some(Commands::Start) | None => match &args.query {
            Some(query) => run_once(args, config, query).await,
            None => run_repl(args, config).await,
        },
    }
}

async fn open_store(config: &Config) -> Result<Arc<dyn KnowledgeStore>> {
    let embedder = bootstrap::build_embedder(config)?;
    Ok(bootstrap::build_store(config, embedder).await?)
}

/// Answer a single query and exit
async fn run_once(args: &Args, config: &Config, query: &str) -> Result<()> {
    let store = open_store(config).await?;
    let mut coordinator =
        bootstrap::build_coordinator(config, store, args.persist_override(), TelemetryCollector::new())?;

    let answer = coordinator.handle_query(query).await;
    println!("{}", answer);
    Ok(())
}

async fn run_repl(args: &Args, config: &Config) -> Result<()> {
    let store = open_store(config).await?;
    let telemetry = TelemetryCollector::new();
    let mut coordinator = bootstrap::build_coordinator(config, store, args.persist_override(), telemetry.clone())?;

    let backend = match config.memory.backend {
        StoreBackend::Memory => "local",
        StoreBackend::Qdrant => "qdrant",
    };

    let mut session = ReplSession::new(telemetry, args.verbosity())?;
    session.show_welcome(env!("CARGO_PKG_VERSION"), backend);
    session.run(&mut coordinator).await
}
