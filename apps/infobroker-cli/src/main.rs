mod config;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use infobroker::{InfoBroker, InfoRouter, MainBroker, QueryArgs, QueryKey};
use serde_json::Value;
use uds::UdsService;

use crate::config::AppConfig;

/// InfoBroker - answers orchestrator metadata queries from the configured store
#[derive(Parser)]
#[command(name = "infobroker")]
#[command(about = "InfoBroker - answers orchestrator metadata queries from the configured store")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one query key and print the result as JSON
    Query {
        /// Dotted query key, e.g. `infrastructure.name`
        key: String,

        /// String argument as NAME=VALUE
        #[arg(long = "arg", value_name = "NAME=VALUE")]
        args: Vec<String>,

        /// Typed argument as NAME=JSON, e.g. `--arg-json limit=10`
        #[arg(long = "arg-json", value_name = "NAME=JSON")]
        json_args: Vec<String>,
    },
    /// Validate configuration and exit
    Check,
    /// List the query keys the assembled broker answers
    Keys,
}

/// The assembled broker graph.
struct Assembly {
    main: MainBroker,
    keys: Vec<String>,
}

fn assemble(config: &AppConfig) -> Result<Assembly> {
    let main = MainBroker::new();
    let service = Arc::new(
        UdsService::from_config(&config.uds, main.clone()).context("failed to build uds")?,
    );
    let registry = uds::provider::registry(&service).context("failed to register uds keys")?;
    let keys = registry.keys().iter().map(ToString::to_string).collect();

    let router = InfoRouter::new("main").with(Arc::new(registry));
    main.install(Arc::new(router))?;
    tracing::info!(protocol = service.store().protocol(), "info broker assembled");
    Ok(Assembly { main, keys })
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
    pair.split_once('=')
        .with_context(|| format!("argument '{pair}' is not of the form NAME=VALUE"))
}

/// Plain arguments stay strings, so numeric-looking ids are passed as typed.
fn parse_args(plain: &[String], json: &[String]) -> Result<QueryArgs> {
    let mut args = QueryArgs::new();
    for pair in plain {
        let (name, value) = split_pair(pair)?;
        args.insert(name, value);
    }
    for pair in json {
        let (name, value) = split_pair(pair)?;
        let value: Value = serde_json::from_str(value)
            .with_context(|| format!("argument '{name}' is not valid JSON"))?;
        args.insert(name, value);
    }
    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Query {
            key,
            args,
            json_args,
        } => query(&config, &key, &args, &json_args).await,
        Commands::Check => check(&config),
        Commands::Keys => keys(&config),
    }
}

async fn query(
    config: &AppConfig,
    key: &str,
    plain_args: &[String],
    json_args: &[String],
) -> Result<()> {
    let key = QueryKey::parse(key)?;
    let args = parse_args(plain_args, json_args)?;
    let assembly = assemble(config)?;
    let answer = assembly.main.answer(key.as_str(), args).await?;
    println!("{}", serde_json::to_string_pretty(&answer)?);
    Ok(())
}

fn check(config: &AppConfig) -> Result<()> {
    assemble(config)?;
    println!("Configuration is valid");
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

fn keys(config: &AppConfig) -> Result<()> {
    for key in assemble(config)?.keys {
        println!("{key}");
    }
    Ok(())
}
