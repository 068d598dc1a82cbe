use anyhow::Result;
use clap::Parser;
use std::time::Duration;

mod catalog;
mod cli;
mod commands;
mod config;
mod enhance;
mod gate;
mod premium;
mod reader;

use cli::{Args, Commands, ConfigCommands};
use config::AppConfig;
use enhance::Enhancer;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::load_or_default(args.config.as_deref())?;
    commands::utils::init_logging(args.verbose, &config.logging.level);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(dispatch(args, config));

    // A pending stdin read must not hold the process open
    runtime.shutdown_timeout(Duration::from_millis(100));

    result
}

async fn dispatch(args: Args, config: AppConfig) -> Result<()> {
    let load_catalog =
        || commands::load_catalog(args.catalog.as_deref(), config.catalog.path.as_deref());

    match args.command {
        Commands::Catalog { category } => commands::library::list(&load_catalog()?, category),
        Commands::Search { query, smart } => {
            let enhancer = Enhancer::from_settings(&config.enhancer);
            commands::library::search(&load_catalog()?, &enhancer, &query, smart).await
        }
        Commands::Show { id } => {
            let enhancer = Enhancer::from_settings(&config.enhancer);
            commands::library::show(&load_catalog()?, &enhancer, &id).await
        }
        Commands::Read {
            id,
            name,
            premium,
            used,
        } => commands::read::run(&load_catalog()?, &config, &id, &name, premium, used).await,
        Commands::Premium => {
            commands::premium::show_plans(config.gate.daily_free_limit_seconds);
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Init { output, force } => commands::config::init(output, force),
            ConfigCommands::Show => commands::config::show(&config),
        },
    }
}
