mod commands;
mod input;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pricehunter_lib::AppConfig;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "pricehunter")]
#[command(about = "Clean scraped marketplace listings into CHF-priced records")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// TOML config file (defaults to $PRICEHUNTER_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean a scraped listings CSV
    Clean(commands::clean::CleanArgs),
    /// Show the exchange rates a run would use
    Rates(commands::rates::RatesArgs),
    /// Parse a single price / shipping pair
    Parse(commands::parse::ParseArgs),
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let path = path.or_else(|| std::env::var_os("PRICEHUNTER_CONFIG").map(PathBuf::from));
    let mut config = match path {
        Some(path) => AppConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Ok(url) = std::env::var("PRICEHUNTER_FX_URL") {
        config.rates.api_url = url;
        config.rates.validate()?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pricehunter=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output)?;
    let config = load_config(cli.config)?;

    match &cli.command {
        Commands::Clean(args) => commands::clean::run(args, &config, &format).await?,
        Commands::Rates(args) => commands::rates::run(args, &config, &format).await?,
        Commands::Parse(args) => commands::parse::run(args, &config, &format).await?,
    }

    Ok(())
}
