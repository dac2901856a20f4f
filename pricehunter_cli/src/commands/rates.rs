use anyhow::Result;
use chrono::Utc;
use clap::Args;
use pricehunter_lib::{AppConfig, Currency, RateService};

use crate::output::{print_rates, OutputFormat};

#[derive(Args)]
pub struct RatesArgs {
    /// Fetch fresh rates even if the cache is still valid
    #[arg(long, conflicts_with = "cached")]
    pub refresh: bool,

    /// Show the cache file as it is, without fetching
    #[arg(long)]
    pub cached: bool,
}

pub async fn run(args: &RatesArgs, config: &AppConfig, format: &OutputFormat) -> Result<()> {
    let service = RateService::from_settings(&config.rates);

    if args.cached {
        match service.cached()? {
            Some(cached) => {
                let age = Utc::now().signed_duration_since(cached.timestamp);
                eprintln!(
                    "Rate cache {} written {} ({}h ago)",
                    service.cache().path().display(),
                    cached.timestamp.to_rfc3339(),
                    age.num_hours()
                );
                print_rates(&cached.to_table(), format)?;
            }
            None => eprintln!("No rate cache at {}", service.cache().path().display()),
        }
        return Ok(());
    }

    if args.refresh {
        let rates = service.refresh().await?;
        eprintln!("Fetched live exchange rates");
        return print_rates(&rates, format);
    }

    let snapshot = service.snapshot(&Currency::ALL).await;
    eprintln!("Using {} exchange rates", snapshot.source);
    print_rates(&snapshot.rates, format)
}
