use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use pricehunter_lib::{
    AppConfig, Currency, DedupStrategy, MissingPricePolicy, OutputLayout, Pipeline,
    PipelineConfig, RateService, RateTable, RequiredColumns, RowPolicy,
};

use crate::input::read_table;
use crate::output::{print_records, write_records_csv, OutputFormat};

#[derive(Args)]
pub struct CleanArgs {
    /// Scraped listings CSV
    pub input: PathBuf,

    /// Write the cleaned CSV to this file instead of stdout
    #[arg(long)]
    pub write: Option<PathBuf>,

    /// Field delimiter of the input file
    #[arg(long, default_value = ",")]
    pub delimiter: char,

    /// Duplicate detection: exact or normalized
    #[arg(long)]
    pub dedup: Option<String>,

    /// Abort when a row has no product name or no parsable price
    #[arg(long)]
    pub strict: bool,

    /// Require every logical column, not only price and a URL column
    #[arg(long)]
    pub require_all: bool,

    /// Print unparsable amounts as "keine Angabe" instead of 0.00
    #[arg(long)]
    pub not_available: bool,

    /// Add price, currency, price with shipping and product name columns
    #[arg(long)]
    pub extended: bool,

    /// Use the built-in default rates without touching cache or network
    #[arg(long)]
    pub offline: bool,
}

/// Applies command-line overrides on top of the config file.
fn pipeline_config(args: &CleanArgs, base: &PipelineConfig) -> Result<PipelineConfig> {
    let mut config = base.clone();
    if let Some(dedup) = &args.dedup {
        config.dedup = match dedup.as_str() {
            "exact" => DedupStrategy::Exact,
            "normalized" => DedupStrategy::Normalized,
            other => bail!("unknown dedup strategy '{}'. Valid values: exact, normalized", other),
        };
    }
    if args.strict {
        config.row_policy = RowPolicy::Strict;
    }
    if args.require_all {
        config.required_columns = RequiredColumns::All;
    }
    if args.not_available {
        config.missing_price = MissingPricePolicy::NotAvailable;
    }
    if args.extended {
        config.layout = OutputLayout::Extended;
    }
    Ok(config)
}

pub async fn run(args: &CleanArgs, config: &AppConfig, format: &OutputFormat) -> Result<()> {
    if !args.delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character");
    }
    let pipeline_config = pipeline_config(args, &config.pipeline)?;
    let layout = pipeline_config.layout;
    let pipeline = Pipeline::new(pipeline_config)?;

    let table = read_table(&args.input, args.delimiter as u8)?;
    // Fail on missing columns before any rate lookup.
    pipeline.validate(&table)?;

    let rates = if args.offline {
        RateTable::defaults()
    } else {
        let snapshot = RateService::from_settings(&config.rates)
            .snapshot(&Currency::ALL)
            .await;
        eprintln!("Using {} exchange rates", snapshot.source);
        snapshot.rates
    };

    let output = pipeline.run(&table, &rates)?;
    let stats = &output.stats;
    eprintln!(
        "{} of {} rows kept ({} duplicates removed, {} unparsable prices, {} without product name)",
        stats.output_rows,
        stats.input_rows,
        stats.duplicates_removed,
        stats.unparsable_prices,
        stats.missing_product_names
    );

    match &args.write {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_records_csv(BufWriter::new(file), &output.records, layout)?;
            eprintln!("Wrote {} rows to {}", output.records.len(), path.display());
        }
        None => print_records(&output.records, layout, format)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> CleanArgs {
        CleanArgs {
            input: PathBuf::from("listings.csv"),
            write: None,
            delimiter: ',',
            dedup: None,
            strict: false,
            require_all: false,
            not_available: false,
            extended: false,
            offline: true,
        }
    }

    #[test]
    fn flags_override_config() {
        let mut a = args();
        a.dedup = Some("exact".to_string());
        a.strict = true;
        a.extended = true;
        let config = pipeline_config(&a, &PipelineConfig::default()).unwrap();
        assert_eq!(config.dedup, DedupStrategy::Exact);
        assert_eq!(config.row_policy, RowPolicy::Strict);
        assert_eq!(config.layout, OutputLayout::Extended);
        assert_eq!(config.missing_price, MissingPricePolicy::Zero);
    }

    #[test]
    fn config_is_kept_without_flags() {
        let base = PipelineConfig {
            required_columns: RequiredColumns::All,
            ..PipelineConfig::default()
        };
        let config = pipeline_config(&args(), &base).unwrap();
        assert_eq!(config, base);
    }

    #[tokio::test]
    async fn writes_cleaned_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("listings.csv");
        std::fs::write(
            &input,
            "Titel,Zustand,Preis,Land,Versandkosten,Link\n\
             Fender Telecaster,Neu,CHF 800.-,aus Schweiz,gratis,https://r.ch/?skw=telecaster\n\
             Fender Telecaster,Gebraucht,CHF 800.-,aus Schweiz,gratis,https://r.ch/?skw=telecaster\n\
             Vox AC30,Gebraucht,\"1.100,00 EUR\",aus Deutschland,\"25,00 EUR\",https://r.ch/?skw=vox\n",
        )
        .unwrap();
        let written = dir.path().join("cleaned.csv");

        let mut a = args();
        a.input = input;
        a.write = Some(written.clone());
        run(&a, &AppConfig::default(), &OutputFormat::Csv).await.unwrap();

        let csv = std::fs::read_to_string(&written).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "title,condition,total_price,origin,shipping_cost,link");
        assert_eq!(
            lines[1],
            "Fender Telecaster,neu,800.00,Schweiz,0.00,https://r.ch/?skw=telecaster"
        );
        assert_eq!(
            lines[2],
            "Vox AC30,gebraucht,1184.21,Deutschland,25.00,https://r.ch/?skw=vox"
        );
    }

    #[tokio::test]
    async fn missing_price_column_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("listings.csv");
        std::fs::write(&input, "Titel,Link\nStrat,https://r.ch/?skw=strat\n").unwrap();

        let mut a = args();
        a.input = input;
        let err = run(&a, &AppConfig::default(), &OutputFormat::Csv)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("price (Preis, Price)"));
    }

    #[test]
    fn unknown_dedup_is_rejected() {
        let mut a = args();
        a.dedup = Some("fuzzy".to_string());
        assert!(pipeline_config(&a, &PipelineConfig::default()).is_err());
    }
}
