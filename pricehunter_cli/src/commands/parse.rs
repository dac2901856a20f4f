use anyhow::Result;
use clap::Args;
use pricehunter_lib::{convert_total, AppConfig, Currency, FieldExtractor, RateService, RateTable};

use crate::output::{print_parse_result, OutputFormat, ParseResult};

#[derive(Args)]
pub struct ParseArgs {
    /// Raw price text, e.g. "CHF 1'234.50" or "3.040,06 EUR"
    pub price: String,

    /// Raw shipping text, e.g. "+ 12,00 EUR Versand"
    #[arg(long)]
    pub shipping: Option<String>,

    /// Use the built-in default rates without touching cache or network
    #[arg(long)]
    pub offline: bool,
}

pub async fn run(args: &ParseArgs, config: &AppConfig, format: &OutputFormat) -> Result<()> {
    let extractor = FieldExtractor::new(&config.pipeline.free_shipping_markers);
    let fields = extractor.extract(Some(args.price.as_str()), args.shipping.as_deref());

    let rates = match (fields.currency, args.offline) {
        (_, true) | (None, _) | (Some(Currency::Chf), _) => RateTable::defaults(),
        (Some(currency), false) => {
            RateService::from_settings(&config.rates)
                .get_rates(&[currency])
                .await
        }
    };

    let result = ParseResult {
        currency: fields.currency,
        price: fields.price,
        shipping: fields.shipping,
        total_price: convert_total(
            fields.price_value(),
            fields.shipping_value(),
            fields.currency,
            &rates,
        ),
    };
    print_parse_result(&result, format)
}
