use pricehunter_lib::{
    MissingPricePolicy, Pipeline, PipelineConfig, RateTable, RawTable,
};
use serde_json::Value;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("CLI crate should be inside workspace")
        .to_path_buf()
}

fn load_listings() -> RawTable {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join("ricardo_listings.csv");
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&path)
        .unwrap_or_else(|e| panic!("read fixture {}: {}", path.display(), e));
    let headers = reader
        .headers()
        .expect("fixture has a header")
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .records()
        .map(|r| r.expect("fixture row").iter().map(str::to_string).collect())
        .collect();
    RawTable::new(headers, rows)
}

fn load_schema(name: &str) -> Value {
    let path = workspace_root().join("schema").join(name);
    let text = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("read schema {}: {}", path.display(), e));
    serde_json::from_str(&text).expect("schema is valid JSON")
}

fn cleaned_json(config: PipelineConfig) -> Value {
    let output = Pipeline::new(config)
        .expect("pipeline builds")
        .run(&load_listings(), &RateTable::defaults())
        .expect("fixture passes validation");
    serde_json::to_value(&output.records).expect("records serialize")
}

fn validator() -> jsonschema::Validator {
    let schema = load_schema("canonical_record.schema.json");
    jsonschema::draft202012::new(&schema).expect("canonical record schema compiles")
}

// ---------------------------------------------------------------------------
// Positive validation: pipeline output conforms to the schema
// ---------------------------------------------------------------------------

#[test]
fn test_cleaned_records_conform_to_schema() {
    let data = cleaned_json(PipelineConfig::default());
    assert_eq!(data.as_array().unwrap().len(), 5);

    let result = validator().validate(&data);
    if let Err(e) = &result {
        panic!("cleaned records failed validation: {e}");
    }
}

#[test]
fn test_not_available_records_conform_to_schema() {
    let data = cleaned_json(PipelineConfig {
        missing_price: MissingPricePolicy::NotAvailable,
        ..PipelineConfig::default()
    });
    assert!(data[2]["price"].is_null());
    assert!(data[2]["total_price"].is_null());

    let result = validator().validate(&data);
    if let Err(e) = &result {
        panic!("not-available records failed validation: {e}");
    }
}

#[test]
fn test_fixture_values() {
    let data = cleaned_json(PipelineConfig::default());
    assert_eq!(data[0]["condition"], "gebraucht");
    assert_eq!(data[0]["total_price"], 1890.0);
    assert_eq!(data[1]["condition"], "neu");
    assert_eq!(data[1]["total_price"], 3212.69);
    assert_eq!(data[2]["condition"], "defekt");
    assert_eq!(data[2]["origin"], "Grossbritannien");
    assert_eq!(data[2]["currency"], "GBP");
    assert_eq!(data[2]["total_price"], 0.0);
    assert_eq!(data[3]["currency"], "USD");
    assert_eq!(data[4]["origin"], "Unbekannt");
    assert_eq!(data[4]["product_name"], "keine Angabe");
    assert_eq!(data[4]["price"], 120.0);
}

// ---------------------------------------------------------------------------
// Negative validation: schema rejects invalid data
// ---------------------------------------------------------------------------

#[test]
fn test_schema_rejects_missing_required_field() {
    let mut data = cleaned_json(PipelineConfig::default());
    data[0].as_object_mut().unwrap().remove("total_price");
    assert!(!validator().is_valid(&data));
}

#[test]
fn test_schema_rejects_unknown_condition() {
    let mut data = cleaned_json(PipelineConfig::default());
    data[0]["condition"] = Value::String("wie neu".to_string());
    assert!(!validator().is_valid(&data));
}

#[test]
fn test_schema_rejects_negative_amount() {
    let mut data = cleaned_json(PipelineConfig::default());
    data[1]["shipping_cost"] = serde_json::json!(-5.0);
    assert!(!validator().is_valid(&data));
}

#[test]
fn test_schema_rejects_unknown_currency() {
    let mut data = cleaned_json(PipelineConfig::default());
    data[3]["currency"] = Value::String("JPY".to_string());
    assert!(!validator().is_valid(&data));
}
