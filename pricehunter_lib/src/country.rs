//! Canonical country names for listing origins.
//!
//! Follows the same compile-time `include_str!` seed pattern as the other
//! lookup tables: the alias table lives in `seed_data/country_aliases.yml`.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

use crate::text::normalize_text;

/// Placeholder for listings without an origin.
pub const UNKNOWN_COUNTRY: &str = "Unbekannt";

/// Error types for country alias operations.
#[derive(Error, Debug)]
pub enum CountryAliasError {
    #[error("Failed to parse country alias YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Duplicate 'from' phrase in alias file: {0}")]
    DuplicateFrom(String),
    #[error("Empty country name for alias '{0}'")]
    EmptyTarget(String),
}

/// Top-level structure for the country alias YAML file.
#[derive(Deserialize, Debug)]
pub struct CountryAliasFile {
    pub aliases: Vec<CountryAlias>,
}

/// A single alias: an origin phrase or spelling and its canonical name.
#[derive(Deserialize, Debug, Clone)]
pub struct CountryAlias {
    pub from: String,
    pub to: String,
}

/// Parse country aliases from YAML content.
pub fn parse_country_aliases(
    yaml_content: &str,
) -> Result<HashMap<String, String>, CountryAliasError> {
    let file: CountryAliasFile = serde_yml::from_str(yaml_content)?;

    let mut map = HashMap::new();
    for alias in file.aliases {
        if map.contains_key(&alias.from) {
            return Err(CountryAliasError::DuplicateFrom(alias.from));
        }
        if alias.to.trim().is_empty() {
            return Err(CountryAliasError::EmptyTarget(alias.from));
        }
        map.insert(alias.from, alias.to.trim().to_string());
    }

    Ok(map)
}

/// Load country aliases from the embedded YAML file at compile time.
pub fn load_country_aliases() -> Result<HashMap<String, String>, CountryAliasError> {
    let yaml_content = include_str!("../../seed_data/country_aliases.yml");
    parse_country_aliases(yaml_content)
}

/// Maps free-text origins ("aus Deutschland", mis-encoded names) to
/// canonical country names.
#[derive(Debug, Clone)]
pub struct CountryNormalizer {
    aliases: HashMap<String, String>,
}

impl CountryNormalizer {
    pub fn new(aliases: HashMap<String, String>) -> Self {
        Self { aliases }
    }

    /// Normalizer backed by the embedded alias table.
    pub fn builtin() -> Result<Self, CountryAliasError> {
        Ok(Self::new(load_country_aliases()?))
    }

    /// Canonical country for `text`; absent or empty origins are
    /// [`UNKNOWN_COUNTRY`].
    pub fn normalize(&self, text: Option<&str>) -> String {
        let cleaned = normalize_text(text).unwrap_or_default();
        if cleaned.is_empty() {
            return UNKNOWN_COUNTRY.to_string();
        }
        if let Some(country) = self.aliases.get(&cleaned) {
            return country.clone();
        }

        let stripped = cleaned.strip_prefix("aus ").unwrap_or(&cleaned).trim();
        if stripped.is_empty() {
            return UNKNOWN_COUNTRY.to_string();
        }
        self.aliases
            .get(stripped)
            .cloned()
            .unwrap_or_else(|| stripped.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> CountryNormalizer {
        CountryNormalizer::builtin().unwrap()
    }

    #[test]
    fn builtin_table_loads() {
        let aliases = load_country_aliases().unwrap();
        assert_eq!(aliases.get("aus Schweiz").map(String::as_str), Some("Schweiz"));
    }

    #[test]
    fn aus_phrase_is_mapped() {
        assert_eq!(normalizer().normalize(Some("aus Grossbritannien")), "Grossbritannien");
        assert_eq!(normalizer().normalize(Some("  aus Deutschland ")), "Deutschland");
    }

    #[test]
    fn unknown_aus_phrase_loses_its_prefix() {
        assert_eq!(normalizer().normalize(Some("aus Kanada")), "Kanada");
    }

    #[test]
    fn prefix_match_is_case_sensitive() {
        assert_eq!(normalizer().normalize(Some("Aus Kanada")), "Aus Kanada");
    }

    #[test]
    fn empty_or_absent_is_unknown() {
        assert_eq!(normalizer().normalize(Some("")), UNKNOWN_COUNTRY);
        assert_eq!(normalizer().normalize(Some("   ")), UNKNOWN_COUNTRY);
        assert_eq!(normalizer().normalize(None), UNKNOWN_COUNTRY);
        assert_eq!(normalizer().normalize(Some("aus ")), UNKNOWN_COUNTRY);
    }

    #[test]
    fn corrupted_great_britain_spellings() {
        let n = normalizer();
        assert_eq!(n.normalize(Some("GroÃŸbritannien")), "Grossbritannien");
        assert_eq!(n.normalize(Some("aus GroÃŸbritannien")), "Grossbritannien");
        assert_eq!(n.normalize(Some("GroÃbritannien")), "Grossbritannien");
        assert_eq!(n.normalize(Some("GroÃYbritannien")), "Grossbritannien");
        assert_eq!(n.normalize(Some("Großbritannien")), "Grossbritannien");
    }

    #[test]
    fn repaired_umlauts_are_kept() {
        assert_eq!(normalizer().normalize(Some("aus Ã–sterreich")), "Österreich");
        assert_eq!(normalizer().normalize(Some("Dänemark")), "Dänemark");
    }

    #[test]
    fn duplicate_from_rejected() {
        let yaml = r#"
aliases:
  - from: "aus Schweiz"
    to: "Schweiz"
  - from: "aus Schweiz"
    to: "CH"
"#;
        let result = parse_country_aliases(yaml);
        assert!(matches!(result.unwrap_err(), CountryAliasError::DuplicateFrom(_)));
    }

    #[test]
    fn empty_target_rejected() {
        let yaml = r#"
aliases:
  - from: "aus Nirgendwo"
    to: "  "
"#;
        assert!(matches!(
            parse_country_aliases(yaml).unwrap_err(),
            CountryAliasError::EmptyTarget(_)
        ));
    }
}
