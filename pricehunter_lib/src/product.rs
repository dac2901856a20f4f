//! Product names carried in marketplace search URLs.

use url::Url;

/// Placeholder for values a listing does not provide.
pub const NOT_AVAILABLE: &str = "keine Angabe";

/// Query keys holding the searched product, in lookup order.
pub const DEFAULT_PRODUCT_KEYS: &[&str] = &["skw", "_skw", "_nkw"];

/// Reads the product name from the first of `keys` present in the query of
/// `url`, e.g. `https://www.ricardo.ch/de/s/?skw=gibson+les+paul`.
///
/// Returns `None` for relative or malformed URLs and for empty values.
pub fn product_name_from_url<S: AsRef<str>>(url: &str, keys: &[S]) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    keys.iter().find_map(|key| {
        parsed
            .query_pairs()
            .find(|(name, value)| name == key.as_ref() && !value.trim().is_empty())
            .map(|(_, value)| capitalize_first(value.trim()))
    })
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_skw_and_decodes_plus() {
        let url = "https://www.ricardo.ch/de/s/?skw=gibson+les+paul&sort=newest";
        assert_eq!(
            product_name_from_url(url, DEFAULT_PRODUCT_KEYS).as_deref(),
            Some("Gibson les paul")
        );
    }

    #[test]
    fn falls_back_to_later_keys() {
        let url = "https://www.ebay.de/sch/i.html?_from=R40&_nkw=fender%20stratocaster";
        assert_eq!(
            product_name_from_url(url, DEFAULT_PRODUCT_KEYS).as_deref(),
            Some("Fender stratocaster")
        );
    }

    #[test]
    fn key_order_wins_over_query_order() {
        let url = "https://example.com/?_nkw=second&skw=first";
        assert_eq!(
            product_name_from_url(url, DEFAULT_PRODUCT_KEYS).as_deref(),
            Some("First")
        );
    }

    #[test]
    fn empty_value_is_skipped() {
        let url = "https://example.com/?skw=+&_skw=%C3%BCbungsamp";
        assert_eq!(
            product_name_from_url(url, DEFAULT_PRODUCT_KEYS).as_deref(),
            Some("Übungsamp")
        );
    }

    #[test]
    fn missing_key_or_bad_url() {
        assert_eq!(
            product_name_from_url("https://example.com/?q=x", DEFAULT_PRODUCT_KEYS),
            None
        );
        assert_eq!(product_name_from_url("/s/?skw=x", DEFAULT_PRODUCT_KEYS), None);
        assert_eq!(product_name_from_url("", DEFAULT_PRODUCT_KEYS), None);
    }

    #[test]
    fn custom_keys() {
        let keys = vec!["query".to_string()];
        assert_eq!(
            product_name_from_url("https://example.com/?query=amp", &keys).as_deref(),
            Some("Amp")
        );
    }
}
