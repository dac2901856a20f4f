//! Classification of free-text item conditions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical item condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Neu,
    Gebraucht,
    Defekt,
    Unbekannt,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::Neu => "neu",
            Condition::Gebraucht => "gebraucht",
            Condition::Defekt => "defekt",
            Condition::Unbekannt => "unbekannt",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substring rules in priority order. Listings often mention several
/// keywords, so the first matching rule decides.
const CONDITION_RULES: &[(&[&str], Condition)] = &[
    (&["neu", "brandneu"], Condition::Neu),
    (&["gebraucht"], Condition::Gebraucht),
    (&["ersatzteil"], Condition::Defekt),
];

/// Classifies a condition text such as `"Brandneu |"` or `"Gebraucht"`.
pub fn normalize_condition(text: Option<&str>) -> Condition {
    let Some(text) = text else {
        return Condition::Unbekannt;
    };
    let lower = text.trim().trim_end_matches('|').trim_end().to_lowercase();
    CONDITION_RULES
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(_, condition)| *condition)
        .unwrap_or(Condition::Unbekannt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_labels() {
        assert_eq!(normalize_condition(Some("Brandneu")), Condition::Neu);
        assert_eq!(normalize_condition(Some("Neu |")), Condition::Neu);
        assert_eq!(normalize_condition(Some("Gebraucht")), Condition::Gebraucht);
        assert_eq!(
            normalize_condition(Some("Als Ersatzteil / defekt")),
            Condition::Defekt
        );
    }

    #[test]
    fn neu_outranks_gebraucht() {
        assert_eq!(
            normalize_condition(Some("Gebraucht, aber wie neu")),
            Condition::Neu
        );
        assert_eq!(
            normalize_condition(Some("neu: gebraucht ersatzteil")),
            Condition::Neu
        );
    }

    #[test]
    fn gebraucht_outranks_ersatzteil() {
        assert_eq!(
            normalize_condition(Some("Gebraucht - nur als Ersatzteil")),
            Condition::Gebraucht
        );
    }

    #[test]
    fn unmatched_or_absent_is_unknown() {
        assert_eq!(normalize_condition(Some("Sehr gut")), Condition::Unbekannt);
        assert_eq!(normalize_condition(Some("")), Condition::Unbekannt);
        assert_eq!(normalize_condition(None), Condition::Unbekannt);
    }

    #[test]
    fn display_is_lowercase_german() {
        assert_eq!(Condition::Gebraucht.to_string(), "gebraucht");
        assert_eq!(
            serde_json::to_string(&Condition::Defekt).unwrap(),
            "\"defekt\""
        );
    }
}
