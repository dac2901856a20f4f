//! Repair of mis-encoded text and whitespace cleanup for free-text fields.
//!
//! Scraped titles and country names regularly arrive as UTF-8 that was
//! decoded as Windows-1252 somewhere upstream (`Ã¼` instead of `ü`). Repair
//! re-encodes such text to its original bytes and decodes them as UTF-8
//! again. Legitimate accented characters are kept as they are.

use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Characters that only show up in text when UTF-8 was read as Latin-1/1252.
const MOJIBAKE_LEADS: &[char] = &['Ã', 'Â', 'â', 'Å', 'Ä', 'Ð'];

/// Windows-1252 assigns printable characters to 0x80..=0x9F. These are the
/// code points that map back to those bytes.
const CP1252_HIGH: &[(char, u8)] = &[
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

/// Maximum number of decode rounds; covers text that was double-encoded.
const MAX_REPAIR_ROUNDS: usize = 2;

fn encode_cp1252(text: &str) -> Option<Vec<u8>> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        let code = c as u32;
        if code <= 0xFF {
            bytes.push(code as u8);
        } else {
            let (_, byte) = CP1252_HIGH.iter().find(|(ch, _)| *ch == c)?;
            bytes.push(*byte);
        }
    }
    Some(bytes)
}

fn looks_mis_encoded(text: &str) -> bool {
    text.contains(MOJIBAKE_LEADS)
}

/// Undoes UTF-8-read-as-1252 corruption.
///
/// Returns the input unchanged when it does not look corrupted, or when the
/// re-encoded bytes are not valid UTF-8 (the corruption lost information).
pub fn repair_mojibake(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..MAX_REPAIR_ROUNDS {
        if !looks_mis_encoded(&current) {
            break;
        }
        let Some(bytes) = encode_cp1252(&current) else {
            break;
        };
        match String::from_utf8(bytes) {
            Ok(decoded) if decoded != current => current = decoded,
            _ => break,
        }
    }
    current
}

/// Cleans a free-text field: repairs encoding, turns line breaks into spaces
/// and trims the ends. Absent input stays absent.
pub fn normalize_text(text: Option<&str>) -> Option<String> {
    let text = text?;
    let repaired = repair_mojibake(text);
    let single_line = repaired.replace("\r\n", " ").replace(['\n', '\r'], " ");
    Some(single_line.trim().to_string())
}

fn non_alnum_regex() -> &'static Regex {
    static NON_ALNUM: OnceLock<Regex> = OnceLock::new();
    NON_ALNUM.get_or_init(|| Regex::new(r"[^a-z0-9\s]").expect("non-alnum regex is valid"))
}

/// Folds a title for near-duplicate comparison: lower case, accents and
/// punctuation removed, whitespace collapsed.
pub fn fold_for_key(text: &str) -> String {
    let lowered = repair_mojibake(text).to_lowercase().replace('ß', "ss");
    let ascii: String = lowered.nfkd().filter(|c| c.is_ascii()).collect();
    let stripped = non_alnum_regex().replace_all(&ascii, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
