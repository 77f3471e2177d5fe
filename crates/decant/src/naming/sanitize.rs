//! Suffix sanitization and grammar validation.

use once_cell::sync::Lazy;
use regex::Regex;

/// Grammar for an accepted suffix: one lowercase ASCII word.
static SUFFIX_GRAMMAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z]+$").unwrap());

/// Pattern of raw platform identifiers ("V12", "V11.1").
static PLATFORM_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^V\d+(\.\d+)?$").unwrap());

/// Sanitize an oracle candidate: trim, lowercase, transliterate German
/// umlauts (ä→ae, ö→oe, ü→ue, ß→ss), then strip any remaining non-ASCII.
pub fn sanitize_suffix(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().to_lowercase().chars() {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            c if c.is_ascii() => out.push(c),
            _ => {}
        }
    }
    out
}

/// True if a sanitized suffix satisfies the naming grammar.
pub fn is_valid_suffix(suffix: &str) -> bool {
    SUFFIX_GRAMMAR.is_match(suffix)
}

/// True if a name still looks like a raw platform identifier.
pub fn is_platform_id(name: &str) -> bool {
    PLATFORM_ID.is_match(name)
}
