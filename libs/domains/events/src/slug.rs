//! Slug derivation and lookup-key sanitizing.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9_\s-]").unwrap());
static WHITESPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static HYPHEN_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());
static LOOKUP_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").unwrap());

/// Derive a URL slug from a title.
///
/// Lowercases and trims, drops everything but ASCII letters and digits,
/// `_`, whitespace and hyphens, turns whitespace runs into a single hyphen, collapses
/// repeated hyphens and strips them from both ends.
///
/// ```
/// use domain_events::slug::slugify;
///
/// assert_eq!(slugify("React Summit 2025!!"), "react-summit-2025");
/// assert_eq!(slugify("  -- Rust & WebAssembly --  "), "rust-webassembly");
/// assert_eq!(slugify("Café Tech Night"), "caf-tech-night");
/// ```
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(lowered.trim(), "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Why a path slug was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugKeyError {
    Empty,
    InvalidCharacters,
}

/// Trim and lowercase a slug taken from a request, then check it only holds
/// `[a-z0-9_-]`.
pub fn sanitize_lookup_key(raw: &str) -> Result<String, SlugKeyError> {
    let key = raw.trim().to_lowercase();
    if key.is_empty() {
        return Err(SlugKeyError::Empty);
    }
    if !LOOKUP_KEY.is_match(&key) {
        return Err(SlugKeyError::InvalidCharacters);
    }
    Ok(key)
}
