//! Workspace identifier normalization.
//!
//! Page, database and block IDs show up in three shapes: dashed UUIDs, bare
//! 32-character hex strings, and page URLs ending in the hex ID. All of them
//! are normalized to the dashed form the API expects. Anything else is passed
//! through trimmed, and the remote service decides whether it is valid.

use regex::Regex;
use std::sync::OnceLock;

// Patterns are literals; compiling them cannot fail.
#[allow(clippy::expect_used)]
fn dashed_id() -> &'static Regex {
    static DASHED_ID: OnceLock<Regex> = OnceLock::new();
    DASHED_ID.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("valid regex")
    })
}

/// A 32-character hex run that starts the input or follows `-` or `/`.
#[allow(clippy::expect_used)]
fn hex_id() -> &'static Regex {
    static HEX_ID: OnceLock<Regex> = OnceLock::new();
    HEX_ID.get_or_init(|| {
        Regex::new(r"(?:^|[-/])([0-9a-fA-F]{32})(?:[?#/].*)?$").expect("valid regex")
    })
}

/// Normalizes an ID, UUID or page URL to dashed lower-case UUID form.
///
/// # Examples
///
/// ```
/// use engram_rs::core::normalize_id;
///
/// assert_eq!(
///     normalize_id("https://www.notion.so/My-Page-0123456789abcdef0123456789ABCDEF?pvs=4"),
///     "01234567-89ab-cdef-0123-456789abcdef"
/// );
/// assert_eq!(normalize_id(" block-123 "), "block-123");
/// ```
#[must_use]
pub fn normalize_id(raw: &str) -> String {
    let trimmed = raw.trim();

    if dashed_id().is_match(trimmed) {
        return trimmed.to_lowercase();
    }

    if let Some(hex) = hex_id().captures(trimmed).and_then(|caps| caps.get(1)) {
        let hex = hex.as_str().to_lowercase();
        return format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        );
    }

    trimmed.to_string()
}
