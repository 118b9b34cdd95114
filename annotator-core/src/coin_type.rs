// Move type signature helpers.
// Coin types look like `0x2::sui::SUI`; event payloads frequently drop the `0x`.

use regex::Regex;
use std::sync::OnceLock;

pub const TYPE_SEPARATOR: &str = "::";

/// Canonicalize a `package::module::Type` signature to its `0x`-prefixed form.
///
/// Strings without `::`, or with fewer than three segments, are not type signatures and
/// come back unchanged.
pub fn normalize(type_signature: &str) -> String {
    if !type_signature.contains(TYPE_SEPARATOR) {
        return type_signature.to_string();
    }

    let segments: Vec<&str> = type_signature.split(TYPE_SEPARATOR).collect();
    if segments.len() < 3 {
        return type_signature.to_string();
    }

    let package = segments[0];
    if package.starts_with("0x") || package.starts_with("0X") {
        return type_signature.to_string();
    }

    format!("0x{}", segments.join(TYPE_SEPARATOR))
}

/// Key used for metadata lookups: canonical form, lower-cased.
pub fn lookup_key(type_signature: &str) -> String {
    normalize(type_signature).to_lowercase()
}

fn coin_generic_re() -> &'static Regex {
    static COIN_GENERIC_RE: OnceLock<Regex> = OnceLock::new();
    COIN_GENERIC_RE.get_or_init(|| Regex::new(r"Coin<([^>]+)>").expect("valid coin generic regex"))
}

/// Inner type of the first `Coin<...>` generic in an object type, captured verbatim up
/// to the first `>`.
pub fn coin_inner_type(object_type: &str) -> Option<&str> {
    coin_generic_re()
        .captures(object_type)
        .and_then(|caps| caps.get(1))
        .map(|inner| inner.as_str())
}
