use std::collections::HashMap;

use crate::coin_type::lookup_key;
use crate::models::TokenMetadata;

pub const UNKNOWN_SYMBOL: &str = "UNKNOWN";
pub const UNKNOWN_NAME: &str = "Unknown Token";

/// Immutable coin type → metadata lookup, keyed by lower-cased canonical coin type.
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    entries: HashMap<String, TokenMetadata>,
}

impl MetadataIndex {
    /// Later records overwrite earlier ones with the same key.
    pub fn build(records: &[TokenMetadata]) -> Self {
        records.iter().cloned().collect()
    }

    pub fn get(&self, coin_type: &str) -> Option<&TokenMetadata> {
        self.entries.get(&lookup_key(coin_type))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<TokenMetadata> for MetadataIndex {
    fn from_iter<I: IntoIterator<Item = TokenMetadata>>(iter: I) -> Self {
        let mut entries = HashMap::new();
        for record in iter {
            entries.insert(lookup_key(&record.coin_type), record);
        }
        Self { entries }
    }
}

/// Display fields for one coin with the lookup-miss sentinels already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinDisplay {
    pub symbol: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub decimals: u8,
}

impl CoinDisplay {
    pub fn resolve(meta: Option<&TokenMetadata>, default_decimals: u8) -> Self {
        Self {
            symbol: meta
                .and_then(|m| m.symbol.clone())
                .unwrap_or_else(|| UNKNOWN_SYMBOL.to_string()),
            name: meta
                .and_then(|m| m.name.clone())
                .unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            icon_url: meta.and_then(|m| m.icon_url.clone()),
            decimals: meta.and_then(|m| m.decimals).unwrap_or(default_decimals),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(coin_type: &str, symbol: &str, decimals: u8) -> TokenMetadata {
        TokenMetadata {
            coin_type: coin_type.to_string(),
            symbol: Some(symbol.to_string()),
            name: Some(format!("{symbol} Token")),
            icon_url: None,
            decimals: Some(decimals),
        }
    }

    #[test]
    fn test_lookup_ignores_prefix_and_case() {
        let index = MetadataIndex::build(&[meta("0x2::sui::SUI", "SUI", 9)]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("0x2::sui::SUI").unwrap().symbol.as_deref(), Some("SUI"));
        assert!(index.get("2::sui::SUI").is_some());
        assert!(index.get("0x2::SUI::sui").is_some());
        assert!(index.get("0x2::coin::COIN").is_none());
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let index = MetadataIndex::build(&[
            meta("0xa::usdc::USDC", "USDC-old", 6),
            meta("a::usdc::usdc", "USDC", 6),
        ]);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get("0xa::usdc::USDC").unwrap().symbol.as_deref(), Some("USDC"));
    }

    #[test]
    fn test_resolve_applies_sentinels() {
        let missing = CoinDisplay::resolve(None, 9);
        assert_eq!(missing.symbol, UNKNOWN_SYMBOL);
        assert_eq!(missing.name, UNKNOWN_NAME);
        assert_eq!(missing.icon_url, None);
        assert_eq!(missing.decimals, 9);

        let partial = TokenMetadata {
            coin_type: "0xb::b::B".to_string(),
            symbol: Some("B".to_string()),
            name: None,
            icon_url: Some("https://example.com/b.png".to_string()),
            decimals: None,
        };
        let resolved = CoinDisplay::resolve(Some(&partial), 9);
        assert_eq!(resolved.symbol, "B");
        assert_eq!(resolved.name, UNKNOWN_NAME);
        assert_eq!(resolved.icon_url.as_deref(), Some("https://example.com/b.png"));
        assert_eq!(resolved.decimals, 9);
    }
}
