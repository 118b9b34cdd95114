use tracing::debug;

use crate::decimals::try_to_human_readable;
use crate::metadata::{CoinDisplay, MetadataIndex};
use crate::models::{without_keys, AnnotatedBalanceChange, BalanceChange};

const DERIVED_KEYS: [&str; 4] = ["amountHumanReadable", "amountSymbol", "amountName", "amountIconUrl"];

pub fn annotate_balance_changes(
    changes: &[BalanceChange],
    index: &MetadataIndex,
    default_decimals: u8,
) -> Vec<AnnotatedBalanceChange> {
    changes
        .iter()
        .map(|change| annotate_balance_change(change, index, default_decimals))
        .collect()
}

pub fn annotate_balance_change(
    change: &BalanceChange,
    index: &MetadataIndex,
    default_decimals: u8,
) -> AnnotatedBalanceChange {
    let meta = index.get(&change.coin_type);
    if meta.is_none() {
        debug!("no metadata for balance change coin type {}", change.coin_type);
    }
    let display = CoinDisplay::resolve(meta, default_decimals);

    let amount_human_readable = try_to_human_readable(&change.amount, display.decimals);
    if amount_human_readable.is_none() {
        debug!("balance change amount {:?} is not an integer", change.amount);
    }

    AnnotatedBalanceChange {
        change: BalanceChange {
            extra: without_keys(&change.extra, &DERIVED_KEYS),
            ..change.clone()
        },
        amount_human_readable,
        amount_symbol: display.symbol,
        amount_name: display.name,
        amount_icon_url: display.icon_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TokenMetadata;
    use serde_json::{json, Map};

    fn sui_index() -> MetadataIndex {
        MetadataIndex::build(&[TokenMetadata {
            coin_type: "0x2::sui::SUI".to_string(),
            symbol: Some("SUI".to_string()),
            name: Some("Sui".to_string()),
            icon_url: Some("https://example.com/sui.png".to_string()),
            decimals: Some(9),
        }])
    }

    fn change(coin_type: &str, amount: &str) -> BalanceChange {
        BalanceChange {
            owner: json!({ "AddressOwner": "0xa11ce" }),
            coin_type: coin_type.to_string(),
            amount: amount.to_string(),
            extra: Map::new(),
        }
    }

    #[test]
    fn test_annotate_known_coin() {
        let annotated = annotate_balance_change(&change("0x2::sui::SUI", "-1000000000"), &sui_index(), 9);

        assert_eq!(annotated.amount_human_readable.as_deref(), Some("-1.000000"));
        assert_eq!(annotated.amount_symbol, "SUI");
        assert_eq!(annotated.amount_name, "Sui");
        assert_eq!(annotated.amount_icon_url.as_deref(), Some("https://example.com/sui.png"));
        assert_eq!(annotated.change.amount, "-1000000000");
        assert_eq!(annotated.change.coin_type, "0x2::sui::SUI");
    }

    #[test]
    fn test_annotate_matches_unprefixed_coin_type() {
        let annotated = annotate_balance_change(&change("2::sui::SUI", "500000000"), &sui_index(), 9);
        assert_eq!(annotated.amount_symbol, "SUI");
        assert_eq!(annotated.amount_human_readable.as_deref(), Some("0.500000"));
    }

    #[test]
    fn test_annotate_unknown_coin_uses_sentinels() {
        let annotated = annotate_balance_change(&change("0xbeef::meme::MEME", "2500000000"), &sui_index(), 9);

        assert_eq!(annotated.amount_human_readable.as_deref(), Some("2.500000"));
        assert_eq!(annotated.amount_symbol, "UNKNOWN");
        assert_eq!(annotated.amount_name, "Unknown Token");
        assert_eq!(annotated.amount_icon_url, None);
    }

    #[test]
    fn test_malformed_amount_is_marked_unavailable() {
        let annotated = annotate_balance_change(&change("0x2::sui::SUI", "lots"), &sui_index(), 9);

        assert_eq!(annotated.amount_human_readable, None);
        assert_eq!(annotated.amount_symbol, "SUI");

        let value = serde_json::to_value(&annotated).unwrap();
        assert_eq!(value["amountHumanReadable"], json!(null));
        assert_eq!(value["amount"], json!("lots"));
    }

    #[test]
    fn test_reannotation_is_stable() {
        let index = sui_index();
        let first = annotate_balance_changes(&[change("0x2::sui::SUI", "42")], &index, 9);

        let reparsed: Vec<BalanceChange> =
            serde_json::from_value(serde_json::to_value(&first).unwrap()).unwrap();
        let second = annotate_balance_changes(&reparsed, &index, 9);

        assert_eq!(second, first);
        assert_eq!(
            serde_json::to_value(&second).unwrap(),
            serde_json::to_value(&first).unwrap()
        );
    }
}
