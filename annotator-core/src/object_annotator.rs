use crate::coin_type::{coin_inner_type, lookup_key};
use crate::metadata::MetadataIndex;
use crate::models::{without_keys, AnnotatedObjectChange, ObjectChange};

const DERIVED_KEYS: [&str; 4] = ["coinType", "coinSymbol", "coinName", "coinIconUrl"];

/// Tag `Coin<T>` objects with their coin's metadata. Everything else (NFTs, packages,
/// plain structs) gets null coin fields.
pub fn annotate_object_changes(changes: &[ObjectChange], index: &MetadataIndex) -> Vec<AnnotatedObjectChange> {
    changes
        .iter()
        .map(|change| annotate_object_change(change, index))
        .collect()
}

pub fn annotate_object_change(change: &ObjectChange, index: &MetadataIndex) -> AnnotatedObjectChange {
    let coin_type = change
        .object_type
        .as_deref()
        .and_then(coin_inner_type)
        .map(lookup_key);
    let meta = coin_type.as_deref().and_then(|key| index.get(key));

    AnnotatedObjectChange {
        change: ObjectChange {
            extra: without_keys(&change.extra, &DERIVED_KEYS),
            ..change.clone()
        },
        coin_type,
        coin_symbol: meta.and_then(|m| m.symbol.clone()),
        coin_name: meta.and_then(|m| m.name.clone()),
        coin_icon_url: meta.and_then(|m| m.icon_url.clone()),
    }
}
