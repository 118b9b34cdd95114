// Coin type discovery.
// Events are the widest net: swap events mention pool tokens that never show up in
// balance changes. The payload scan is deliberately loose; unknown candidates simply get
// no metadata later on.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::coin_type::{coin_inner_type, normalize, TYPE_SEPARATOR};
use crate::models::{BalanceChange, ObjectChange, SuiEvent, TransactionRecord};

/// Deepest nesting level of an event payload that is scanned.
pub const DEFAULT_MAX_PAYLOAD_DEPTH: usize = 64;

/// Every distinct coin type referenced by the transaction's events and balance changes,
/// normalized.
pub fn extract_coin_types(tx: &TransactionRecord) -> BTreeSet<String> {
    extract_coin_types_with_depth(tx, DEFAULT_MAX_PAYLOAD_DEPTH)
}

pub fn extract_coin_types_with_depth(tx: &TransactionRecord, max_depth: usize) -> BTreeSet<String> {
    let mut coin_types = coin_types_from_events(tx.events.as_deref().unwrap_or_default(), max_depth);
    coin_types.extend(coin_types_from_balance_changes(
        tx.balance_changes.as_deref().unwrap_or_default(),
    ));
    coin_types
}

pub fn coin_types_from_events(events: &[SuiEvent], max_depth: usize) -> BTreeSet<String> {
    let mut coin_types = BTreeSet::new();
    for event in events {
        if let Some(payload) = &event.parsed_json {
            collect_type_strings(payload, 0, max_depth, &mut coin_types);
        }
    }
    coin_types
}

pub fn coin_types_from_balance_changes(changes: &[BalanceChange]) -> BTreeSet<String> {
    changes
        .iter()
        .filter(|change| !change.coin_type.is_empty())
        .map(|change| normalize(&change.coin_type))
        .collect()
}

/// `Coin<T>` inner types of every object change that has an object type. Package
/// publications carry none.
pub fn coin_types_from_object_changes(changes: &[ObjectChange]) -> BTreeSet<String> {
    changes
        .iter()
        .filter(|change| change.change_kind != "published")
        .filter_map(|change| change.object_type.as_deref())
        .filter_map(coin_inner_type)
        .map(normalize)
        .collect()
}

/// Type arguments of every `MoveCall` in the programmable transaction.
pub fn coin_types_from_move_calls(tx: &TransactionRecord) -> BTreeSet<String> {
    let Some(commands) = tx
        .extra
        .get("transaction")
        .and_then(|t| t.pointer("/data/transaction/transactions"))
        .and_then(Value::as_array)
    else {
        return BTreeSet::new();
    };

    commands
        .iter()
        .filter_map(|command| command.pointer("/MoveCall/type_arguments"))
        .filter_map(Value::as_array)
        .flatten()
        .filter_map(Value::as_str)
        .map(normalize)
        .collect()
}

fn collect_type_strings(value: &Value, depth: usize, max_depth: usize, out: &mut BTreeSet<String>) {
    if depth > max_depth {
        debug!("payload nesting exceeds {max_depth}, not descending further");
        return;
    }

    match value {
        Value::String(s) if s.contains(TYPE_SEPARATOR) => {
            out.insert(normalize(s));
        }
        Value::Array(items) => {
            for item in items {
                collect_type_strings(item, depth + 1, max_depth, out);
            }
        }
        Value::Object(fields) => {
            for field in fields.values() {
                collect_type_strings(field, depth + 1, max_depth, out);
            }
        }
        _ => {}
    }
}

/// Coin types split by where they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinTypeSources {
    pub from_events: BTreeSet<String>,
    pub from_balance_changes: BTreeSet<String>,
    pub from_object_changes: BTreeSet<String>,
    pub from_move_calls: BTreeSet<String>,
}

impl CoinTypeSources {
    pub fn from_transaction(tx: &TransactionRecord, max_depth: usize) -> Self {
        Self {
            from_events: coin_types_from_events(tx.events.as_deref().unwrap_or_default(), max_depth),
            from_balance_changes: coin_types_from_balance_changes(
                tx.balance_changes.as_deref().unwrap_or_default(),
            ),
            from_object_changes: coin_types_from_object_changes(
                tx.object_changes.as_deref().unwrap_or_default(),
            ),
            from_move_calls: coin_types_from_move_calls(tx),
        }
    }

    pub fn all(&self) -> BTreeSet<String> {
        self.from_events
            .iter()
            .chain(&self.from_balance_changes)
            .chain(&self.from_object_changes)
            .chain(&self.from_move_calls)
            .cloned()
            .collect()
    }
}
