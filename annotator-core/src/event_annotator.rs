// Event payload annotation.
//
// Sui events carry their coin types inside the payload itself:
// - single-coin events (mint, claim, transfer) expose `coin_type: { name }`;
// - AMM/swap events expose `coin_a: { name }` and `coin_b: { name }`.
// Numeric amounts sit next to those hints as digit-only strings. Each amount gets
// `<key>HumanReadable`, `<key>Symbol`, `<key>Name` and `<key>IconUrl` siblings.

use serde_json::{Map, Value};
use tracing::debug;

use crate::decimals::try_to_human_readable;
use crate::metadata::{CoinDisplay, MetadataIndex};
use crate::models::{SuiEvent, TokenMetadata};

/// Suffixes of the sibling fields written next to each annotated amount.
pub const DERIVED_SUFFIXES: [&str; 4] = ["HumanReadable", "Symbol", "Name", "IconUrl"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSide {
    A,
    B,
}

/// Decides which coin of a two-coin event a numeric field refers to.
pub type SideStrategy = fn(&str) -> CoinSide;

/// Default side inference for two-coin events: a key naming the input leg (`"in"`) or
/// containing an `a` anywhere belongs to coin A, everything else to coin B.
///
/// This is a naming guess, not a rule. `amount_out` contains an `a` and lands on coin A.
/// Swap it out with [`EventAnnotator::with_side_strategy`] rather than editing it in place.
pub fn infer_coin_side(key: &str) -> CoinSide {
    let lowered = key.to_lowercase();
    if lowered.contains("in") || lowered.contains('a') {
        CoinSide::A
    } else {
        CoinSide::B
    }
}

enum CoinHint<'a> {
    Single(Option<&'a TokenMetadata>),
    Dual {
        a: Option<&'a TokenMetadata>,
        b: Option<&'a TokenMetadata>,
    },
}

pub struct EventAnnotator<'a> {
    index: &'a MetadataIndex,
    default_decimals: u8,
    side_strategy: SideStrategy,
}

impl<'a> EventAnnotator<'a> {
    pub fn new(index: &'a MetadataIndex, default_decimals: u8) -> Self {
        Self {
            index,
            default_decimals,
            side_strategy: infer_coin_side,
        }
    }

    pub fn with_side_strategy(mut self, side_strategy: SideStrategy) -> Self {
        self.side_strategy = side_strategy;
        self
    }

    pub fn annotate_events(&self, events: &[SuiEvent]) -> Vec<SuiEvent> {
        events.iter().map(|event| self.annotate_event(event)).collect()
    }

    pub fn annotate_event(&self, event: &SuiEvent) -> SuiEvent {
        SuiEvent {
            parsed_json: event.parsed_json.as_ref().map(|payload| self.annotate_payload(payload)),
            ..event.clone()
        }
    }

    /// Add derived siblings for every amount in the payload's top level. Non-object
    /// payloads come back unchanged.
    pub fn annotate_payload(&self, payload: &Value) -> Value {
        let Value::Object(fields) = payload else {
            return payload.clone();
        };

        let hint = self.coin_hint(fields);
        let mut annotated = fields.clone();

        for (key, value) in fields {
            let Some(amount) = numeric_string(value) else {
                continue;
            };
            if is_derived_key(key, fields) {
                continue;
            }

            let meta = match &hint {
                CoinHint::Single(meta) => {
                    if !key.to_lowercase().contains("amount") {
                        continue;
                    }
                    *meta
                }
                CoinHint::Dual { a, b } => match (self.side_strategy)(key) {
                    CoinSide::A => *a,
                    CoinSide::B => *b,
                },
            };

            let display = CoinDisplay::resolve(meta, self.default_decimals);
            let human_readable = try_to_human_readable(amount, display.decimals);

            annotated.insert(format!("{key}HumanReadable"), human_readable.map_or(Value::Null, Value::String));
            annotated.insert(format!("{key}Symbol"), Value::String(display.symbol));
            annotated.insert(format!("{key}Name"), Value::String(display.name));
            annotated.insert(
                format!("{key}IconUrl"),
                display.icon_url.map_or(Value::Null, Value::String),
            );
        }

        Value::Object(annotated)
    }

    fn coin_hint(&self, fields: &Map<String, Value>) -> CoinHint<'a> {
        if let Some(coin_type) = type_name(fields, "coin_type") {
            return CoinHint::Single(self.lookup(coin_type));
        }

        CoinHint::Dual {
            a: type_name(fields, "coin_a").and_then(|name| self.lookup(name)),
            b: type_name(fields, "coin_b").and_then(|name| self.lookup(name)),
        }
    }

    fn lookup(&self, coin_type: &str) -> Option<&'a TokenMetadata> {
        let meta = self.index.get(coin_type);
        if meta.is_none() {
            debug!("no metadata for event coin type {coin_type}");
        }
        meta
    }
}

/// Convenience wrapper using the default side strategy.
pub fn annotate_events(events: &[SuiEvent], index: &MetadataIndex, default_decimals: u8) -> Vec<SuiEvent> {
    EventAnnotator::new(index, default_decimals).annotate_events(events)
}

/// `fields[field].name` when it is a string, e.g. `coin_a: { name: "2::sui::SUI" }`.
fn type_name<'v>(fields: &'v Map<String, Value>, field: &str) -> Option<&'v str> {
    fields.get(field)?.get("name")?.as_str()
}

/// Digit-only string values (`^\d+$`).
fn numeric_string(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => Some(s),
        _ => None,
    }
}

/// A key this annotator wrote on an earlier pass: one of the derived suffixes on top of
/// a base key whose full set of derived siblings is present. A lone `feeName` next to
/// `fee` is a payload field of its own.
fn is_derived_key(key: &str, fields: &Map<String, Value>) -> bool {
    DERIVED_SUFFIXES.iter().any(|suffix| {
        key.strip_suffix(suffix).is_some_and(|base| {
            !base.is_empty()
                && fields.contains_key(base)
                && DERIVED_SUFFIXES
                    .iter()
                    .all(|sibling| fields.contains_key(&format!("{base}{sibling}")))
        })
    })
}
