use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::AnnotateError;
use crate::gas_annotator::GasUsageSummary;

/// A transaction as returned by `sui_getTransactionBlock` with events, effects,
/// object changes and balance changes requested. Fields the pipeline does not touch
/// (digest, transaction, timestampMs, checkpoint, ...) ride along in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_changes: Option<Vec<BalanceChange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_changes: Option<Vec<ObjectChange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<SuiEvent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<TransactionEffects>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransactionRecord {
    /// Accepts either a bare transaction block or a full JSON-RPC response and
    /// unwraps the `result` member of the latter.
    pub fn from_rpc_value(value: Value) -> Result<Self, AnnotateError> {
        let block = match value {
            Value::Object(mut envelope)
                if envelope.contains_key("jsonrpc") && envelope.contains_key("result") =>
            {
                envelope.remove("result").unwrap_or(Value::Null)
            }
            other => other,
        };
        Ok(serde_json::from_value(block)?)
    }

    pub fn digest(&self) -> Option<&str> {
        self.extra.get("digest").and_then(Value::as_str)
    }
}

/// Net per-owner delta of one coin type. `amount` is a signed integer string in the
/// coin's smallest unit. A missing `coinType` or `amount` reads as empty and only costs
/// this entry its annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceChange {
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub owner: Value,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub coin_type: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "String::is_empty")]
    pub amount: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectChange {
    /// created | mutated | deleted | wrapped | transferred | published
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub change_kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "String::is_empty"
    )]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_json: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<GasCostSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Gas charged by a transaction, every field an integer string in MIST. Numbers are
/// accepted and kept in their decimal form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub computation_cost: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub storage_cost: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub storage_rebate: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string", skip_serializing_if = "Option::is_none")]
    pub non_refundable_storage_fee: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Coin metadata as served by `suix_getCoinMetadata` and third-party registries,
/// keyed by the coin type it was looked up under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    pub coin_type: String,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default, alias = "displayName")]
    pub name: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedBalanceChange {
    #[serde(flatten)]
    pub change: BalanceChange,
    /// `None` when `amount` is not an integer string.
    pub amount_human_readable: Option<String>,
    pub amount_symbol: String,
    pub amount_name: String,
    pub amount_icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedObjectChange {
    #[serde(flatten)]
    pub change: ObjectChange,
    pub coin_type: Option<String>,
    pub coin_symbol: Option<String>,
    pub coin_name: Option<String>,
    pub coin_icon_url: Option<String>,
}

/// `<field>InSui` is absent when the field is absent and `null` when the field is not an
/// integer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedGasCostSummary {
    #[serde(flatten)]
    pub gas: GasCostSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computation_cost_in_mist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub computation_cost_in_sui: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_cost_in_mist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_cost_in_sui: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_rebate_in_mist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_rebate_in_sui: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_refundable_storage_fee_in_mist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_refundable_storage_fee_in_sui: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedEffects {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used: Option<AnnotatedGasCostSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_used_formatted: Option<GasUsageSummary>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The transaction record with its four annotated substructures swapped in.
/// Events keep their own shape; only their `parsedJson` gains sibling fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance_changes: Option<Vec<AnnotatedBalanceChange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_changes: Option<Vec<AnnotatedObjectChange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<SuiEvent>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<AnnotatedEffects>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Copy of `extra` without the given keys. Used so a record that already carries
/// derived fields does not serialize them twice after re-annotation.
pub(crate) fn without_keys(extra: &Map<String, Value>, keys: &[&str]) -> Map<String, Value> {
    extra
        .iter()
        .filter(|(key, _)| !keys.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Strings as-is, numbers in decimal form, anything else as `None`.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_opt_string(deserializer)?.unwrap_or_default())
}
