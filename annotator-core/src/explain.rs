// Explain request assembly: the digest plus the annotated transaction rendered as
// pretty-printed JSON, ready for the text-generation service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AnnotateError;
use crate::models::AnnotatedTransaction;

const MIN_DIGEST_LEN: usize = 40;
const MAX_DIGEST_LEN: usize = 50;

/// Key the per-transaction metadata is attached under in `rawText`.
pub const TXN_METADATA_KEY: &str = "txnMetadataData";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainRequest {
    pub digest: String,
    pub raw_text: String,
}

/// Accept a bare digest or an explorer URL ending in one.
pub fn normalize_digest_input(input: &str) -> &str {
    let input = input.trim();
    if !input.contains('/') {
        return input;
    }

    let last_segment = input.rsplit('/').next().unwrap_or(input);
    let without_query = last_segment.split('?').next().unwrap_or(last_segment);
    without_query.split('#').next().unwrap_or(without_query).trim()
}

/// 40 to 50 ASCII letters and digits.
pub fn is_valid_digest(digest: &str) -> bool {
    let digest = digest.trim();
    (MIN_DIGEST_LEN..=MAX_DIGEST_LEN).contains(&digest.len())
        && digest.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn build_explain_request(
    digest_input: &str,
    annotated: &AnnotatedTransaction,
    txn_metadata: Option<&Value>,
) -> Result<ExplainRequest, AnnotateError> {
    let digest = normalize_digest_input(digest_input);
    if !is_valid_digest(digest) {
        return Err(AnnotateError::InvalidDigest(digest.to_string()));
    }

    let mut payload = match serde_json::to_value(annotated)? {
        Value::Object(map) => map,
        _ => return Err(AnnotateError::EmptyPayload),
    };
    if payload.is_empty() {
        return Err(AnnotateError::EmptyPayload);
    }

    if let Some(meta) = txn_metadata {
        payload.insert(TXN_METADATA_KEY.to_string(), meta.clone());
    }

    Ok(ExplainRequest {
        digest: digest.to_string(),
        raw_text: serde_json::to_string_pretty(&Value::Object(payload))?,
    })
}
