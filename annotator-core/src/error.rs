use thiserror::Error;

/// Failures surfaced by the fallible parts of the pipeline.
///
/// Annotation itself never fails; these cover the exact gas summary, the explain request
/// builder, metadata sources and (de)serialization at the edges.
#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("Missing raw transaction data")]
    EmptyPayload,

    #[error("Invalid amount for {field}: {value:?}")]
    InvalidAmount { field: String, value: String },

    #[error("Amount overflow while computing {0}")]
    AmountOverflow(String),

    #[error("Metadata source failed for {coin_type}: {message}")]
    MetadataSource { coin_type: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnnotateError {
    pub fn invalid_amount(field: &str, value: impl Into<String>) -> Self {
        Self::InvalidAmount {
            field: field.to_string(),
            value: value.into(),
        }
    }

    pub fn metadata_source(coin_type: &str, message: impl Into<String>) -> Self {
        Self::MetadataSource {
            coin_type: coin_type.to_string(),
            message: message.into(),
        }
    }
}
