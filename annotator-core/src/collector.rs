// Metadata collection.
// One lookup per coin type with a fixed delay between requests. Failed lookups are logged
// and skipped; annotation falls back to sentinels for the gaps.

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::MetadataConfig;
use crate::error::AnnotateError;
use crate::metadata::MetadataIndex;
use crate::models::TokenMetadata;

/// Anything that can answer "what is the metadata for this coin type".
pub trait CoinMetadataSource {
    fn fetch(&self, coin_type: &str) -> impl Future<Output = Result<Option<TokenMetadata>, AnnotateError>> + Send;
}

/// Metadata source backed by a pre-fetched list, e.g. a JSON export of a token registry.
#[derive(Debug, Clone, Default)]
pub struct CatalogSource {
    index: MetadataIndex,
}

impl CatalogSource {
    pub fn new(records: &[TokenMetadata]) -> Self {
        Self {
            index: MetadataIndex::build(records),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AnnotateError> {
        let records: Vec<TokenMetadata> = serde_json::from_str(json)?;
        Ok(Self::new(&records))
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AnnotateError> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl CoinMetadataSource for CatalogSource {
    async fn fetch(&self, coin_type: &str) -> Result<Option<TokenMetadata>, AnnotateError> {
        Ok(self.index.get(coin_type).cloned())
    }
}

pub struct MetadataCollector<S> {
    source: S,
    request_delay: Duration,
    native_coin_type: String,
}

impl<S: CoinMetadataSource> MetadataCollector<S> {
    pub fn new(source: S, config: &MetadataConfig) -> Self {
        Self {
            source,
            request_delay: Duration::from_millis(config.request_delay_ms),
            native_coin_type: config.native_coin_type.clone(),
        }
    }

    /// Type to ask the source for. Every spelling of the native coin
    /// (`2::sui::SUI`, long-form addresses, ...) is looked up as the canonical one.
    pub fn lookup_type_for<'a>(&'a self, coin_type: &'a str) -> &'a str {
        if coin_type.contains("::sui::SUI") {
            &self.native_coin_type
        } else {
            coin_type
        }
    }

    /// Fetch metadata for each coin type in order. Returned records are keyed by the
    /// coin type as discovered, not as looked up, so they match the transaction.
    pub async fn collect<I>(&self, coin_types: I) -> Vec<TokenMetadata>
    where
        I: IntoIterator<Item = String>,
    {
        let mut collected = Vec::new();
        let mut requests = 0usize;

        for coin_type in coin_types {
            if requests > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }
            requests += 1;

            let fetched = self.source.fetch(self.lookup_type_for(&coin_type)).await;
            match fetched {
                Ok(Some(mut meta)) => {
                    meta.coin_type = coin_type;
                    collected.push(meta);
                }
                Ok(None) => debug!("no metadata found for {coin_type}"),
                Err(err) => warn!("metadata lookup for {coin_type} failed: {err}"),
            }
        }

        info!(
            "collected metadata for {}/{} coin types",
            collected.len(),
            requests
        );
        collected
    }
}
