use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

use crate::balance_annotator::annotate_balance_changes;
use crate::config::AnnotationConfig;
use crate::event_annotator::{infer_coin_side, EventAnnotator, SideStrategy};
use crate::extract::{extract_coin_types_with_depth, CoinTypeSources};
use crate::gas_annotator::{annotate_gas_used, summarize_gas};
use crate::metadata::MetadataIndex;
use crate::models::{without_keys, AnnotatedEffects, AnnotatedTransaction, TokenMetadata, TransactionRecord};
use crate::object_annotator::annotate_object_changes;

/// Runs the four annotators over one transaction. Cheap to clone and share; holds
/// settings only, the metadata index is built per call.
#[derive(Clone)]
pub struct Annotator {
    config: AnnotationConfig,
    side_strategy: SideStrategy,
}

impl fmt::Debug for Annotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Annotator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for Annotator {
    fn default() -> Self {
        Self::new(AnnotationConfig::default())
    }
}

impl Annotator {
    pub fn new(config: AnnotationConfig) -> Self {
        Self {
            config,
            side_strategy: infer_coin_side,
        }
    }

    pub fn with_side_strategy(mut self, side_strategy: SideStrategy) -> Self {
        self.side_strategy = side_strategy;
        self
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// Coin types the caller should fetch metadata for before calling [`Self::annotate`].
    pub fn coin_types(&self, tx: &TransactionRecord) -> BTreeSet<String> {
        extract_coin_types_with_depth(tx, self.config.max_payload_depth)
    }

    pub fn coin_type_sources(&self, tx: &TransactionRecord) -> CoinTypeSources {
        CoinTypeSources::from_transaction(tx, self.config.max_payload_depth)
    }

    pub fn annotate(&self, tx: &TransactionRecord, metadata: &[TokenMetadata]) -> AnnotatedTransaction {
        let index = MetadataIndex::build(metadata);
        debug!(
            "annotating transaction {:?} with {} metadata entries",
            tx.digest(),
            index.len()
        );
        self.annotate_with_index(tx, &index)
    }

    pub fn annotate_with_index(&self, tx: &TransactionRecord, index: &MetadataIndex) -> AnnotatedTransaction {
        let decimals = self.config.default_decimals;

        let balance_changes = tx
            .balance_changes
            .as_deref()
            .map(|changes| annotate_balance_changes(changes, index, decimals));

        let object_changes = tx
            .object_changes
            .as_deref()
            .map(|changes| annotate_object_changes(changes, index));

        let events = tx.events.as_deref().map(|events| {
            EventAnnotator::new(index, decimals)
                .with_side_strategy(self.side_strategy)
                .annotate_events(events)
        });

        let effects = tx.effects.as_ref().map(|effects| {
            let gas_used_formatted = match (&effects.gas_used, self.config.include_gas_summary) {
                (Some(gas), true) => match summarize_gas(gas) {
                    Ok(summary) => Some(summary),
                    Err(err) => {
                        warn!("skipping gas summary: {err}");
                        None
                    }
                },
                _ => None,
            };

            let extra = if gas_used_formatted.is_some() {
                without_keys(&effects.extra, &["gasUsedFormatted"])
            } else {
                effects.extra.clone()
            };

            AnnotatedEffects {
                gas_used: effects.gas_used.as_ref().map(annotate_gas_used),
                gas_used_formatted,
                extra,
            }
        });

        AnnotatedTransaction {
            balance_changes,
            object_changes,
            events,
            effects,
            extra: tx.extra.clone(),
        }
    }
}

/// Annotate with default settings.
pub fn annotate(tx: &TransactionRecord, metadata: &[TokenMetadata]) -> AnnotatedTransaction {
    Annotator::default().annotate(tx, metadata)
}
