pub mod balance_annotator;
pub mod coin_type;
pub mod collector;
pub mod config;
pub mod decimals;
pub mod error;
pub mod event_annotator;
pub mod explain;
pub mod extract;
pub mod gas_annotator;
pub mod metadata;
pub mod models;
pub mod object_annotator;
pub mod orchestrator;

pub use error::AnnotateError;
pub use extract::{extract_coin_types, CoinTypeSources};
pub use orchestrator::{annotate, Annotator};
