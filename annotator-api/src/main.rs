mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use annotator_core::{
    config::AnnotatorConfig,
    explain::{build_explain_request, ExplainRequest},
    models::{AnnotatedTransaction, TokenMetadata, TransactionRecord},
    Annotator, CoinTypeSources,
};
use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::error::ApiError;

#[derive(Clone)]
struct AppState {
    annotator: Arc<Annotator>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateBody {
    transaction: JsonValue,
    #[serde(default)]
    metadata: Vec<TokenMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplainBody {
    digest: String,
    transaction: JsonValue,
    #[serde(default)]
    metadata: Vec<TokenMetadata>,
    #[serde(default)]
    txn_metadata: Option<JsonValue>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CoinTypesResponse {
    coin_types: BTreeSet<String>,
    sources: CoinTypeSources,
}

async fn health() -> &'static str {
    "ok"
}

async fn coin_types_handler(
    State(state): State<AppState>,
    body: Result<Json<JsonValue>, JsonRejection>,
) -> Result<Json<CoinTypesResponse>, ApiError> {
    let Json(transaction) = body?;
    let tx = TransactionRecord::from_rpc_value(transaction)?;

    let sources = state.annotator.coin_type_sources(&tx);
    Ok(Json(CoinTypesResponse {
        coin_types: sources.all(),
        sources,
    }))
}

async fn annotate_handler(
    State(state): State<AppState>,
    body: Result<Json<AnnotateBody>, JsonRejection>,
) -> Result<Json<AnnotatedTransaction>, ApiError> {
    let Json(body) = body?;
    let tx = TransactionRecord::from_rpc_value(body.transaction)?;

    Ok(Json(state.annotator.annotate(&tx, &body.metadata)))
}

async fn explain_request_handler(
    State(state): State<AppState>,
    body: Result<Json<ExplainBody>, JsonRejection>,
) -> Result<Json<ExplainRequest>, ApiError> {
    let Json(body) = body?;
    let tx = TransactionRecord::from_rpc_value(body.transaction)?;

    let annotated = state.annotator.annotate(&tx, &body.metadata);
    let request = build_explain_request(&body.digest, &annotated, body.txn_metadata.as_ref())?;
    tracing::info!("Prepared explain request for {}", request.digest);

    Ok(Json(request))
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/coin-types", post(coin_types_handler))
        .route("/annotate", post(annotate_handler))
        .route("/explain-request", post(explain_request_handler))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AnnotatorConfig::from_env()?;
    tracing::info!("Starting annotator API with config: {:?}", config.runtime);

    let state = AppState {
        annotator: Arc::new(Annotator::new(config.annotation.clone())),
    };
    let app = router(state);

    let addr: SocketAddr = config.api.bind_addr.parse()?;
    tracing::info!("Starting API server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
