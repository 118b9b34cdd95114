mod cli;

use std::path::Path;

use annotator_core::{
    collector::{CatalogSource, MetadataCollector},
    config::AnnotatorConfig,
    explain::build_explain_request,
    models::{TokenMetadata, TransactionRecord},
    Annotator,
};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

use crate::cli::{load_cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = load_cli();

    // stdout carries the JSON output, logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = AnnotatorConfig::from_env()?;
    tracing::debug!("Starting annotator with config: {:?}", config.runtime);

    let output = run(cli.command, config).await?;
    println!("{output}");

    Ok(())
}

async fn run(command: Command, config: AnnotatorConfig) -> Result<String> {
    match command {
        Command::CoinTypes { tx, sources } => {
            let tx = read_transaction(&tx).await?;
            let annotator = Annotator::new(config.annotation);

            let value = if sources {
                let sources = annotator.coin_type_sources(&tx);
                json!({ "coinTypes": sources.all(), "sources": sources })
            } else {
                json!(annotator.coin_types(&tx))
            };
            Ok(serde_json::to_string_pretty(&value)?)
        }

        Command::Annotate {
            tx,
            metadata,
            catalog,
            gas_summary,
            pretty,
        } => {
            let tx = read_transaction(&tx).await?;
            let mut annotation = config.annotation.clone();
            annotation.include_gas_summary |= gas_summary;
            let annotator = Annotator::new(annotation);

            let metadata = match (metadata, catalog) {
                (Some(path), _) => read_metadata(&path).await?,
                (None, Some(path)) => collect_from_catalog(&annotator, &tx, &path, &config).await?,
                (None, None) => Vec::new(),
            };

            let annotated = annotator.annotate(&tx, &metadata);
            let rendered = if pretty {
                serde_json::to_string_pretty(&annotated)?
            } else {
                serde_json::to_string(&annotated)?
            };
            Ok(rendered)
        }

        Command::Prepare {
            digest,
            tx,
            catalog,
            txn_metadata,
        } => {
            let tx = read_transaction(&tx).await?;
            let annotator = Annotator::new(config.annotation.clone());

            let metadata = collect_from_catalog(&annotator, &tx, &catalog, &config).await?;
            let annotated = annotator.annotate(&tx, &metadata);

            let txn_metadata = match txn_metadata {
                Some(path) => Some(read_json(&path).await?),
                None => None,
            };

            let request = build_explain_request(&digest, &annotated, txn_metadata.as_ref())?;
            Ok(serde_json::to_string_pretty(&request)?)
        }
    }
}

async fn collect_from_catalog(
    annotator: &Annotator,
    tx: &TransactionRecord,
    catalog: &Path,
    config: &AnnotatorConfig,
) -> Result<Vec<TokenMetadata>> {
    let source = CatalogSource::from_path(catalog)
        .await
        .with_context(|| format!("failed to load catalog {}", catalog.display()))?;
    tracing::info!("Loaded {} catalog entries from {}", source.len(), catalog.display());

    let collector = MetadataCollector::new(source, &config.metadata);
    Ok(collector.collect(annotator.coin_types(tx)).await)
}

async fn read_json(path: &Path) -> Result<Value> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid JSON in {}", path.display()))
}

async fn read_transaction(path: &Path) -> Result<TransactionRecord> {
    let value = read_json(path).await?;
    Ok(TransactionRecord::from_rpc_value(value)?)
}

async fn read_metadata(path: &Path) -> Result<Vec<TokenMetadata>> {
    let value = read_json(path).await?;
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const DIGEST: &str = "FwyP3d8Xq1Vb7KmN2pLs9TqWc4RzYh6GjE5aUo8BxD";

    struct Fixtures {
        dir: PathBuf,
    }

    impl Fixtures {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!("annotator-bin-{name}-{}", std::process::id()));
            std::fs::create_dir_all(&dir).unwrap();

            std::fs::write(
                dir.join("tx.json"),
                json!({
                    "jsonrpc": "2.0",
                    "id": 1,
                    "result": {
                        "digest": DIGEST,
                        "balanceChanges": [
                            { "owner": { "AddressOwner": "0xa" }, "coinType": "0x2::sui::SUI", "amount": "-2500000000" }
                        ],
                        "effects": { "gasUsed": { "computationCost": "180000", "storageCost": "0", "storageRebate": "0" } }
                    }
                })
                .to_string(),
            )
            .unwrap();
            std::fs::write(
                dir.join("catalog.json"),
                json!([{ "coinType": "0x2::sui::SUI", "symbol": "SUI", "name": "Sui", "decimals": 9 }]).to_string(),
            )
            .unwrap();

            Self { dir }
        }

        fn path(&self, file: &str) -> PathBuf {
            self.dir.join(file)
        }
    }

    impl Drop for Fixtures {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.dir);
        }
    }

    fn quiet_config() -> AnnotatorConfig {
        let mut config = AnnotatorConfig::default();
        config.metadata.request_delay_ms = 0;
        config
    }

    #[tokio::test]
    async fn test_run_coin_types() {
        let fixtures = Fixtures::new("coin-types");

        let output = run(
            Command::CoinTypes {
                tx: fixtures.path("tx.json"),
                sources: true,
            },
            quiet_config(),
        )
        .await
        .unwrap();

        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["coinTypes"], json!(["0x2::sui::SUI"]));
        assert_eq!(value["sources"]["fromBalanceChanges"], json!(["0x2::sui::SUI"]));
    }

    #[tokio::test]
    async fn test_run_annotate_with_catalog() {
        let fixtures = Fixtures::new("annotate");

        let output = run(
            Command::Annotate {
                tx: fixtures.path("tx.json"),
                metadata: None,
                catalog: Some(fixtures.path("catalog.json")),
                gas_summary: true,
                pretty: false,
            },
            quiet_config(),
        )
        .await
        .unwrap();

        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["balanceChanges"][0]["amountHumanReadable"], "-2.500000");
        assert_eq!(value["balanceChanges"][0]["amountName"], "Sui");
        assert_eq!(value["effects"]["gasUsedFormatted"]["totalGasUsedInSui"], "0.000180 SUI");
    }

    #[tokio::test]
    async fn test_run_prepare() {
        let fixtures = Fixtures::new("prepare");

        let output = run(
            Command::Prepare {
                digest: format!("https://suiscan.xyz/mainnet/tx/{DIGEST}"),
                tx: fixtures.path("tx.json"),
                catalog: fixtures.path("catalog.json"),
                txn_metadata: None,
            },
            quiet_config(),
        )
        .await
        .unwrap();

        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["digest"], DIGEST);
        let raw: Value = serde_json::from_str(value["rawText"].as_str().unwrap()).unwrap();
        assert_eq!(raw["balanceChanges"][0]["amountSymbol"], "SUI");
    }

    #[tokio::test]
    async fn test_run_reports_missing_file() {
        let err = run(
            Command::CoinTypes {
                tx: PathBuf::from("/nonexistent/tx.json"),
                sources: false,
            },
            quiet_config(),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("failed to read"));
    }
}
