use std::path::PathBuf;

use clap::{Parser, Subcommand};
use dotenv::dotenv;

#[derive(Parser, Debug)]
#[command(author, version, about = "Annotate Sui transactions with human readable coin data", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the coin types a transaction references
    CoinTypes {
        /// Transaction JSON (bare block or full JSON-RPC response)
        #[arg(long)]
        tx: PathBuf,

        /// Break the result down by where each type was found
        #[arg(long)]
        sources: bool,
    },

    /// Annotate a transaction
    Annotate {
        #[arg(long)]
        tx: PathBuf,

        /// Metadata records already fetched for this transaction
        #[arg(long, conflicts_with = "catalog", required_unless_present = "catalog")]
        metadata: Option<PathBuf>,

        /// Token registry export to look the transaction's coin types up in
        #[arg(long, env = "ANNOTATOR_CATALOG")]
        catalog: Option<PathBuf>,

        /// Attach the exact gas summary to the effects
        #[arg(long)]
        gas_summary: bool,

        #[arg(long)]
        pretty: bool,
    },

    /// Build the explain request for a digest
    Prepare {
        /// Digest or explorer URL
        #[arg(long)]
        digest: String,

        #[arg(long)]
        tx: PathBuf,

        #[arg(long, env = "ANNOTATOR_CATALOG")]
        catalog: PathBuf,

        /// Extra per-transaction metadata attached as `txnMetadataData`
        #[arg(long)]
        txn_metadata: Option<PathBuf>,
    },
}

pub fn load_cli() -> Cli {
    dotenv().ok();
    Cli::parse()
}
