use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use klay_cli::{combine_command, decode_command, hash_command, sign_command, SignRequest};
use klay_types::TxType;

/// Encode, sign and combine transactions offline.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Raise log output to debug
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Kind {
    ValueTransfer,
    ValueTransferMemo,
    SmartContractExecution,
    Cancel,
    ChainDataAnchoring,
}

impl From<Kind> for TxType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::ValueTransfer => TxType::ValueTransfer,
            Kind::ValueTransferMemo => TxType::ValueTransferMemo,
            Kind::SmartContractExecution => TxType::SmartContractExecution,
            Kind::Cancel => TxType::Cancel,
            Kind::ChainDataAnchoring => TxType::ChainDataAnchoring,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decode a raw transaction and print its fields as JSON
    Decode { raw: String },
    /// Print the transaction hash of a raw transaction
    Hash { raw: String },
    /// Build and sign a transaction
    Sign {
        #[arg(long, value_enum)]
        kind: Kind,
        /// Private key or wallet key
        #[arg(long, env = "KLAY_PRIVATE_KEY", hide_env_values = true)]
        key: String,
        /// Sender; defaults to the key's address
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        input: Option<String>,
        #[arg(long)]
        nonce: Option<String>,
        #[arg(long)]
        gas: String,
        #[arg(long)]
        gas_price: Option<String>,
        #[arg(long, env = "KLAY_CHAIN_ID")]
        chain_id: Option<String>,
        /// Sign with only this key of the transaction role
        #[arg(long)]
        index: Option<usize>,
    },
    /// Merge the signatures of several raw transactions into the first
    Combine {
        #[arg(required = true)]
        raws: Vec<String>,
    },
}

fn init_tracing(verbose: u8) {
    let level = if verbose > 0 { "debug" } else { "info" };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = match cli.command {
        Command::Decode { raw } => serde_json::to_string_pretty(&decode_command(&raw)?)?,
        Command::Hash { raw } => hash_command(&raw)?,
        Command::Sign {
            kind,
            key,
            from,
            to,
            value,
            input,
            nonce,
            gas,
            gas_price,
            chain_id,
            index,
        } => {
            let req = SignRequest {
                kind: kind.into(),
                key,
                from,
                to,
                value,
                input,
                nonce,
                gas,
                gas_price,
                chain_id,
                index,
            };
            serde_json::to_string_pretty(&sign_command(&req)?)?
        }
        Command::Combine { raws } => serde_json::to_string_pretty(&combine_command(&raws)?)?,
    };
    println!("{output}");
    Ok(())
}
