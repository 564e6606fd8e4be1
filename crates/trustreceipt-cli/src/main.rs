//! Trust receipt CLI - command-line verification of AI trust receipts.

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

#[cfg(feature = "dev-tools")]
use commands::sign;
use commands::{canonicalize, signature, verify};

/// Exit code for usage errors and unreadable or malformed input.
const EXIT_USAGE: i32 = 2;

#[derive(Parser)]
#[command(name = "receipt-verify")]
#[command(about = "Offline verification of AI trust receipts")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Log check outcomes to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Receipt JSON file; checks only its signature
    receipt: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify only the receipt signature
    Signature {
        /// Receipt JSON file
        receipt: String,
        /// Accept `alg` in any letter case
        #[arg(long)]
        alg_case_insensitive: bool,
    },
    /// Run every check and compute the trust score
    Verify(verify::VerifyArgs),
    /// Show the canonical signed message and its digest
    Canonicalize {
        /// Receipt JSON file (or stdin if not provided)
        receipt: Option<String>,
    },
    /// Sign a receipt with a raw Ed25519 seed (development only)
    #[cfg(feature = "dev-tools")]
    Sign {
        /// Receipt JSON file
        receipt: String,
        /// 32-byte Ed25519 seed as 64 hex characters
        #[arg(long)]
        seed_hex: String,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Some(Commands::Signature {
            receipt,
            alg_case_insensitive,
        }) => signature::run(receipt, alg_case_insensitive),
        Some(Commands::Verify(args)) => verify::run(args),
        Some(Commands::Canonicalize { receipt }) => canonicalize::run(receipt),
        #[cfg(feature = "dev-tools")]
        Some(Commands::Sign { receipt, seed_hex }) => sign::run(receipt, seed_hex),
        None => match cli.receipt {
            Some(receipt) => signature::run(receipt, false),
            None => Cli::command()
                .error(
                    ErrorKind::MissingRequiredArgument,
                    "a receipt file or a subcommand is required",
                )
                .exit(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_USAGE);
    }
}
