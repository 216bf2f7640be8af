use std::fs::File;

use anyhow::{Context, Result};
use clap::Parser;
use statement_ledger::{
    bin_utils::{OperationError, Service},
    config::{CliArgs, LedgerConfig},
    service::Ledger,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    // stdout carries the CSV report
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let config = LedgerConfig::from_args(&args).context("Invalid configuration")?;
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open `{}`", args.input.display()))?;

    let service = Service {
        input: file,
        output: &mut std::io::stdout(),
        ledger: Ledger::in_memory(&config),
        error_printer: Box::new(|line: u64, err: OperationError| {
            if err.is_business() {
                // rejected by the ledger, the input itself was fine
                tracing::warn!(line, %err, "Operation rejected");
            } else {
                eprintln!("Error at line {line}: {err}")
            }
        }),
    };
    service.run()
}
