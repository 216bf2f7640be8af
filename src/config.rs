use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;
use time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "statement-ledger",
    about = "Replays register/deposit/withdraw operations and prints user balances"
)]
pub struct CliArgs {
    /// CSV file with operations
    pub input: PathBuf,

    /// Secret used to sign session tokens
    #[arg(long, env = "LEDGER_TOKEN_SECRET", hide_env_values = true)]
    pub token_secret: String,

    /// Session token lifetime in hours
    #[arg(long, default_value_t = 24)]
    pub token_ttl_hours: i64,

    /// bcrypt cost factor for password hashes
    #[arg(long, default_value_t = bcrypt::DEFAULT_COST)]
    pub hash_cost: u32,

    /// Log level filter, overridden by RUST_LOG when set
    #[arg(short, long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Token secret must not be empty")]
    EmptySecret,
    #[error("Token lifetime must be positive, got {0} hours")]
    NonPositiveTtl(i64),
    #[error("bcrypt cost must be within 4..=31, got {0}")]
    HashCostOutOfRange(u32),
}

/// Runtime settings shared by the services.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    pub token_secret: String,
    pub token_ttl: Duration,
    pub password_hash_cost: u32,
}

impl LedgerConfig {
    pub fn from_args(args: &CliArgs) -> Result<Self, ConfigError> {
        if args.token_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if args.token_ttl_hours <= 0 {
            return Err(ConfigError::NonPositiveTtl(args.token_ttl_hours));
        }
        if !(4..=31).contains(&args.hash_cost) {
            return Err(ConfigError::HashCostOutOfRange(args.hash_cost));
        }
        Ok(Self {
            token_secret: args.token_secret.clone(),
            token_ttl: Duration::hours(args.token_ttl_hours),
            password_hash_cost: args.hash_cost,
        })
    }
}
