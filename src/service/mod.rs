use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    auth::{CredentialError, JwtTokenIssuer, TokenIssuer},
    command::CommandError,
    config::LedgerConfig,
    statement::BalanceError,
    store::{
        StatementStore, StoreError, UserStore,
        in_memory::{InMemoryStatementStore, InMemoryUserStore},
    },
};

pub mod statements;
pub mod users;

pub use statements::{BalanceSummary, StatementService};
pub use users::{Session, UserService};

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("User not found")]
    UserNotFound,
    #[error("A user with this email already exists")]
    DuplicateEmail,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Deposit cannot be added to the balance exactly")]
    BalanceOverflow,
    #[error("Statement not found")]
    StatementNotFound,
    #[error(transparent)]
    InvalidCommand(#[from] CommandError),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl LedgerError {
    /// True for rejections made by business rules on well-formed input.
    pub fn is_business(&self) -> bool {
        !matches!(
            self,
            LedgerError::InvalidCommand(_) | LedgerError::Store(_) | LedgerError::Credential(_)
        )
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(_) => LedgerError::DuplicateEmail,
            err => LedgerError::Store(err),
        }
    }
}

impl From<BalanceError> for LedgerError {
    fn from(err: BalanceError) -> Self {
        match err {
            BalanceError::InsufficientFunds {
                requested,
                available,
            } => LedgerError::InsufficientFunds {
                requested,
                available,
            },
            BalanceError::Overflow { .. } => LedgerError::BalanceOverflow,
        }
    }
}

/// Every use case, wired against one pair of stores.
pub struct Ledger {
    pub users: UserService,
    pub statements: StatementService,
}

impl Ledger {
    pub fn new(
        users: Arc<dyn UserStore>,
        statements: Arc<dyn StatementStore>,
        tokens: Arc<dyn TokenIssuer>,
        config: &LedgerConfig,
    ) -> Self {
        Self {
            users: UserService::new(users.clone(), tokens, config.password_hash_cost),
            statements: StatementService::new(users, statements),
        }
    }

    pub fn in_memory(config: &LedgerConfig) -> Self {
        Self::new(
            Arc::new(InMemoryUserStore::new()),
            Arc::new(InMemoryStatementStore::new()),
            Arc::new(JwtTokenIssuer::new(
                config.token_secret.as_bytes(),
                config.token_ttl,
            )),
            config,
        )
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use time::Duration;

    use super::*;

    pub(crate) fn test_config() -> LedgerConfig {
        LedgerConfig {
            token_secret: "test secret".to_string(),
            token_ttl: Duration::hours(1),
            password_hash_cost: 4,
        }
    }

    #[test]
    fn store_errors_map_to_business_errors() {
        let err = LedgerError::from(StoreError::DuplicateEmail("a@example.com".to_string()));
        assert!(matches!(err, LedgerError::DuplicateEmail));
        assert!(err.is_business());

        let err = LedgerError::from(StoreError::Poisoned);
        assert!(matches!(err, LedgerError::Store(StoreError::Poisoned)));
        assert!(!err.is_business());

        let err = LedgerError::from(CommandError::EmptyName);
        assert!(!err.is_business());
    }

    #[test]
    fn balance_errors_keep_amounts() {
        let err = LedgerError::from(BalanceError::InsufficientFunds {
            requested: Decimal::ONE,
            available: Decimal::ZERO,
        });
        assert_eq!(
            err.to_string(),
            "Insufficient funds: requested 1, available 0"
        );
    }
}
