use rust_decimal::Decimal;
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{command::CreateStatementCommand, user::UserId};

pub type StatementId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Deposit,
    Withdraw,
}

/// Append-only record of a single deposit or withdrawal.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub id: StatementId,
    pub user_id: UserId,
    pub kind: OperationType,
    pub amount: Decimal,
    pub description: String,
    pub created_at: OffsetDateTime,
}

/// Statement accepted by [`Balance::handle_new_statement`], not yet persisted.
/// The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewStatement {
    pub user_id: UserId,
    pub kind: OperationType,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BalanceError {
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Deposit of {amount} cannot be added to the balance exactly")]
    Overflow { amount: Decimal },
}

/// Net sum of a user's statements.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Balance(Decimal);

impl Balance {
    pub fn from_statements<'a>(history: impl IntoIterator<Item = &'a Statement>) -> Self {
        history.into_iter().fold(Self::default(), |mut balance, st| {
            balance.apply(st);
            balance
        })
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn apply(&mut self, statement: &Statement) {
        match statement.kind {
            OperationType::Deposit => {
                self.0 += statement.amount;
            }
            OperationType::Withdraw => {
                self.0 -= statement.amount;
            }
        }
    }

    pub fn handle_new_statement(
        &self,
        command: CreateStatementCommand,
    ) -> Result<NewStatement, BalanceError> {
        match command.kind {
            OperationType::Deposit => {
                // checked_add only catches overflow; past 28 significant
                // digits the sum is rounded, so verify it round-trips
                let exact = self
                    .0
                    .checked_add(command.amount)
                    .and_then(|sum| sum.checked_sub(self.0))
                    .is_some_and(|added| added == command.amount);
                if !exact {
                    return Err(BalanceError::Overflow {
                        amount: command.amount,
                    });
                }
            }
            OperationType::Withdraw => {
                if command.amount > self.0 {
                    return Err(BalanceError::InsufficientFunds {
                        requested: command.amount,
                        available: self.0,
                    });
                }
            }
        }
        Ok(NewStatement {
            user_id: command.user_id,
            kind: command.kind,
            amount: command.amount,
            description: command.description,
        })
    }
}
