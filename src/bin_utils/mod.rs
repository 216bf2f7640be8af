//! This module could be a separate crate on its own, to bootstrap [`statement_ledger`] within
//! binary, but for simplicity the binary and the integration tests share it from here.

use std::io::{Read, Write};

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::{
    service::{Ledger, LedgerError},
    user::UserId,
};
use csv_parser::{CsvOperationParser, Operation, OperationKind};
use csv_printer::{UserBalance, print_balances};

pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("Malformed row: {0}")]
    Parse(#[from] csv::Error),
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: OperationKind },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl OperationError {
    pub fn is_business(&self) -> bool {
        matches!(self, OperationError::Ledger(err) if err.is_business())
    }
}

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub ledger: Ledger,
    pub error_printer: Box<dyn FnMut(u64, OperationError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvOperationParser::new(self.input);
        let mut registered = Vec::new();

        for (line, row) in parser {
            let result = row
                .map_err(OperationError::from)
                .and_then(|op| apply_operation(&self.ledger, op, &mut registered));
            if let Err(err) = result {
                (self.error_printer)(line, err);
            }
        }

        let mut balances = Vec::with_capacity(registered.len());
        for user_id in registered {
            let user = self.ledger.users.show_user_profile(user_id)?;
            let summary = self.ledger.statements.get_balance(user_id)?;
            balances.push(UserBalance {
                email: user.email,
                name: user.name,
                balance: summary.balance,
                statements: summary.statements.len(),
            });
        }
        print_balances(self.output, balances.into_iter())
    }
}

/// Statement operations go through the same login and token check a remote
/// caller would.
fn apply_operation(
    ledger: &Ledger,
    op: Operation,
    registered: &mut Vec<UserId>,
) -> Result<(), OperationError> {
    let Some(kind) = op.kind.statement_type() else {
        let user = ledger
            .users
            .create_user(&op.email, &op.name, &op.password)?;
        registered.push(user.id);
        return Ok(());
    };

    let amount = op
        .amount
        .ok_or(OperationError::AmountRequired { kind: op.kind })?;
    let session = ledger.users.authenticate_user(&op.email, &op.password)?;
    let user_id = ledger.users.authorize(&session.token)?;
    let statement = ledger
        .statements
        .create_statement(
            user_id,
            kind,
            amount,
            op.description.as_deref().unwrap_or_default(),
        )?;
    debug!(statement_id = %statement.id, "Operation applied");
    Ok(())
}
