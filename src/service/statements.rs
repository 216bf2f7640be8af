use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::{
    command::CreateStatementCommand,
    statement::{Balance, OperationType, Statement, StatementId},
    store::{StatementStore, UserStore},
    user::UserId,
};

use super::LedgerError;

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceSummary {
    pub balance: Decimal,
    pub statements: Vec<Statement>,
}

/// One write lock per user. The guarded value is `()`, so a poisoned lock
/// carries no broken state and is simply reclaimed.
#[derive(Default)]
struct UserLocks {
    locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
}

impl UserLocks {
    fn for_user(&self, user_id: UserId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(user_id).or_default().clone()
    }
}

pub struct StatementService {
    users: Arc<dyn UserStore>,
    statements: Arc<dyn StatementStore>,
    locks: UserLocks,
}

impl StatementService {
    pub fn new(users: Arc<dyn UserStore>, statements: Arc<dyn StatementStore>) -> Self {
        Self {
            users,
            statements,
            locks: UserLocks::default(),
        }
    }

    /// Records a deposit or withdrawal.
    ///
    /// Recording is serialized per user: reading the history, checking the
    /// balance and appending the new statement happen under that user's lock,
    /// so two withdrawals can never both spend the same funds.
    pub fn create_statement(
        &self,
        user_id: UserId,
        kind: OperationType,
        amount: Decimal,
        description: &str,
    ) -> Result<Statement, LedgerError> {
        let command = CreateStatementCommand::parse(user_id, kind, amount, description)?;
        self.ensure_user(user_id)?;

        let lock = self.locks.for_user(user_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let history = self.statements.list_by_user(user_id)?;
        let balance = Balance::from_statements(&history);
        let new_statement = balance.handle_new_statement(command).inspect_err(|err| {
            warn!(%user_id, %err, "Statement rejected");
        })?;

        let statement = self.statements.create(new_statement)?;
        info!(
            %user_id,
            statement_id = %statement.id,
            kind = ?statement.kind,
            amount = %statement.amount,
            "Statement recorded"
        );
        Ok(statement)
    }

    pub fn get_balance(&self, user_id: UserId) -> Result<BalanceSummary, LedgerError> {
        self.ensure_user(user_id)?;
        let statements = self.statements.list_by_user(user_id)?;
        let balance = Balance::from_statements(&statements).amount();
        debug!(%user_id, %balance, count = statements.len(), "Balance computed");
        Ok(BalanceSummary {
            balance,
            statements,
        })
    }

    /// A statement owned by someone else is reported as not found.
    pub fn get_statement_operation(
        &self,
        user_id: UserId,
        statement_id: StatementId,
    ) -> Result<Statement, LedgerError> {
        self.ensure_user(user_id)?;
        self.statements
            .find_by_id(statement_id)?
            .filter(|st| st.user_id == user_id)
            .ok_or(LedgerError::StatementNotFound)
    }

    fn ensure_user(&self, user_id: UserId) -> Result<(), LedgerError> {
        match self.users.find_by_id(user_id)? {
            Some(_) => Ok(()),
            None => Err(LedgerError::UserNotFound),
        }
    }
}
