use std::sync::PoisonError;

use thiserror::Error;

use crate::{
    statement::{NewStatement, Statement, StatementId},
    user::{NewUser, User, UserId},
};

pub mod in_memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User with email `{0}` already exists")]
    DuplicateEmail(String),
    #[error("Store lock poisoned by a panicked writer")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(_: PoisonError<T>) -> Self {
        StoreError::Poisoned
    }
}

pub trait UserStore: Send + Sync {
    /// Fails with [`StoreError::DuplicateEmail`] if the email is taken.
    fn create(&self, user: NewUser) -> Result<User, StoreError>;
    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;
}

pub trait StatementStore: Send + Sync {
    /// Appends a statement with a fresh id and the current timestamp.
    fn create(&self, statement: NewStatement) -> Result<Statement, StoreError>;
    /// User's statements in insertion order.
    fn list_by_user(&self, user_id: UserId) -> Result<Vec<Statement>, StoreError>;
    fn find_by_id(&self, id: StatementId) -> Result<Option<Statement>, StoreError>;
}
