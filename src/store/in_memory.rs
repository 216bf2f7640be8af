use std::{collections::HashMap, sync::RwLock};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    statement::{NewStatement, Statement, StatementId},
    user::{NewUser, User, UserId},
};

use super::{StatementStore, StoreError, UserStore};

#[derive(Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
}

#[derive(Default)]
pub struct InMemoryUserStore {
    table: RwLock<UserTable>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut table = self.table.write()?;
        if table.by_email.contains_key(&user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            created_at: OffsetDateTime::now_utc(),
        };
        table.by_email.insert(user.email.clone(), user.id);
        table.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let table = self.table.read()?;
        Ok(table
            .by_email
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.table.read()?.users.get(&id).cloned())
    }
}

#[derive(Default)]
struct StatementTable {
    // insertion order
    rows: Vec<Statement>,
    by_id: HashMap<StatementId, usize>,
    by_user: HashMap<UserId, Vec<usize>>,
}

#[derive(Default)]
pub struct InMemoryStatementStore {
    table: RwLock<StatementTable>,
}

impl InMemoryStatementStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatementStore for InMemoryStatementStore {
    fn create(&self, statement: NewStatement) -> Result<Statement, StoreError> {
        let statement = Statement {
            id: Uuid::new_v4(),
            user_id: statement.user_id,
            kind: statement.kind,
            amount: statement.amount,
            description: statement.description,
            created_at: OffsetDateTime::now_utc(),
        };

        let mut table = self.table.write()?;
        let row = table.rows.len();
        table.by_id.insert(statement.id, row);
        table.by_user.entry(statement.user_id).or_default().push(row);
        table.rows.push(statement.clone());
        Ok(statement)
    }

    fn list_by_user(&self, user_id: UserId) -> Result<Vec<Statement>, StoreError> {
        let table = self.table.read()?;
        Ok(table
            .by_user
            .get(&user_id)
            .map(|rows| rows.iter().map(|&row| table.rows[row].clone()).collect())
            .unwrap_or_default())
    }

    fn find_by_id(&self, id: StatementId) -> Result<Option<Statement>, StoreError> {
        let table = self.table.read()?;
        Ok(table.by_id.get(&id).map(|&row| table.rows[row].clone()))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::{Decimal, prelude::FromPrimitive};

    use crate::statement::OperationType;

    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: "Test User".to_string(),
            password_hash: "$2b$04$notarealhash".to_string(),
        }
    }

    fn new_statement(user_id: UserId, kind: OperationType, amount: u32) -> NewStatement {
        NewStatement {
            user_id,
            kind,
            amount: Decimal::from_u32(amount).unwrap(),
            description: format!("{kind:?} {amount}"),
        }
    }

    #[test]
    fn create_and_find_users() {
        let store = InMemoryUserStore::new();
        let user = store.create(new_user("a@example.com")).unwrap();
        assert_eq!(user.email, "a@example.com");

        assert_eq!(store.find_by_id(user.id).unwrap(), Some(user.clone()));
        assert_eq!(
            store.find_by_email("a@example.com").unwrap(),
            Some(user.clone())
        );
        // emails are matched as stored
        assert_eq!(store.find_by_email("A@example.com").unwrap(), None);
        assert_eq!(store.find_by_id(Uuid::new_v4()).unwrap(), None);
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let store = InMemoryUserStore::new();
        let first = store.create(new_user("a@example.com")).unwrap();
        let err = store.create(new_user("a@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "a@example.com"));

        // the original record is untouched
        assert_eq!(
            store.find_by_email("a@example.com").unwrap().unwrap().id,
            first.id
        );
    }

    #[test]
    fn statements_are_listed_per_user_in_insertion_order() {
        let store = InMemoryStatementStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let s1 = store
            .create(new_statement(alice, OperationType::Deposit, 10))
            .unwrap();
        let s2 = store
            .create(new_statement(bob, OperationType::Deposit, 20))
            .unwrap();
        let s3 = store
            .create(new_statement(alice, OperationType::Withdraw, 5))
            .unwrap();
        assert_ne!(s1.id, s3.id);

        let alice_history = store.list_by_user(alice).unwrap();
        assert_eq!(alice_history, vec![s1.clone(), s3]);
        assert_eq!(store.list_by_user(bob).unwrap(), vec![s2.clone()]);
        assert!(store.list_by_user(Uuid::new_v4()).unwrap().is_empty());

        assert_eq!(store.find_by_id(s2.id).unwrap(), Some(s2));
        assert_eq!(store.find_by_id(Uuid::new_v4()).unwrap(), None);
        assert_eq!(s1.description, "Deposit 10");
    }
}
