use rust_decimal::{Decimal, prelude::Zero};
use thiserror::Error;

use crate::{statement::OperationType, user::UserId};

/// Amounts are currency minor units: at most this many decimal places.
pub const MAX_AMOUNT_SCALE: u32 = 2;

#[derive(Debug, Clone)]
pub struct CreateStatementCommand {
    pub user_id: UserId,
    pub kind: OperationType,
    pub amount: Decimal,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Amount must be positive for {kind:?}, got {amount}")]
    NonPositiveAmount { kind: OperationType, amount: Decimal },
    #[error("Amount {amount} has more than {} decimal places", MAX_AMOUNT_SCALE)]
    TooManyDecimals { amount: Decimal },
    #[error("Email `{0}` is not a valid address")]
    InvalidEmail(String),
    #[error("Name must not be empty")]
    EmptyName,
    #[error("Password must not be empty")]
    EmptyPassword,
}

impl CreateStatementCommand {
    pub fn parse(
        user_id: UserId,
        kind: OperationType,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<Self, CommandError> {
        if amount <= Decimal::zero() {
            return Err(CommandError::NonPositiveAmount { kind, amount });
        }
        // trailing zeros do not count: 1.50 is as good as 1.5
        if amount.normalize().scale() > MAX_AMOUNT_SCALE {
            return Err(CommandError::TooManyDecimals { amount });
        }
        Ok(Self {
            user_id,
            kind,
            amount,
            description: description.into(),
        })
    }
}

impl CreateUserCommand {
    pub fn parse(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, CommandError> {
        let email = email.into();
        let name = name.into();
        let password = password.into();

        // shape only: local@domain
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
            None => false,
        };
        if !valid_email {
            return Err(CommandError::InvalidEmail(email));
        }
        if name.trim().is_empty() {
            return Err(CommandError::EmptyName);
        }
        if password.is_empty() {
            return Err(CommandError::EmptyPassword);
        }
        Ok(Self {
            email,
            name,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::FromPrimitive;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn parse_statement_command() {
        let user_id = Uuid::new_v4();
        let cmd = CreateStatementCommand::parse(
            user_id,
            OperationType::Deposit,
            Decimal::from_u32(100).unwrap(),
            "salary",
        )
        .unwrap();
        assert_eq!(cmd.user_id, user_id);
        assert_eq!(cmd.amount, Decimal::from_u32(100).unwrap());
        assert_eq!(cmd.description, "salary");

        let err = CreateStatementCommand::parse(
            user_id,
            OperationType::Withdraw,
            Decimal::zero(),
            "nothing",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CommandError::NonPositiveAmount {
                kind: OperationType::Withdraw,
                ..
            }
        ));

        let err = CreateStatementCommand::parse(
            user_id,
            OperationType::Deposit,
            Decimal::from_i32(-5).unwrap(),
            "negative",
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Amount must be positive for Deposit, got -5"
        );
    }

    #[test]
    fn amount_is_limited_to_minor_units() {
        let user_id = Uuid::new_v4();
        let cmd =
            CreateStatementCommand::parse(user_id, OperationType::Deposit, Decimal::new(1050, 2), "")
                .unwrap();
        assert_eq!(cmd.amount, Decimal::new(1050, 2));

        // 1.5000 normalizes to 1.5
        assert!(
            CreateStatementCommand::parse(user_id, OperationType::Deposit, Decimal::new(15000, 4), "")
                .is_ok()
        );

        let tiny = Decimal::new(6, 28);
        let err = CreateStatementCommand::parse(user_id, OperationType::Deposit, tiny, "")
            .unwrap_err();
        assert_eq!(err, CommandError::TooManyDecimals { amount: tiny });

        let err = CreateStatementCommand::parse(
            user_id,
            OperationType::Withdraw,
            Decimal::new(1001, 3),
            "",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Amount 1.001 has more than 2 decimal places");
    }

    #[test]
    fn parse_user_command() {
        let cmd = CreateUserCommand::parse("Jane@Example.com", "Jane", "hunter2").unwrap();
        // stored as given
        assert_eq!(cmd.email, "Jane@Example.com");

        assert_eq!(
            CreateUserCommand::parse("jane.example.com", "Jane", "pw").unwrap_err(),
            CommandError::InvalidEmail("jane.example.com".to_string())
        );
        assert_eq!(
            CreateUserCommand::parse("@example.com", "Jane", "pw").unwrap_err(),
            CommandError::InvalidEmail("@example.com".to_string())
        );
        assert_eq!(
            CreateUserCommand::parse("jane@example.com", "  ", "pw").unwrap_err(),
            CommandError::EmptyName
        );
        assert_eq!(
            CreateUserCommand::parse("jane@example.com", "Jane", "").unwrap_err(),
            CommandError::EmptyPassword
        );
    }
}
