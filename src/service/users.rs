use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::{
    auth::{TokenIssuer, hash_password, verify_password},
    command::CreateUserCommand,
    store::UserStore,
    user::{NewUser, User, UserId},
};

use super::LedgerError;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub struct UserService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenIssuer>,
    hash_cost: u32,
    // verified against when the email is unknown, at the configured cost
    dummy_hash: OnceLock<String>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>, tokens: Arc<dyn TokenIssuer>, hash_cost: u32) -> Self {
        Self {
            users,
            tokens,
            hash_cost,
            dummy_hash: OnceLock::new(),
        }
    }

    pub fn create_user(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<User, LedgerError> {
        let command = CreateUserCommand::parse(email, name, password)?;
        if self.users.find_by_email(&command.email)?.is_some() {
            return Err(LedgerError::DuplicateEmail);
        }

        let password_hash = hash_password(&command.password, self.hash_cost)?;
        // the store re-checks uniqueness under its write lock
        let user = self.users.create(NewUser {
            email: command.email,
            name: command.name,
            password_hash,
        })?;
        info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Unknown email and wrong password fail the same way.
    pub fn authenticate_user(&self, email: &str, password: &str) -> Result<Session, LedgerError> {
        let Some(user) = self.users.find_by_email(email)? else {
            // same bcrypt work as a wrong password
            verify_password(password, self.dummy_hash()?)?;
            warn!("Authentication failed");
            return Err(LedgerError::InvalidCredentials);
        };
        if !verify_password(password, &user.password_hash)? {
            warn!("Authentication failed");
            return Err(LedgerError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        debug!(user_id = %user.id, "Session issued");
        Ok(Session { token, user })
    }

    fn dummy_hash(&self) -> Result<&str, LedgerError> {
        if let Some(hash) = self.dummy_hash.get() {
            return Ok(hash);
        }
        let hash = hash_password("unknown user", self.hash_cost)?;
        Ok(self.dummy_hash.get_or_init(|| hash))
    }

    pub fn show_user_profile(&self, user_id: UserId) -> Result<User, LedgerError> {
        debug!(%user_id, "Loading user profile");
        self.users
            .find_by_id(user_id)?
            .ok_or(LedgerError::UserNotFound)
    }

    /// Resolves a bearer token to the user it was issued for.
    pub fn authorize(&self, token: &str) -> Result<UserId, LedgerError> {
        let user_id = self.tokens.verify(token).map_err(|err| {
            debug!(%err, "Token rejected");
            LedgerError::InvalidToken
        })?;
        if self.users.find_by_id(user_id)?.is_none() {
            return Err(LedgerError::InvalidToken);
        }
        Ok(user_id)
    }
}
