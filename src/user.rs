use time::OffsetDateTime;
use uuid::Uuid;

pub type UserId = Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    /// bcrypt hash, never the plaintext password.
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// User record ready to be persisted by [`crate::store::UserStore::create`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
}
