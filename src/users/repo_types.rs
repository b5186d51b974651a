use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Row written on signup. Carries the password hash only.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub location: String,
    pub password_hash: String,
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("age", &self.age)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Public projection of a user row, as returned by `/myprofile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: Uuid,       // store-assigned
    pub name: String,   // lookup key, not unique
    pub email: String,  // unique
    pub age: i32,
    pub location: String,
}
