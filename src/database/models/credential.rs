use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::policy::PRIVILEGE_READ;

/// A row of the `users` table, password digest included.
///
/// Never serialized and never logged in full; handlers expose
/// [`UserProfile`] instead.
#[derive(Clone, PartialEq, Eq, FromRow)]
pub struct Credential {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub hashed_password: String,
    pub disabled: bool,
    pub privilege: i32,
}

impl Credential {
    /// A fresh credential with the column defaults: enabled, read privilege.
    pub fn new(id: i64, username: impl Into<String>, hashed_password: String) -> Self {
        Self {
            id,
            username: username.into(),
            full_name: None,
            email: None,
            hashed_password,
            disabled: false,
            privilege: PRIVILEGE_READ,
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("hashed_password", &"<redacted>")
            .field("disabled", &self.disabled)
            .field("privilege", &self.privilege)
            .finish()
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub disabled: bool,
    pub privilege: i32,
}

impl From<&Credential> for UserProfile {
    fn from(credential: &Credential) -> Self {
        Self {
            id: credential.id,
            username: credential.username.clone(),
            full_name: credential.full_name.clone(),
            email: credential.email.clone(),
            disabled: credential.disabled,
            privilege: credential.privilege,
        }
    }
}

impl From<Credential> for UserProfile {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id,
            username: credential.username,
            full_name: credential.full_name,
            email: credential.email,
            disabled: credential.disabled,
            privilege: credential.privilege,
        }
    }
}
