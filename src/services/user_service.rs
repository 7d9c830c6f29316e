use serde::Deserialize;
use std::sync::Arc;

use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::auth::policy::{PRIVILEGE_NONE, PRIVILEGE_READ, PRIVILEGE_WRITE};
use crate::auth::{AuthError, PasswordHasher};
use crate::database::models::{Credential, UserProfile};
use crate::database::store::CredentialStore;
use crate::services::ServiceError;

const MAX_USERNAME_LEN: usize = 64;

/// Request body for creating a user. `password` is plaintext and is hashed
/// before it reaches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default = "default_privilege")]
    pub privilege: i32,
}

fn default_privilege() -> i32 {
    PRIVILEGE_READ
}

/// Partial update: only the fields present are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub disabled: Option<bool>,
    pub privilege: Option<i32>,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub async fn create(&self, new_user: NewUser) -> Result<UserProfile, ServiceError> {
        validate_username(&new_user.username)?;
        validate_password(&new_user.password)?;
        validate_privilege(new_user.privilege)?;

        let hashed_password = self.hash(new_user.password).await?;
        let credential = Credential {
            id: new_user.id,
            username: new_user.username,
            full_name: new_user.full_name,
            email: new_user.email,
            hashed_password,
            disabled: new_user.disabled,
            privilege: new_user.privilege,
        };

        self.store.insert(&credential).await?;
        tracing::info!(
            user_id = credential.id,
            username = %credential.username,
            privilege = credential.privilege,
            "User created"
        );
        Ok(credential.into())
    }

    pub async fn list(&self) -> Result<Vec<UserProfile>, ServiceError> {
        let users = self.store.list().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    /// Profile of the token's subject. The account must still exist and be
    /// enabled.
    pub async fn current(&self, username: &str) -> Result<UserProfile, ServiceError> {
        let credential = self
            .store
            .find_by_username(username)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Invalid authentication credentials".to_string()))?;

        if credential.disabled {
            return Err(ServiceError::Validation("Invalid user".to_string()));
        }
        Ok(credential.into())
    }

    pub async fn replace(&self, id: i64, update: UserUpdate) -> Result<UserProfile, ServiceError> {
        let mut credential = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("user {}", id)))?;

        if let Some(username) = update.username {
            validate_username(&username)?;
            credential.username = username;
        }
        if let Some(password) = update.password {
            validate_password(&password)?;
            credential.hashed_password = self.hash(password).await?;
        }
        if let Some(full_name) = update.full_name {
            credential.full_name = Some(full_name);
        }
        if let Some(email) = update.email {
            credential.email = Some(email);
        }
        if let Some(disabled) = update.disabled {
            credential.disabled = disabled;
        }
        if let Some(privilege) = update.privilege {
            validate_privilege(privilege)?;
            credential.privilege = privilege;
        }

        self.store.update(&credential).await?;
        tracing::info!(user_id = id, "User updated");
        Ok(credential.into())
    }

    async fn hash(&self, password: String) -> Result<String, ServiceError> {
        let hasher = self.hasher.clone();
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Hashing(e.to_string()))??;
        Ok(digest)
    }
}

fn validate_username(username: &str) -> Result<(), ServiceError> {
    if username.trim().is_empty() {
        return Err(ServiceError::Validation("Username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(ServiceError::Validation(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if username.chars().any(char::is_whitespace) {
        return Err(ServiceError::Validation("Username cannot contain whitespace".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.is_empty() {
        return Err(ServiceError::Validation("Password cannot be empty".to_string()));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ServiceError::Validation(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }
    Ok(())
}

fn validate_privilege(privilege: i32) -> Result<(), ServiceError> {
    if !(PRIVILEGE_NONE..=PRIVILEGE_WRITE).contains(&privilege) {
        return Err(ServiceError::Validation(format!(
            "Privilege must be between {} and {}",
            PRIVILEGE_NONE, PRIVILEGE_WRITE
        )));
    }
    Ok(())
}
