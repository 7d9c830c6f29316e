use std::sync::Arc;

use crate::auth::password::PasswordHasher;
use crate::auth::token::{TokenIssuer, TokenResponse};
use crate::auth::AuthError;
use crate::database::models::Credential;
use crate::database::store::CredentialStore;

/// Turns a username and password into a bearer token.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    issuer: TokenIssuer,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, issuer: TokenIssuer) -> Self {
        Self { store, hasher, issuer }
    }

    /// Check the credentials and issue a token with the default lifetime.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`AuthError::InvalidCredentials`], and both pay for one bcrypt
    /// verification.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let credential = self.store.find_by_username(username).await?;

        let Some(credential) = self.check_password(credential, password).await? else {
            tracing::warn!(username = %username, "Login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        let token = self
            .issuer
            .issue_default(&credential.username, credential.privilege)?;

        tracing::info!(
            username = %credential.username,
            privilege = credential.privilege,
            "Login succeeded"
        );
        Ok(TokenResponse::bearer(token))
    }

    /// bcrypt is CPU-bound, so verification runs on the blocking pool.
    async fn check_password(
        &self,
        credential: Option<Credential>,
        password: &str,
    ) -> Result<Option<Credential>, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || match credential {
            Some(credential) if hasher.verify(&password, &credential.hashed_password) => Some(credential),
            Some(_) => None,
            None => {
                hasher.verify_dummy(&password);
                None
            }
        })
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))
    }
}
