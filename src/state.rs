use std::sync::Arc;

use crate::auth::{AccessPolicy, Authenticator, PasswordHasher, TokenIssuer, TokenVerifier};
use crate::config::{AppConfig, ConfigError};
use crate::database::{CredentialStore, EmployeeStore};
use crate::services::{EmployeeService, UserService};

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub authenticator: Authenticator,
    pub verifier: TokenVerifier,
    pub policy: AccessPolicy,
    pub employees: EmployeeService,
    pub users: UserService,
    credentials: Arc<dyn CredentialStore>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        credentials: Arc<dyn CredentialStore>,
        employees: Arc<dyn EmployeeStore>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let hasher = PasswordHasher::new(config.security.password_hash_cost)?;
        let issuer = TokenIssuer::new(&config.security)?;
        let verifier = TokenVerifier::new(&config.security)?;

        Ok(Self {
            authenticator: Authenticator::new(credentials.clone(), hasher.clone(), issuer),
            verifier,
            policy: AccessPolicy::default(),
            employees: EmployeeService::new(employees),
            users: UserService::new(credentials.clone(), hasher),
            credentials,
            config: Arc::new(config),
        })
    }

    /// Store behind the credential lookups, for `/health`.
    pub fn credential_store(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }
}
