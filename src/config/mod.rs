use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

use crate::auth::password::{MAX_COST, MIN_COST};

/// Secret used when `JWT_SECRET` is unset outside production.
const DEVELOPMENT_JWT_SECRET: &str = "staff-api-development-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must be set in {0:?} mode")]
    MissingSecret(Environment),

    #[error("DATABASE_URL must be set in {0:?} mode")]
    MissingDatabase(Environment),

    #[error("Unsupported JWT algorithm '{0}', expected HS256, HS384 or HS512")]
    UnsupportedAlgorithm(String),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. `None` selects the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_algorithm: String,
    pub token_ttl_minutes: i64,
    pub password_hash_cost: u32,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()?;

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server overrides
        if let Ok(v) = env::var("STAFF_API_HOST") {
            self.server.host = v;
        }
        if let Some((key, v)) = first_var(&["STAFF_API_PORT", "PORT"], |k| env::var(k).ok()) {
            self.server.port = parse_var(key, &v)?;
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|url| !url.trim().is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse_var("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_ALGORITHM") {
            self.security.jwt_algorithm = v.trim().to_uppercase();
        }
        if let Ok(v) = env::var("ACCESS_TOKEN_EXPIRE_MINUTES") {
            self.security.token_ttl_minutes = parse_var("ACCESS_TOKEN_EXPIRE_MINUTES", &v)?;
        }
        if let Ok(v) = env::var("PASSWORD_HASH_COST") {
            self.security.password_hash_cost = parse_var("PASSWORD_HASH_COST", &v)?;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    /// Check cross-field rules that the presets alone cannot guarantee.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.is_empty() {
            return Err(ConfigError::MissingSecret(self.environment));
        }
        if self.environment == Environment::Production && self.database.url.is_none() {
            return Err(ConfigError::MissingDatabase(self.environment));
        }
        self.security.algorithm()?;
        if self.security.token_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "ACCESS_TOKEN_EXPIRE_MINUTES",
                value: self.security.token_ttl_minutes.to_string(),
            });
        }
        if !(MIN_COST..=MAX_COST).contains(&self.security.password_hash_cost) {
            return Err(ConfigError::InvalidValue {
                key: "PASSWORD_HASH_COST",
                value: self.security.password_hash_cost.to_string(),
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
                jwt_algorithm: "HS256".to_string(),
                token_ttl_minutes: 30,
                password_hash_cost: 10,
                cors_origins: Vec::new(),
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_algorithm: "HS256".to_string(),
                token_ttl_minutes: 30,
                password_hash_cost: bcrypt::DEFAULT_COST,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_algorithm: "HS256".to_string(),
                token_ttl_minutes: 15,
                password_hash_cost: bcrypt::DEFAULT_COST,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
        }
    }
}

impl SecurityConfig {
    /// Resolve the configured MAC algorithm. Only the HMAC family is accepted
    /// because tokens are signed and checked with one shared secret.
    pub fn algorithm(&self) -> Result<Algorithm, ConfigError> {
        match self.jwt_algorithm.as_str() {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            other => Err(ConfigError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// First of `keys` that is set, along with the name it was found under.
fn first_var(
    keys: &[&'static str],
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<(&'static str, String)> {
    keys.iter().find_map(|key| lookup(key).map(|value| (*key, value)))
}

fn parse_var<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
