use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::auth::AuthError;
use crate::config::{ConfigError, SecurityConfig};

/// Marker returned next to every access token.
pub const TOKEN_TYPE: &str = "bearer";

/// Decoded payload of an access token.
///
/// `privilege` is copied from the credential when the token is issued and is
/// not refreshed afterwards: a downgraded or disabled user keeps their old
/// privilege until the token expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "sub")]
    pub subject: String,
    pub privilege: i32,
    #[serde(rename = "iat")]
    pub issued_at: i64,
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// Body of a successful `POST /token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
        }
    }
}

fn default_ttl(security: &SecurityConfig) -> Result<Duration, ConfigError> {
    Duration::try_minutes(security.token_ttl_minutes).ok_or(ConfigError::InvalidValue {
        key: "ACCESS_TOKEN_EXPIRE_MINUTES",
        value: security.token_ttl_minutes.to_string(),
    })
}

/// Signs access tokens with the process-wide secret.
#[derive(Clone)]
pub struct TokenIssuer {
    header: Header,
    key: EncodingKey,
    default_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(security: &SecurityConfig) -> Result<Self, ConfigError> {
        if security.jwt_secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "JWT_SECRET",
                value: String::new(),
            });
        }

        Ok(Self {
            header: Header::new(security.algorithm()?),
            key: EncodingKey::from_secret(security.jwt_secret.as_bytes()),
            default_ttl: default_ttl(security)?,
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Sign a token for `subject` that expires `ttl` from now.
    pub fn issue(&self, subject: &str, privilege: i32, ttl: Duration) -> Result<String, AuthError> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::TokenGeneration("token expiry out of range".to_string()))?;

        let claims = Claims {
            subject: subject.to_string(),
            privilege,
            issued_at: now.timestamp(),
            expires_at: expires_at.timestamp(),
        };

        tracing::debug!(
            subject = %claims.subject,
            privilege = claims.privilege,
            expires_at = claims.expires_at,
            "Issuing access token"
        );

        encode(&self.header, &claims, &self.key).map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    pub fn issue_default(&self, subject: &str, privilege: i32) -> Result<String, AuthError> {
        self.issue(subject, privilege, self.default_ttl)
    }
}

/// Checks signature and expiry of presented tokens.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(security: &SecurityConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            key: DecodingKey::from_secret(security.jwt_secret.as_bytes()),
            validation: Self::validation(security.algorithm()?),
        })
    }

    fn validation(algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        // Expiry is checked below with an inclusive bound and no leeway.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }

    /// Decode `token` and return its claims if the signature matches and the
    /// token has not yet expired.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            let err = match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            };
            tracing::debug!("Token rejected: {} ({})", err, e);
            err
        })?;

        if data.claims.expires_at <= Utc::now().timestamp() {
            tracing::debug!(subject = %data.claims.subject, "Token rejected: expired");
            return Err(AuthError::Expired);
        }

        Ok(data.claims)
    }
}
