pub mod flow;
pub mod password;
pub mod policy;
pub mod token;

use thiserror::Error;

use crate::database::DatabaseError;

pub use flow::Authenticator;
pub use password::PasswordHasher;
pub use policy::{AccessPolicy, Decision, Operation};
pub use token::{Claims, TokenIssuer, TokenResponse, TokenVerifier};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Deliberately one variant.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Token signature does not match")]
    InvalidSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token is malformed")]
    Malformed,

    #[error("Insufficient privilege: requires {required}, token carries {actual}")]
    InsufficientPrivilege { required: i32, actual: i32 },

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Password hashing error: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] DatabaseError),
}

impl AuthError {
    /// True for the rejections of a presented bearer token.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidSignature | AuthError::Expired | AuthError::Malformed
        )
    }
}
