pub mod employee_service;
pub mod user_service;

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;

pub use employee_service::EmployeeService;
pub use user_service::{NewUser, UserService, UserUpdate};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for ServiceError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(what) => ServiceError::NotFound(what),
            DatabaseError::Conflict(what) => ServiceError::Conflict(what),
            other => ServiceError::Database(other),
        }
    }
}
