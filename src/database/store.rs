use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Credential, Employee};

/// Persistence boundary for user credentials.
///
/// Username uniqueness is the store's responsibility: `insert` fails with
/// [`DatabaseError::Conflict`] on a duplicate id or username.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, DatabaseError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Credential>, DatabaseError>;

    async fn insert(&self, credential: &Credential) -> Result<(), DatabaseError>;

    /// Replace the stored row with the same id. `NotFound` if there is none.
    async fn update(&self, credential: &Credential) -> Result<(), DatabaseError>;

    async fn list(&self) -> Result<Vec<Credential>, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Employee>, DatabaseError>;

    async fn get(&self, id: i64) -> Result<Option<Employee>, DatabaseError>;

    /// `Conflict` if the id is taken.
    async fn insert(&self, employee: &Employee) -> Result<(), DatabaseError>;

    /// `NotFound` if there is no row with this id.
    async fn update(&self, employee: &Employee) -> Result<(), DatabaseError>;

    /// Write `employee` only if the stored row still has no first or last
    /// name, checked and written as one step. Returns `false` when the row
    /// has already been filled in, `NotFound` when there is no row.
    async fn fill_blank(&self, employee: &Employee) -> Result<bool, DatabaseError>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, DatabaseError>;
}
