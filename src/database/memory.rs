use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::models::{Credential, Employee};
use crate::database::store::{CredentialStore, EmployeeStore};

/// In-process store used when no database is configured, and by tests.
///
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<BTreeMap<i64, Credential>>,
    employees: RwLock<BTreeMap<i64, Employee>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.values().find(|c| c.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Credential>, DatabaseError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn insert(&self, credential: &Credential) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        if users.contains_key(&credential.id) {
            return Err(DatabaseError::Conflict(format!("user {}", credential.id)));
        }
        if users.values().any(|c| c.username == credential.username) {
            return Err(DatabaseError::Conflict(format!("username '{}'", credential.username)));
        }
        users.insert(credential.id, credential.clone());
        Ok(())
    }

    async fn update(&self, credential: &Credential) -> Result<(), DatabaseError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|c| c.id != credential.id && c.username == credential.username)
        {
            return Err(DatabaseError::Conflict(format!("username '{}'", credential.username)));
        }
        match users.get_mut(&credential.id) {
            Some(existing) => {
                *existing = credential.clone();
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("user {}", credential.id))),
        }
    }

    async fn list(&self) -> Result<Vec<Credential>, DatabaseError> {
        Ok(self.users.read().await.values().cloned().collect())
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Employee>, DatabaseError> {
        Ok(self.employees.read().await.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Employee>, DatabaseError> {
        Ok(self.employees.read().await.get(&id).cloned())
    }

    async fn insert(&self, employee: &Employee) -> Result<(), DatabaseError> {
        let mut employees = self.employees.write().await;
        if employees.contains_key(&employee.id) {
            return Err(DatabaseError::Conflict(format!("employee {}", employee.id)));
        }
        employees.insert(employee.id, employee.clone());
        Ok(())
    }

    async fn update(&self, employee: &Employee) -> Result<(), DatabaseError> {
        match self.employees.write().await.get_mut(&employee.id) {
            Some(existing) => {
                *existing = employee.clone();
                Ok(())
            }
            None => Err(DatabaseError::NotFound(format!("employee {}", employee.id))),
        }
    }

    async fn fill_blank(&self, employee: &Employee) -> Result<bool, DatabaseError> {
        let mut employees = self.employees.write().await;
        let existing = employees
            .get_mut(&employee.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("employee {}", employee.id)))?;

        if !existing.is_blank() {
            return Ok(false);
        }
        *existing = employee.clone();
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        Ok(self.employees.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential(id: i64, username: &str) -> Credential {
        Credential::new(id, username, "$2b$04$digest".to_string())
    }

    #[tokio::test]
    async fn finds_credentials_by_username_and_id() {
        let store = MemoryStore::new();
        CredentialStore::insert(&store, &credential(1, "alice")).await.unwrap();

        let by_name = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, 1);
        assert_eq!(store.find_by_id(1).await.unwrap().unwrap().username, "alice");
        assert!(store.find_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejects_duplicate_id_and_username() {
        let store = MemoryStore::new();
        CredentialStore::insert(&store, &credential(1, "alice")).await.unwrap();

        let dup_id = CredentialStore::insert(&store, &credential(1, "other")).await;
        assert!(matches!(dup_id, Err(DatabaseError::Conflict(_))));

        let dup_name = CredentialStore::insert(&store, &credential(2, "alice")).await;
        assert!(matches!(dup_name, Err(DatabaseError::Conflict(_))));
    }

    #[tokio::test]
    async fn update_requires_existing_row() {
        let store = MemoryStore::new();
        let missing = CredentialStore::update(&store, &credential(3, "carol")).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound(_))));

        CredentialStore::insert(&store, &credential(3, "carol")).await.unwrap();
        let mut changed = credential(3, "carol");
        changed.privilege = 2;
        CredentialStore::update(&store, &changed).await.unwrap();
        assert_eq!(store.find_by_id(3).await.unwrap().unwrap().privilege, 2);
    }

    #[tokio::test]
    async fn employee_lifecycle() {
        let store = MemoryStore::new();
        EmployeeStore::insert(&store, &Employee::blank(10)).await.unwrap();
        assert!(matches!(
            EmployeeStore::insert(&store, &Employee::blank(10)).await,
            Err(DatabaseError::Conflict(_))
        ));

        assert_eq!(EmployeeStore::list(&store).await.unwrap().len(), 1);
        assert!(store.delete(10).await.unwrap());
        assert!(!store.delete(10).await.unwrap());
        assert!(store.get(10).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fill_blank_writes_once() {
        let store = MemoryStore::new();
        let missing = store.fill_blank(&Employee::blank(20)).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound(_))));

        EmployeeStore::insert(&store, &Employee::blank(20)).await.unwrap();
        let mut first = Employee::blank(20);
        first.first_name = Some("Ivan".to_string());
        assert!(store.fill_blank(&first).await.unwrap());

        let mut second = Employee::blank(20);
        second.last_name = Some("Other".to_string());
        assert!(!store.fill_blank(&second).await.unwrap());
        assert_eq!(store.get(20).await.unwrap().unwrap().first_name.as_deref(), Some("Ivan"));
    }
}
