use std::sync::Arc;

use crate::database::models::{Employee, EmployeeFields};
use crate::database::store::EmployeeStore;
use crate::services::ServiceError;

/// Employee records and the rules around editing them.
#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Employee>, ServiceError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Employee, ServiceError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("employee {}", id)))
    }

    /// Register a new id with a blank record.
    pub async fn create(&self, id: i64) -> Result<Employee, ServiceError> {
        let employee = Employee::blank(id);
        self.store.insert(&employee).await?;
        tracing::info!(employee_id = id, "Employee created");
        Ok(employee)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if !self.store.delete(id).await? {
            return Err(ServiceError::NotFound(format!("employee {}", id)));
        }
        tracing::info!(employee_id = id, "Employee deleted");
        Ok(())
    }

    /// Fill in a record that is still blank. Records that already carry a
    /// first or last name are refused; use `replace` for those.
    pub async fn modify(&self, id: i64, fields: EmployeeFields) -> Result<Employee, ServiceError> {
        let mut employee = self.get(id).await?;
        if !employee.is_blank() {
            return Err(not_empty(id));
        }
        employee.apply(fields);

        // Another request may have filled it in since the read above
        if !self.store.fill_blank(&employee).await? {
            return Err(not_empty(id));
        }
        tracing::info!(employee_id = id, "Employee filled in");
        Ok(employee)
    }

    /// Overwrite every field of an existing record.
    pub async fn replace(&self, id: i64, fields: EmployeeFields) -> Result<Employee, ServiceError> {
        let mut employee = self.get(id).await?;
        employee.apply(fields);
        self.store.update(&employee).await?;
        tracing::info!(employee_id = id, "Employee replaced");
        Ok(employee)
    }
}

fn not_empty(id: i64) -> ServiceError {
    ServiceError::Forbidden(format!("Employee {} is not empty", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use serde_json::json;

    fn service() -> EmployeeService {
        EmployeeService::new(Arc::new(MemoryStore::new()))
    }

    fn fields(first: &str, last: &str) -> EmployeeFields {
        serde_json::from_value(json!({
            "first_name": first,
            "last_name": last,
            "patronymic": ""
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_get() {
        let service = service();
        service.create(1).await.unwrap();

        let employee = service.get(1).await.unwrap();
        assert!(employee.is_blank());
        assert!(matches!(service.create(1).await, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn modify_only_fills_blank_records() {
        let service = service();
        service.create(2).await.unwrap();

        let filled = service.modify(2, fields("Ivan", "Franko")).await.unwrap();
        assert_eq!(filled.first_name.as_deref(), Some("Ivan"));

        let again = service.modify(2, fields("Other", "Name")).await;
        assert!(matches!(again, Err(ServiceError::Forbidden(_))));
        assert_eq!(service.get(2).await.unwrap().first_name.as_deref(), Some("Ivan"));
    }

    #[tokio::test]
    async fn concurrent_fills_only_one_wins() {
        let service = service();
        service.create(5).await.unwrap();

        let (first, second) = tokio::join!(
            service.modify(5, fields("Ivan", "Franko")),
            service.modify(5, fields("Olena", "Pchilka")),
        );

        let winners = [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count();
        assert_eq!(winners, 1);
        let loser = if first.is_ok() { second } else { first };
        assert!(matches!(loser, Err(ServiceError::Forbidden(_))));
    }

    #[tokio::test]
    async fn replace_overwrites_filled_records() {
        let service = service();
        service.create(3).await.unwrap();
        service.modify(3, fields("Ivan", "Franko")).await.unwrap();

        let replaced = service.replace(3, fields("Olena", "Pchilka")).await.unwrap();
        assert_eq!(replaced.last_name.as_deref(), Some("Pchilka"));
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let service = service();
        assert!(matches!(service.get(4).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(service.delete(4).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            service.modify(4, fields("A", "B")).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.replace(4, fields("A", "B")).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
