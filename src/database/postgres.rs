use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Credential, Employee};
use crate::database::store::{CredentialStore, EmployeeStore};

const USER_COLUMNS: &str = "id, username, full_name, email, hashed_password, disabled, privilege";

const EMPLOYEE_COLUMNS: &str = "id, first_name, last_name, patronymic, corp_email, personal_email, \
     phone_number, country, state, city, address, postcode, birthday, start_date, end_date, \
     is_active, is_approved";

/// `SET` list matching `bind_employee`, with `$1` left for the id.
const EMPLOYEE_ASSIGNMENTS: &str = "first_name = $2, last_name = $3, patronymic = $4, \
     corp_email = $5, personal_email = $6, phone_number = $7, country = $8, state = $9, \
     city = $10, address = $11, postcode = $12, birthday = $13, start_date = $14, \
     end_date = $15, is_active = $16, is_approved = $17";

/// sqlx-backed store over the `users` and `employees` tables.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Credential>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, Credential>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Credential>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, Credential>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, credential: &Credential) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, full_name, email, hashed_password, disabled, privilege)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(credential.id)
        .bind(&credential.username)
        .bind(&credential.full_name)
        .bind(&credential.email)
        .bind(&credential.hashed_password)
        .bind(credential.disabled)
        .bind(credential.privilege)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_insert(e, format!("user {} / '{}'", credential.id, credential.username)))?;
        Ok(())
    }

    async fn update(&self, credential: &Credential) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = $2, full_name = $3, email = $4, hashed_password = $5,
                disabled = $6, privilege = $7
            WHERE id = $1
            "#,
        )
        .bind(credential.id)
        .bind(&credential.username)
        .bind(&credential.full_name)
        .bind(&credential.email)
        .bind(&credential.hashed_password)
        .bind(credential.disabled)
        .bind(credential.privilege)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_insert(e, format!("username '{}'", credential.username)))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", credential.id)));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Credential>, DatabaseError> {
        let sql = format!("SELECT {} FROM users ORDER BY id", USER_COLUMNS);
        let rows = sqlx::query_as::<_, Credential>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[async_trait]
impl EmployeeStore for PgStore {
    async fn list(&self) -> Result<Vec<Employee>, DatabaseError> {
        let sql = format!("SELECT {} FROM employees ORDER BY id", EMPLOYEE_COLUMNS);
        let rows = sqlx::query_as::<_, Employee>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get(&self, id: i64) -> Result<Option<Employee>, DatabaseError> {
        let sql = format!("SELECT {} FROM employees WHERE id = $1", EMPLOYEE_COLUMNS);
        let row = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert(&self, employee: &Employee) -> Result<(), DatabaseError> {
        let sql = format!(
            "INSERT INTO employees ({}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)",
            EMPLOYEE_COLUMNS
        );
        bind_employee(sqlx::query(&sql), employee)
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_insert(e, format!("employee {}", employee.id)))?;
        Ok(())
    }

    async fn update(&self, employee: &Employee) -> Result<(), DatabaseError> {
        let sql = format!("UPDATE employees SET {} WHERE id = $1", EMPLOYEE_ASSIGNMENTS);
        let result = bind_employee(sqlx::query(&sql), employee)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("employee {}", employee.id)));
        }
        Ok(())
    }

    async fn fill_blank(&self, employee: &Employee) -> Result<bool, DatabaseError> {
        let sql = format!(
            "UPDATE employees SET {} WHERE id = $1 \
             AND COALESCE(btrim(first_name, E' \\t\\r\\n'), '') = '' \
             AND COALESCE(btrim(last_name, E' \\t\\r\\n'), '') = ''",
            EMPLOYEE_ASSIGNMENTS
        );
        let result = bind_employee(sqlx::query(&sql), employee)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() > 0 {
            return Ok(true);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM employees WHERE id = $1)")
            .bind(employee.id)
            .fetch_one(&self.pool)
            .await?;
        if !exists {
            return Err(DatabaseError::NotFound(format!("employee {}", employee.id)));
        }
        Ok(false)
    }

    async fn delete(&self, id: i64) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Bind all employee columns in `EMPLOYEE_COLUMNS` order as `$1..$17`.
fn bind_employee<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    employee: &'q Employee,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(employee.id)
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.patronymic)
        .bind(&employee.corp_email)
        .bind(&employee.personal_email)
        .bind(&employee.phone_number)
        .bind(&employee.country)
        .bind(&employee.state)
        .bind(&employee.city)
        .bind(&employee.address)
        .bind(&employee.postcode)
        .bind(employee.birthday)
        .bind(employee.start_date)
        .bind(employee.end_date)
        .bind(employee.is_active)
        .bind(employee.is_approved)
}
