use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const DEFAULT_EMAIL: &str = "example@gmail.com";
pub const DEFAULT_PHONE_NUMBER: &str = "+380000000000";
pub const DEFAULT_COUNTRY: &str = "Ukraine";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub patronymic: Option<String>,
    pub corp_email: String,
    pub personal_email: String,
    pub phone_number: String,
    pub country: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub postcode: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    pub is_approved: bool,
}

/// Full set of editable employee fields, as sent to `PATCH` and `PUT`.
///
/// First and last name are required; everything else falls back to the column defaults,
/// so a replace with only names resets contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeFields {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub patronymic: String,
    #[serde(default = "default_email")]
    pub corp_email: String,
    #[serde(default = "default_email")]
    pub personal_email: String,
    #[serde(default = "default_phone_number")]
    pub phone_number: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postcode: Option<String>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    #[serde(default = "today")]
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_approved: bool,
}

fn default_email() -> String {
    DEFAULT_EMAIL.to_string()
}

fn default_phone_number() -> String {
    DEFAULT_PHONE_NUMBER.to_string()
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn default_true() -> bool {
    true
}

fn is_empty(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

impl Employee {
    /// Placeholder record created by `POST`: no names, default contact data.
    pub fn blank(id: i64) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            patronymic: None,
            corp_email: default_email(),
            personal_email: default_email(),
            phone_number: default_phone_number(),
            country: default_country(),
            state: None,
            city: None,
            address: None,
            postcode: None,
            birthday: None,
            start_date: today(),
            end_date: None,
            is_active: true,
            is_approved: true,
        }
    }

    /// True while neither first nor last name has been filled in.
    pub fn is_blank(&self) -> bool {
        is_empty(&self.first_name) && is_empty(&self.last_name)
    }

    /// Overwrite every editable field. The id is left alone.
    pub fn apply(&mut self, fields: EmployeeFields) {
        self.first_name = Some(fields.first_name);
        self.last_name = Some(fields.last_name);
        self.patronymic = Some(fields.patronymic);
        self.corp_email = fields.corp_email;
        self.personal_email = fields.personal_email;
        self.phone_number = fields.phone_number;
        self.country = fields.country;
        self.state = fields.state;
        self.city = fields.city;
        self.address = fields.address;
        self.postcode = fields.postcode;
        self.birthday = fields.birthday;
        self.start_date = fields.start_date;
        self.end_date = fields.end_date;
        self.is_active = fields.is_active;
        self.is_approved = fields.is_approved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_employee_has_defaults() {
        let employee = Employee::blank(5);
        assert_eq!(employee.id, 5);
        assert!(employee.is_blank());
        assert_eq!(employee.corp_email, DEFAULT_EMAIL);
        assert_eq!(employee.country, DEFAULT_COUNTRY);
        assert!(employee.is_active && employee.is_approved);
    }

    #[test]
    fn whitespace_names_count_as_blank() {
        let mut employee = Employee::blank(1);
        employee.first_name = Some("  ".to_string());
        employee.last_name = Some(String::new());
        assert!(employee.is_blank());

        employee.last_name = Some("Shevchenko".to_string());
        assert!(!employee.is_blank());
    }

    #[test]
    fn fields_fill_in_defaults() {
        let fields: EmployeeFields = serde_json::from_value(json!({
            "first_name": "Taras",
            "last_name": "Shevchenko",
            "patronymic": "Hryhorovych",
            "city": "Kyiv"
        }))
        .unwrap();

        assert_eq!(fields.phone_number, DEFAULT_PHONE_NUMBER);
        assert_eq!(fields.city.as_deref(), Some("Kyiv"));
        assert!(fields.is_active);
        assert!(fields.end_date.is_none());
    }

    #[test]
    fn apply_overwrites_everything_but_id() {
        let mut employee = Employee::blank(9);
        employee.city = Some("Lviv".to_string());

        let fields: EmployeeFields = serde_json::from_value(json!({
            "first_name": "Lesya",
            "last_name": "Ukrainka",
            "patronymic": "Petrivna",
            "is_active": false
        }))
        .unwrap();
        employee.apply(fields);

        assert_eq!(employee.id, 9);
        assert_eq!(employee.first_name.as_deref(), Some("Lesya"));
        assert!(employee.city.is_none());
        assert!(!employee.is_active);
        assert!(!employee.is_blank());
    }

    #[test]
    fn fields_require_names() {
        let result = serde_json::from_value::<EmployeeFields>(json!({ "first_name": "Only" }));
        assert!(result.is_err());
    }
}
