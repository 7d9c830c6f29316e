pub mod credential;
pub mod employee;

pub use credential::{Credential, UserProfile};
pub use employee::{Employee, EmployeeFields};
