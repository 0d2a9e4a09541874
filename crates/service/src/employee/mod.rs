//! Employee records and the CRUD service over an `EmployeeStore`.

pub mod domain;
pub mod service;

pub use domain::{next_id, parse_id, Employee, EmployeePatch, NewEmployee, Salary, REQUIRED_FIELDS};
pub use service::EmployeeService;
