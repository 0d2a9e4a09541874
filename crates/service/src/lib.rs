//! Service layer for the employee registry.
//! - `employee`: record types, payload coercion and the CRUD service.
//! - `storage`: the `EmployeeStore` seam with file and in-memory backends.
//! - `observability`: Prometheus counters shared with the HTTP layer.

pub mod errors;
pub mod employee;
pub mod observability;
pub mod runtime;
pub mod storage;
