//! Storage abstractions for service layer
//!
//! `EmployeeStore` is the seam between the CRUD service and persistence:
//! the whole list is loaded, mutated in memory and saved back.

use async_trait::async_trait;

use crate::employee::Employee;
use crate::errors::ServiceError;

pub mod json_file_store;
pub mod memory_store;

pub use json_file_store::JsonFileStore;
pub use memory_store::MemoryStore;

/// Whole-list persistence for employee records.
/// Implementations can be file-backed or purely in memory (tests).
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Make sure the backing location exists and holds a list.
    async fn ensure_initialized(&self) -> Result<(), ServiceError>;
    /// Read the full list, in stored order.
    async fn load(&self) -> Result<Vec<Employee>, ServiceError>;
    /// Replace the full list.
    async fn save(&self, employees: &[Employee]) -> Result<(), ServiceError>;
}
