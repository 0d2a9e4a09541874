use async_trait::async_trait;
use tokio::sync::RwLock;

use super::EmployeeStore;
use crate::employee::Employee;
use crate::errors::ServiceError;

/// In-memory store; nothing touches the filesystem.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Vec<Employee>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_employees(employees: Vec<Employee>) -> Self {
        Self { inner: RwLock::new(employees) }
    }
}

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn ensure_initialized(&self) -> Result<(), ServiceError> {
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Employee>, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, employees: &[Employee]) -> Result<(), ServiceError> {
        *self.inner.write().await = employees.to_vec();
        Ok(())
    }
}
