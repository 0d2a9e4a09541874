use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::domain::{next_id, Employee, EmployeePatch, NewEmployee};
use crate::errors::ServiceError;
use crate::observability::{EMPLOYEES_CREATED_TOTAL, EMPLOYEES_DELETED_TOTAL, EMPLOYEES_UPDATED_TOTAL};
use crate::storage::EmployeeStore;

/// CRUD over the employee list.
///
/// Every mutation is a full load -> mutate -> save cycle. Cycles are run one
/// at a time behind `write_lock`, so two concurrent writes cannot overwrite
/// each other's result. Lists take the same lock: a load may itself write
/// (creating a missing file, resetting a corrupt one), and that write must
/// not land on top of a concurrent save.
pub struct EmployeeService {
    store: Arc<dyn EmployeeStore>,
    write_lock: Mutex<()>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn EmployeeStore>) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    pub async fn list(&self) -> Result<Vec<Employee>, ServiceError> {
        let _guard = self.write_lock.lock().await;
        self.store.load().await
    }

    /// Append a record with id = max existing id + 1.
    pub async fn create(&self, input: NewEmployee) -> Result<Employee, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.store.load().await?;
        let created = input.into_employee(next_id(&items)?);
        items.push(created.clone());
        self.store.save(&items).await?;
        EMPLOYEES_CREATED_TOTAL.inc();
        info!(id = created.id, total = items.len(), "created employee");
        Ok(created)
    }

    /// Overwrite the fields present in `patch`; unknown ids leave the store untouched.
    pub async fn update(&self, id: u64, patch: EmployeePatch) -> Result<Employee, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.store.load().await?;
        let existing = items
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ServiceError::not_found("employee"))?;
        patch.apply(existing);
        let updated = existing.clone();
        self.store.save(&items).await?;
        EMPLOYEES_UPDATED_TOTAL.inc();
        info!(id, "updated employee");
        Ok(updated)
    }

    /// Remove and return the record; unknown ids leave the store untouched.
    pub async fn delete(&self, id: u64) -> Result<Employee, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.store.load().await?;
        let idx = items
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| ServiceError::not_found("employee"))?;
        let removed = items.remove(idx);
        self.store.save(&items).await?;
        EMPLOYEES_DELETED_TOTAL.inc();
        info!(id, total = items.len(), "deleted employee");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::employee::Salary;
    use crate::storage::{JsonFileStore, MemoryStore};
    use configs::CorruptPolicy;
    use serde_json::json;

    fn new_employee(name: &str, salary: i64) -> NewEmployee {
        NewEmployee { name: name.into(), role: "Dev".into(), salary: Salary::from(salary) }
    }

    fn seeded(ids: &[u64]) -> EmployeeService {
        let seed = ids
            .iter()
            .map(|id| Employee { id: *id, name: format!("e{id}"), role: "Dev".into(), salary: Salary::from(100) })
            .collect();
        EmployeeService::new(Arc::new(MemoryStore::with_employees(seed)))
    }

    #[tokio::test]
    async fn first_create_gets_id_one() -> Result<(), ServiceError> {
        let svc = seeded(&[]);
        let created = svc.create(new_employee("Ana", 5000)).await?;
        assert_eq!(
            serde_json::to_value(&created).unwrap(),
            json!({"id": 1, "name": "Ana", "role": "Dev", "salary": 5000})
        );
        Ok(())
    }

    #[tokio::test]
    async fn create_skips_past_gaps() -> Result<(), ServiceError> {
        let svc = seeded(&[1, 3]);
        let created = svc.create(new_employee("New", 1)).await?;
        assert_eq!(created.id, 4);
        let ids: Vec<u64> = svc.list().await?.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        Ok(())
    }

    #[tokio::test]
    async fn update_without_salary_keeps_salary() -> Result<(), ServiceError> {
        let svc = seeded(&[1]);
        let patch = EmployeePatch { name: Some("Renamed".into()), role: Some("Lead".into()), salary: None };
        let updated = svc.update(1, patch).await?;
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.role, "Lead");
        assert_eq!(updated.salary, Salary::from(100));

        let patch = EmployeePatch { salary: Some(Salary::from(6000)), ..Default::default() };
        let updated = svc.update(1, patch).await?;
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.salary, Salary::from(6000));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found_and_change_nothing() -> Result<(), ServiceError> {
        let svc = seeded(&[1, 2]);
        let before = svc.list().await?;
        assert!(matches!(svc.delete(9).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.update(9, EmployeePatch::default()).await, Err(ServiceError::NotFound(_))));
        assert_eq!(svc.list().await?, before);
        Ok(())
    }

    #[tokio::test]
    async fn create_update_delete_cycle() -> Result<(), ServiceError> {
        let svc = seeded(&[]);
        let created = svc.create(new_employee("Ana", 5000)).await?;
        svc.update(created.id, EmployeePatch { role: Some("CTO".into()), ..Default::default() }).await?;
        let removed = svc.delete(created.id).await?;
        assert_eq!(removed.role, "CTO");
        assert!(svc.list().await?.iter().all(|e| e.id != created.id));
        Ok(())
    }

    #[tokio::test]
    async fn create_fails_cleanly_when_ids_run_out() -> Result<(), ServiceError> {
        let svc = seeded(&[u64::MAX]);
        let err = svc.create(new_employee("Late", 1)).await.unwrap_err();
        assert!(err.is_storage());
        assert_eq!(svc.list().await?.len(), 1);
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn list_resetting_corrupt_file_keeps_concurrent_create() -> anyhow::Result<()> {
        let path = std::env::temp_dir()
            .join(format!("employee_service_{}", uuid::Uuid::new_v4()))
            .join("db.json");
        let store = JsonFileStore::open(&path, CorruptPolicy::Reset).await?;
        let svc = Arc::new(EmployeeService::new(Arc::new(store)));

        for round in 0..50 {
            tokio::fs::write(&path, "{corrupt").await?;
            let creator = {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { svc.create(new_employee(&format!("r{round}"), round)).await })
            };
            let lister = {
                let svc = Arc::clone(&svc);
                tokio::spawn(async move { svc.list().await })
            };
            let created = creator.await??;
            lister.await??;

            let listed = svc.list().await?;
            assert!(listed.iter().any(|e| e.id == created.id), "round {round}: created record vanished");
        }
        if let Some(dir) = path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_are_not_lost() -> anyhow::Result<()> {
        let path = std::env::temp_dir()
            .join(format!("employee_service_{}", uuid::Uuid::new_v4()))
            .join("db.json");
        let store = JsonFileStore::open(&path, CorruptPolicy::Fail).await?;
        let svc = Arc::new(EmployeeService::new(Arc::new(store)));

        let mut handles = Vec::new();
        for i in 0..20 {
            let svc = Arc::clone(&svc);
            handles.push(tokio::spawn(async move { svc.create(new_employee(&format!("w{i}"), i)).await }));
        }
        for h in handles {
            h.await??;
        }

        let mut ids: Vec<u64> = svc.list().await?.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
        if let Some(dir) = path.parent() {
            let _ = tokio::fs::remove_dir_all(dir).await;
        }
        Ok(())
    }
}
