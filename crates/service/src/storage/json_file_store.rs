use std::path::{Path, PathBuf};

use async_trait::async_trait;
use configs::CorruptPolicy;
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use super::EmployeeStore;
use crate::employee::Employee;
use crate::errors::ServiceError;
use crate::observability::STORE_RESETS_TOTAL;

const EMPTY_LIST: &[u8] = b"[]";

/// JSON file-backed employee list.
///
/// The whole array lives in one file. Reads parse the full document; writes
/// serialize the full list into a sibling temp file and rename it over the
/// original, so readers see either the old or the new contents.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
    on_corrupt: CorruptPolicy,
    pretty: bool,
}

impl JsonFileStore {
    /// Build a store for `path`. Nothing touches the disk until first use.
    pub fn new<P: Into<PathBuf>>(path: P, on_corrupt: CorruptPolicy) -> Self {
        Self { file_path: path.into(), on_corrupt, pretty: true }
    }

    /// Build a store and initialize it right away, surfacing I/O problems early.
    pub async fn open<P: Into<PathBuf>>(path: P, on_corrupt: CorruptPolicy) -> Result<Self, ServiceError> {
        let store = Self::new(path, on_corrupt);
        store.ensure_initialized().await?;
        Ok(store)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn encode(&self, employees: &[Employee]) -> Result<Vec<u8>, ServiceError> {
        let res = if self.pretty {
            serde_json::to_vec_pretty(employees)
        } else {
            serde_json::to_vec(employees)
        };
        res.map_err(|e| ServiceError::storage("serialize", &self.file_path, e))
    }

    /// Write `data` to a temp file next to the target, then rename it into place.
    async fn write_atomic(&self, data: &[u8]) -> Result<(), ServiceError> {
        let file_name = self
            .file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        let tmp_path = self.file_path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        fs::write(&tmp_path, data)
            .await
            .map_err(|e| ServiceError::storage("write", &tmp_path, e))?;
        if let Err(e) = fs::rename(&tmp_path, &self.file_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ServiceError::storage("replace", &self.file_path, e));
        }
        Ok(())
    }

    async fn reset_corrupt(&self, reason: serde_json::Error) -> Result<Vec<Employee>, ServiceError> {
        match self.on_corrupt {
            CorruptPolicy::Reset => {
                // Whatever the file held is gone after this write.
                warn!(path = %self.file_path.display(), err = %reason, "data file is corrupt; resetting to an empty list");
                STORE_RESETS_TOTAL.inc();
                self.write_atomic(EMPTY_LIST).await?;
                Ok(Vec::new())
            }
            CorruptPolicy::Fail => Err(ServiceError::Corrupt {
                path: self.file_path.display().to_string(),
                reason: reason.to_string(),
            }),
        }
    }
}

#[async_trait]
impl EmployeeStore for JsonFileStore {
    async fn ensure_initialized(&self) -> Result<(), ServiceError> {
        if let Some(parent) = self.file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ServiceError::storage("create directory", parent, e))?;
        }
        match fs::metadata(&self.file_path).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "creating empty data file");
                self.write_atomic(EMPTY_LIST).await
            }
            Err(e) => Err(ServiceError::storage("stat", &self.file_path, e)),
        }
    }

    async fn load(&self) -> Result<Vec<Employee>, ServiceError> {
        self.ensure_initialized().await?;
        let content = fs::read_to_string(&self.file_path)
            .await
            .map_err(|e| ServiceError::storage("read", &self.file_path, e))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Vec<Employee>>(&content) {
            Ok(list) => Ok(list),
            Err(e) => self.reset_corrupt(e).await,
        }
    }

    async fn save(&self, employees: &[Employee]) -> Result<(), ServiceError> {
        self.ensure_initialized().await?;
        let data = self.encode(employees)?;
        self.write_atomic(&data).await
    }
}
