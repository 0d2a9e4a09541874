use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("corrupt data file {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn storage(action: &str, path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        Self::Storage(format!("cannot {} {}: {}", action, path.display(), err))
    }

    /// True for faults of the backing store, as opposed to caller mistakes.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Corrupt { .. })
    }
}
