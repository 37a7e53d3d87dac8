//! Fallback credential medium: a JSON file next to the database.

use std::path::{Path, PathBuf};

use leadforge_domain::{CredentialRecord, Result};
use tokio::fs;

use crate::errors::InfraError;

/// Reads and writes a [`CredentialRecord`] as a JSON file.
///
/// Used when the database row is unavailable, so a broken primary store
/// never locks the operator out of the CRM connection.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored record. A missing file is simply no record.
    pub async fn read(&self) -> Result<Option<CredentialRecord>> {
        match fs::read(&self.path).await {
            Ok(bytes) => {
                let record: CredentialRecord =
                    serde_json::from_slice(&bytes).map_err(InfraError::from)?;
                Ok(Some(record).filter(|r| !r.is_empty()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }

    /// Persist the full record, replacing any previous file content.
    pub async fn write(&self, record: &CredentialRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(InfraError::from)?;
        }
        let json = serde_json::to_vec_pretty(record).map_err(InfraError::from)?;
        fs::write(&self.path, json).await.map_err(InfraError::from)?;
        Ok(())
    }

    /// Delete the file. Already-absent is fine.
    pub async fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(InfraError::from(e).into()),
        }
    }
}
