use crate::core::{Reservation, ReservationStore, Result};
use crate::utils::error::BookingError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Reservations kept as one JSON array on disk.
///
/// A missing file reads as an empty store. Every insert rewrites the whole
/// file while holding the write side of `file_lock`; reads take the read
/// side, so a reader never sees the file mid-rewrite.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    file_lock: RwLock<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_all(&self) -> Result<Vec<Reservation>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Store file {} not found, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if data.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&data).map_err(|e| BookingError::Store {
            message: format!("{} is not a valid reservation list: {}", self.path.display(), e),
        })
    }

    async fn save_all(&self, reservations: &[Reservation]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let data = serde_json::to_vec_pretty(reservations)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl ReservationStore for JsonFileStore {
    async fn list_for_resource(&self, resource_id: &str) -> Result<Vec<Reservation>> {
        let all = {
            let _guard = self.file_lock.read().await;
            self.load_all().await?
        };
        Ok(all
            .into_iter()
            .filter(|r| r.resource_id == resource_id)
            .collect())
    }

    async fn insert(&self, reservation: Reservation) -> Result<()> {
        let _guard = self.file_lock.write().await;
        let mut all = self.load_all().await?;
        all.push(reservation);
        self.save_all(&all).await?;
        tracing::debug!("Wrote {} reservation(s) to {}", all.len(), self.path.display());
        Ok(())
    }
}
