use crate::domain::model::Reservation;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of existing reservations and sink for accepted ones.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn list_for_resource(&self, resource_id: &str) -> Result<Vec<Reservation>>;
    async fn insert(&self, reservation: Reservation) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn store_path(&self) -> &str;
    fn utc_offset_minutes(&self) -> i32;
}
