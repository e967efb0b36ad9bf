use crate::core::{Reservation, ReservationStore, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    reservations: RwLock<HashMap<String, Vec<Reservation>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reservations(reservations: Vec<Reservation>) -> Self {
        let mut by_resource: HashMap<String, Vec<Reservation>> = HashMap::new();
        for reservation in reservations {
            by_resource
                .entry(reservation.resource_id.clone())
                .or_default()
                .push(reservation);
        }
        Self {
            reservations: RwLock::new(by_resource),
        }
    }
}

#[async_trait]
impl ReservationStore for InMemoryStore {
    async fn list_for_resource(&self, resource_id: &str) -> Result<Vec<Reservation>> {
        let reservations = self.reservations.read().await;
        Ok(reservations.get(resource_id).cloned().unwrap_or_default())
    }

    async fn insert(&self, reservation: Reservation) -> Result<()> {
        let mut reservations = self.reservations.write().await;
        reservations
            .entry(reservation.resource_id.clone())
            .or_default()
            .push(reservation);
        Ok(())
    }
}
