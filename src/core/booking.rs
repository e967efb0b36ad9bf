use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::core::conflict::IntervalConflictChecker;
use crate::domain::model::{Interval, RawDate, Reservation};
use crate::domain::ports::ReservationStore;
use crate::utils::error::{BookingError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub resource_id: String,
    pub check_in: RawDate,
    pub check_out: RawDate,
    pub guest: Option<String>,
}

impl BookingRequest {
    pub fn new(
        resource_id: impl Into<String>,
        check_in: impl Into<RawDate>,
        check_out: impl Into<RawDate>,
    ) -> Self {
        Self {
            resource_id: resource_id.into(),
            check_in: check_in.into(),
            check_out: check_out.into(),
            guest: None,
        }
    }

    pub fn with_guest(mut self, guest: impl Into<String>) -> Self {
        self.guest = Some(guest.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingDecision {
    Accepted(Reservation),
    Rejected { conflict: Reservation },
}

impl BookingDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, BookingDecision::Accepted(_))
    }
}

/// Fetch-check-write around a [`ReservationStore`].
///
/// `book` holds a per-resource async lock for the whole sequence, so two
/// overlapping requests for the same listing cannot both commit within this
/// process. A listing's lock is dropped from the table once no booking for it
/// is in flight.
pub struct BookingService<S: ReservationStore> {
    store: S,
    checker: IntervalConflictChecker,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S: ReservationStore> BookingService<S> {
    pub fn new(store: S, checker: IntervalConflictChecker) -> Self {
        Self {
            store,
            checker,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn checker(&self) -> &IntervalConflictChecker {
        &self.checker
    }

    /// Report the first existing reservation that clashes, without writing.
    pub async fn check(&self, request: &BookingRequest) -> Result<Option<Reservation>> {
        let candidate = self.candidate(request)?;
        let existing = self.store.list_for_resource(&request.resource_id).await?;
        tracing::debug!(
            "Checking {} against {} reservation(s) on {}",
            candidate,
            existing.len(),
            request.resource_id
        );
        Ok(self.checker.find_conflict(&candidate, &existing).cloned())
    }

    pub async fn book(&self, request: BookingRequest) -> Result<BookingDecision> {
        let candidate = self.candidate(&request)?;
        let resource_id = request.resource_id.clone();

        let lock = self.resource_lock(&resource_id)?;
        let decision = {
            let _guard = lock.lock().await;
            self.commit_if_free(candidate, request).await
        };
        self.release_lock(&resource_id, lock);
        decision
    }

    async fn commit_if_free(
        &self,
        candidate: Interval,
        request: BookingRequest,
    ) -> Result<BookingDecision> {
        let existing = self.store.list_for_resource(&request.resource_id).await?;
        if let Some(conflict) = self.checker.find_conflict(&candidate, &existing) {
            tracing::info!(
                "Rejected {} on {}: overlaps reservation {} ({})",
                candidate,
                request.resource_id,
                conflict.id,
                conflict.interval
            );
            return Ok(BookingDecision::Rejected {
                conflict: conflict.clone(),
            });
        }

        let reservation = Reservation::new(request.resource_id, candidate, request.guest);
        self.store.insert(reservation.clone()).await?;
        tracing::info!(
            "Accepted reservation {} on {} for {} night(s)",
            reservation.id,
            reservation.resource_id,
            reservation.interval.nights()
        );
        Ok(BookingDecision::Accepted(reservation))
    }

    fn candidate(&self, request: &BookingRequest) -> Result<Interval> {
        if request.resource_id.trim().is_empty() {
            tracing::warn!("Booking request without resource id");
            return Err(BookingError::Validation {
                message: "A listing id is required".to_string(),
            });
        }

        self.checker
            .interval(request.check_in.clone(), request.check_out.clone())
            .inspect_err(|e| tracing::warn!("Invalid booking dates: {}", e))
    }

    fn resource_lock(&self, resource_id: &str) -> Result<Arc<tokio::sync::Mutex<()>>> {
        let mut locks = self.locks.lock().map_err(|_| BookingError::Store {
            message: "Resource lock table poisoned".to_string(),
        })?;
        Ok(locks
            .entry(resource_id.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone())
    }

    /// Clones are only handed out under the table mutex, so a count of two
    /// (table + ours) means nobody else holds or waits on this lock.
    fn release_lock(&self, resource_id: &str, lock: Arc<tokio::sync::Mutex<()>>) {
        if let Ok(mut locks) = self.locks.lock() {
            if Arc::strong_count(&lock) == 2 {
                locks.remove(resource_id);
            }
        }
    }
}
