use anyhow::Result;
use shortlet_conflict::{
    BookingDecision, BookingError, BookingRequest, BookingService, InMemoryStore,
    IntervalConflictChecker, ReservationStore,
};
use std::sync::Arc;

fn service() -> BookingService<InMemoryStore> {
    BookingService::new(InMemoryStore::new(), IntervalConflictChecker::default())
}

#[tokio::test]
async fn test_overlapping_booking_is_rejected_with_conflict() -> Result<()> {
    let service = service();

    let first = service
        .book(BookingRequest::new("listing-1", "2024-01-10", "2024-01-15").with_guest("Ada"))
        .await?;
    let BookingDecision::Accepted(first) = first else {
        panic!("first booking should be accepted");
    };

    let second = service
        .book(BookingRequest::new("listing-1", "2024-01-14", "2024-01-20"))
        .await?;
    assert_eq!(second, BookingDecision::Rejected { conflict: first });
    assert_eq!(service.store().list_for_resource("listing-1").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_back_to_back_bookings_are_accepted() -> Result<()> {
    let service = service();

    assert!(service
        .book(BookingRequest::new("listing-1", "2024-01-10", "2024-01-15"))
        .await?
        .is_accepted());
    assert!(service
        .book(BookingRequest::new("listing-1", "2024-01-15", "2024-01-20"))
        .await?
        .is_accepted());
    assert!(service
        .book(BookingRequest::new("listing-1", "2024-01-05", "2024-01-10"))
        .await?
        .is_accepted());
    Ok(())
}

#[tokio::test]
async fn test_same_dates_on_other_listing_are_accepted() -> Result<()> {
    let service = service();

    assert!(service
        .book(BookingRequest::new("listing-1", "2024-01-10", "2024-01-15"))
        .await?
        .is_accepted());
    assert!(service
        .book(BookingRequest::new("listing-2", "2024-01-10", "2024-01-15"))
        .await?
        .is_accepted());
    Ok(())
}

#[tokio::test]
async fn test_check_does_not_write() -> Result<()> {
    let service = service();
    let request = BookingRequest::new("listing-1", "2024-01-10", "2024-01-15");

    assert!(service.check(&request).await?.is_none());
    assert!(service.store().list_for_resource("listing-1").await?.is_empty());

    service.book(request.clone()).await?;
    let conflict = service.check(&request).await?;
    assert!(conflict.is_some());
    Ok(())
}

#[tokio::test]
async fn test_invalid_requests_are_validation_errors() {
    let service = service();

    let err = service
        .book(BookingRequest::new("listing-1", "2024-01-10", "2024-01-10"))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidInterval { .. }));

    let err = service
        .book(BookingRequest::new("listing-1", "yesterday", "2024-01-10"))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::InvalidDate { .. }));

    let err = service
        .book(BookingRequest::new("  ", "2024-01-10", "2024-01-12"))
        .await
        .unwrap_err();
    assert!(matches!(err, BookingError::Validation { .. }));
    assert!(err.is_validation());
}

#[tokio::test]
async fn test_timestamps_are_truncated_before_checking() -> Result<()> {
    let service = service();

    service
        .book(BookingRequest::new(
            "listing-1",
            "2024-01-10T15:00:00Z",
            "2024-01-15T11:00:00Z",
        ))
        .await?;

    // 同一天退房/入住不算衝突
    let decision = service
        .book(BookingRequest::new(
            "listing-1",
            "2024-01-15T16:00:00+01:00",
            "2024-01-17",
        ))
        .await?;
    assert!(decision.is_accepted());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_overlapping_bookings_accept_exactly_one() -> Result<()> {
    let service = Arc::new(service());

    let mut handles = Vec::new();
    for i in 0..16 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(async move {
            let check_in = format!("2024-08-{:02}", 1 + i % 3);
            service
                .book(BookingRequest::new("listing-1", check_in, "2024-08-10"))
                .await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        if handle.await??.is_accepted() {
            accepted += 1;
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(service.store().list_for_resource("listing-1").await?.len(), 1);
    Ok(())
}
