use crate::core::conflict::IntervalConflictChecker;
use crate::core::{Reservation, Result};
use crate::utils::error::BookingError;
use chrono::Utc;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct CsvRow {
    id: String,
    resource_id: String,
    check_in: String,
    check_out: String,
    #[serde(default)]
    guest: Option<String>,
}

/// Read `id,resource_id,check_in,check_out,guest` rows.
///
/// Dates go through the checker's `normalize`, so any form it accepts works
/// here. Row numbers in errors count the header as row 1.
pub fn read_reservations_csv<R: Read>(
    reader: R,
    checker: &IntervalConflictChecker,
) -> Result<Vec<Reservation>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut reservations = Vec::new();
    for (index, record) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row = index + 2;
        let record = record.map_err(|e| BookingError::Csv {
            row,
            message: e.to_string(),
        })?;

        let interval = checker
            .interval(record.check_in, record.check_out)
            .map_err(|e| BookingError::Csv {
                row,
                message: e.to_string(),
            })?;

        reservations.push(Reservation {
            id: record.id,
            resource_id: record.resource_id,
            interval,
            guest: record.guest.filter(|g| !g.is_empty()),
            created_at: Utc::now(),
        });
    }

    tracing::debug!("Read {} reservation(s) from CSV", reservations.len());
    Ok(reservations)
}
