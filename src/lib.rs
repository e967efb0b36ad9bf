pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{toml_config::TomlConfig, Settings};

pub use adapters::{read_reservations_csv, InMemoryStore, JsonFileStore};
pub use core::{
    booking::{BookingDecision, BookingRequest, BookingService},
    conflict::{ConflictQuery, IntervalConflictChecker},
};
pub use domain::model::{DateOnly, Interval, Occupancy, RawDate, Reservation};
pub use domain::ports::ReservationStore;
pub use utils::error::{BookingError, Result};
