pub mod booking;
pub mod conflict;

pub use crate::domain::model::{DateOnly, Interval, Occupancy, RawDate, Reservation};
pub use crate::domain::ports::{ConfigProvider, ReservationStore};
pub use crate::utils::error::Result;
