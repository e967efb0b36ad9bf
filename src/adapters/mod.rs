// Adapters layer: concrete reservation stores and import formats.

pub mod csv_import;
pub mod json_file;
pub mod memory;

pub use csv_import::read_reservations_csv;
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
