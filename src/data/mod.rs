//! Data persistence sinks.

pub mod export;

#[cfg(feature = "storage_csv")]
pub use export::CsvExporter;
