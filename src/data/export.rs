//! CSV export of the current channel windows.
//!
//! Export is bounded by construction: it materializes the live fixed-capacity
//! ring buffers, row per channel, rather than keeping a second unbounded
//! accumulator alongside them. The first column is the channel name, followed
//! by the window's samples oldest to newest.

#[cfg(feature = "storage_csv")]
use crate::config::StorageSettings;
#[cfg(feature = "storage_csv")]
use crate::error::{ScopeError, ScopeResult};
#[cfg(feature = "storage_csv")]
use crate::telemetry::TelemetryHub;
#[cfg(feature = "storage_csv")]
use std::path::PathBuf;
#[cfg(feature = "storage_csv")]
use tracing::info;

/// Writes channel snapshots to timestamped CSV files.
#[cfg(feature = "storage_csv")]
pub struct CsvExporter {
    output_dir: PathBuf,
}

#[cfg(feature = "storage_csv")]
impl CsvExporter {
    /// Exporter rooted at the configured output directory.
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            output_dir: settings.output_dir.clone(),
        }
    }

    /// Write one row per channel into `<output_dir>/<stem>_<utc timestamp>.csv`.
    pub fn export(&self, hub: &TelemetryHub, file_stem: &str) -> ScopeResult<PathBuf> {
        if !self.output_dir.exists() {
            std::fs::create_dir_all(&self.output_dir)
                .map_err(|e| ScopeError::Storage(e.to_string()))?;
        }
        let file_name = format!(
            "{}_{}.csv",
            file_stem,
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.output_dir.join(file_name);

        let mut writer =
            csv::Writer::from_path(&path).map_err(|e| ScopeError::Storage(e.to_string()))?;
        for snapshot in hub.snapshots() {
            let mut row = Vec::with_capacity(snapshot.samples.len() + 1);
            row.push(snapshot.name.clone());
            row.extend(snapshot.samples.iter().map(|v| v.to_string()));
            writer
                .write_record(&row)
                .map_err(|e| ScopeError::Storage(e.to_string()))?;
        }
        writer
            .flush()
            .map_err(|e| ScopeError::Storage(e.to_string()))?;

        info!(path = %path.display(), "exported channel windows");
        Ok(path)
    }
}
