mod csv_file;
mod sheets;

pub use csv_file::CsvExporter;
pub use sheets::{
    GoogleSheetsClient, SheetsGateway, SheetsOperationError, SheetsPublisher,
};

use crate::workflows::units::UnitRecord;
use chrono::{DateTime, Local};
use std::path::PathBuf;

/// Format of the run timestamp column appended to spreadsheet rows.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize unit rows: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Sheets(#[from] SheetsOperationError),
}

/// Destination for the records of one completed run.
pub trait RecordSink {
    fn name(&self) -> &'static str;

    fn publish(&self, records: &[UnitRecord], run_at: DateTime<Local>) -> Result<(), ExportError>;
}
