use super::{ExportError, RecordSink};
use crate::workflows::units::{UnitField, UnitRecord};
use chrono::{DateTime, Local, NaiveDate};
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Writes each run to `<path_prefix><YYYY-MM-DD>.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExporter {
    path_prefix: String,
}

impl CsvExporter {
    pub fn new(path_prefix: impl Into<String>) -> Self {
        Self {
            path_prefix: path_prefix.into(),
        }
    }

    pub fn file_path(&self, run_date: NaiveDate) -> PathBuf {
        PathBuf::from(format!(
            "{}{}.csv",
            self.path_prefix,
            run_date.format("%Y-%m-%d")
        ))
    }

    /// Header row followed by one row per record. The header is written even
    /// when there are no records.
    pub fn write_records<W: Write>(writer: W, records: &[UnitRecord]) -> Result<(), csv::Error> {
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        csv_writer.write_record(UnitField::ordered().map(UnitField::column))?;
        for record in records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

impl RecordSink for CsvExporter {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn publish(&self, records: &[UnitRecord], run_at: DateTime<Local>) -> Result<(), ExportError> {
        let path = self.file_path(run_at.date_naive());
        let io_error = |source| ExportError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let file = File::create(&path).map_err(io_error)?;
        Self::write_records(file, records)?;
        info!(path = %path.display(), rows = records.len(), "unit csv written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_path_appends_run_date() {
        let exporter = CsvExporter::new("exports/units_");
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).expect("valid date");
        assert_eq!(
            exporter.file_path(date),
            PathBuf::from("exports/units_2024-09-01.csv")
        );
    }

    #[test]
    fn empty_run_still_writes_header() {
        let mut buffer = Vec::new();
        CsvExporter::write_records(&mut buffer, &[]).expect("writes");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(
            text,
            "building_name,building_address,apartment_number,bedroom_count,bathroom_count,square_footage,price,availability\n"
        );
    }
}
