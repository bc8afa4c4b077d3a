use chrono::{Local, TimeZone};
use newport_listings::workflows::export::{
    CsvExporter, ExportError, RecordSink, SheetsGateway, SheetsOperationError, SheetsPublisher,
};
use newport_listings::workflows::units::{UnitExtractor, UnitRecord};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct FakeSheetsGateway {
    appended: Mutex<Vec<(String, String, Vec<Vec<String>>)>>,
    fail: bool,
}

impl SheetsGateway for FakeSheetsGateway {
    fn append_rows(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<usize, SheetsOperationError> {
        if self.fail {
            return Err(SheetsOperationError::Backend("permission denied".to_string()));
        }
        let count = rows.len();
        let mut guard = self.appended.lock().expect("sheet mutex");
        guard.push((spreadsheet_id.to_string(), sheet_name.to_string(), rows));
        Ok(count)
    }
}

fn sample_records() -> Vec<UnitRecord> {
    UnitExtractor
        .extract_all([
            "Residence 1503 in The Marbury on 28 2nd St, 2 Bedrooms 2 Bathrooms, 1,150 square feet, $4,250, Available Now",
            "Residence 201 in Liberty Towers on 33 Greene St, Studio 1 Bathroom, 550 square feet, $2,999, Available 9/1/24",
        ])
        .expect("sample fragments extract")
}

fn run_at() -> chrono::DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 8, 20, 9, 30, 0)
        .single()
        .expect("unambiguous local time")
}

#[test]
fn csv_export_writes_dated_file_with_header() {
    let dir = std::env::temp_dir().join(format!("newport-listings-{}", std::process::id()));
    let prefix = format!("{}/units_", dir.display());
    let exporter = CsvExporter::new(prefix);

    exporter
        .publish(&sample_records(), run_at())
        .expect("csv written");

    let path = dir.join("units_2024-08-20.csv");
    let contents = std::fs::read_to_string(&path).expect("csv readable");
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(
        lines[0],
        "building_name,building_address,apartment_number,bedroom_count,bathroom_count,square_footage,price,availability"
    );
    assert_eq!(lines[1], "The Marbury,28 2nd St,1503,2,2,1150,4250,now");
    assert_eq!(lines[2], "Liberty Towers,33 Greene St,201,0,1,550,2999,09/01/2024");
    assert_eq!(lines.len(), 3);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn sheets_rows_append_run_timestamp() {
    let publisher = SheetsPublisher::new(FakeSheetsGateway::default(), "sheet-123", "Units");
    publisher
        .publish(&sample_records(), run_at())
        .expect("rows appended");

    let appended = publisher.gateway().appended.lock().expect("sheet mutex");
    assert_eq!(appended.len(), 1);
    let (spreadsheet_id, sheet_name, rows) = &appended[0];
    assert_eq!(spreadsheet_id, "sheet-123");
    assert_eq!(sheet_name, "Units");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 9);
    assert_eq!(rows[0][0], "The Marbury");
    assert_eq!(rows[1][7], "09/01/2024");
    assert_eq!(rows[1][8], "2024-08-20 09:30:00");
}

#[test]
fn sheets_skip_empty_runs() {
    let publisher = SheetsPublisher::new(FakeSheetsGateway::default(), "sheet-123", "Units");
    publisher.publish(&[], run_at()).expect("nothing to do");
    assert!(publisher
        .gateway()
        .appended
        .lock()
        .expect("sheet mutex")
        .is_empty());
}

#[test]
fn sheets_failures_surface_to_caller() {
    let gateway = FakeSheetsGateway {
        fail: true,
        ..FakeSheetsGateway::default()
    };
    let records = sample_records();
    let publisher = SheetsPublisher::new(gateway, "sheet-123", "Units");

    let err = publisher
        .publish(&records, run_at())
        .expect_err("backend failure");
    assert!(matches!(err, ExportError::Sheets(SheetsOperationError::Backend(_))));
    assert_eq!(records.len(), 2);
}
