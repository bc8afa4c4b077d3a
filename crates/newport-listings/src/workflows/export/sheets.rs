use super::{ExportError, RecordSink, RUN_TIMESTAMP_FORMAT};
use crate::workflows::units::UnitRecord;
use chrono::{DateTime, Local};
use google_sheets4::api::{Scope, ValueRange};
use google_sheets4::hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use google_sheets4::hyper_util::client::legacy::connect::HttpConnector;
use google_sheets4::hyper_util::client::legacy::Client;
use google_sheets4::hyper_util::rt::TokioExecutor;
use google_sheets4::{yup_oauth2, Sheets};
use serde_json::Value;
use std::fmt::Debug;
use std::path::Path;
use tokio::runtime::Runtime;
use tracing::info;

/// Cells are stored as sent, so dates keep the `MM/DD/YYYY` text the CSV
/// carries instead of becoming locale-parsed date values.
const VALUE_INPUT_OPTION: &str = "RAW";

#[derive(Debug, thiserror::Error)]
pub enum SheetsOperationError {
    #[error("sheets operation failed: {0}")]
    Backend(String),
    #[error("sheets runtime unavailable: {0}")]
    Runtime(String),
    #[error("sheets credentials unusable: {0}")]
    Credentials(String),
}

pub trait SheetsGateway: Debug {
    /// Appends `rows` after the last filled row of `sheet_name`, returning
    /// the number of rows the service reports as written.
    fn append_rows(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<usize, SheetsOperationError>;
}

/// Thin wrapper around the generated google-sheets4 client so the sequential
/// scrape can append rows without exposing async details.
pub struct GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    hub: Sheets<C>,
    runtime: Runtime,
}

impl<C> GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: Sheets<C>, runtime: Runtime) -> Self {
        Self { hub, runtime }
    }

    fn map_error<E: std::fmt::Display>(err: E) -> SheetsOperationError {
        SheetsOperationError::Backend(err.to_string())
    }
}

impl GoogleSheetsClient<HttpsConnector<HttpConnector>> {
    /// Authenticates with a service-account key file.
    pub fn from_service_account(credentials: &Path) -> Result<Self, SheetsOperationError> {
        let runtime =
            Runtime::new().map_err(|err| SheetsOperationError::Runtime(err.to_string()))?;

        let hub = runtime.block_on(async {
            let key = yup_oauth2::read_service_account_key(credentials)
                .await
                .map_err(|err| {
                    SheetsOperationError::Credentials(format!(
                        "{}: {err}",
                        credentials.display()
                    ))
                })?;
            let auth = yup_oauth2::ServiceAccountAuthenticator::builder(key)
                .build()
                .await
                .map_err(|err| SheetsOperationError::Credentials(err.to_string()))?;

            let connector = HttpsConnectorBuilder::new()
                .with_native_roots()
                .map_err(|err| SheetsOperationError::Backend(err.to_string()))?
                .https_or_http()
                .enable_http1()
                .build();
            let client = Client::builder(TokioExecutor::new()).build(connector);

            Ok::<_, SheetsOperationError>(Sheets::new(client, auth))
        })?;

        Ok(Self::new(hub, runtime))
    }
}

impl<C> std::fmt::Debug for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient").finish_non_exhaustive()
    }
}

impl<C> SheetsGateway for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn append_rows(
        &self,
        spreadsheet_id: &str,
        sheet_name: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<usize, SheetsOperationError> {
        let range = quoted_sheet_range(sheet_name);
        let request = ValueRange {
            range: Some(range.clone()),
            major_dimension: Some("ROWS".to_string()),
            values: Some(
                rows.into_iter()
                    .map(|row| row.into_iter().map(Value::String).collect())
                    .collect(),
            ),
            ..ValueRange::default()
        };

        let result = self.runtime.block_on(async {
            self.hub
                .spreadsheets()
                .values_append(request, spreadsheet_id, &range)
                .value_input_option(VALUE_INPUT_OPTION)
                .insert_data_option("INSERT_ROWS")
                .add_scope(Scope::Spreadsheet)
                .doit()
                .await
        });

        let (_, response) = result.map_err(GoogleSheetsClient::<C>::map_error)?;
        let updated = response
            .updates
            .and_then(|updates| updates.updated_rows)
            .unwrap_or_default();
        Ok(usize::try_from(updated).unwrap_or_default())
    }
}

fn quoted_sheet_range(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

/// Appends each run to a worksheet, one row per unit plus the run timestamp.
#[derive(Debug)]
pub struct SheetsPublisher<G> {
    gateway: G,
    spreadsheet_id: String,
    sheet_name: String,
}

impl<G: SheetsGateway> SheetsPublisher<G> {
    pub fn new(
        gateway: G,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn rows(records: &[UnitRecord], run_at: DateTime<Local>) -> Vec<Vec<String>> {
        let timestamp = run_at.format(RUN_TIMESTAMP_FORMAT).to_string();
        records
            .iter()
            .map(|record| {
                let mut row = Vec::from(record.columns());
                row.push(timestamp.clone());
                row
            })
            .collect()
    }
}

impl<G: SheetsGateway> RecordSink for SheetsPublisher<G> {
    fn name(&self) -> &'static str {
        "google-sheets"
    }

    fn publish(&self, records: &[UnitRecord], run_at: DateTime<Local>) -> Result<(), ExportError> {
        if records.is_empty() {
            info!(sheet = %self.sheet_name, "no units to append");
            return Ok(());
        }

        let rows = Self::rows(records, run_at);
        let appended = self
            .gateway
            .append_rows(&self.spreadsheet_id, &self.sheet_name, rows)?;
        info!(sheet = %self.sheet_name, rows = appended, "units appended to spreadsheet");
        Ok(())
    }
}
