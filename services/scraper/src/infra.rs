use newport_listings::config::{AppConfig, ConfigError};
use newport_listings::error::AppError;
use newport_listings::workflows::export::{
    CsvExporter, GoogleSheetsClient, RecordSink, SheetsPublisher,
};
use tracing::warn;

/// Builds the sinks enabled in `config`, in the order they are written.
pub(crate) fn build_sinks(config: &AppConfig) -> Result<Vec<Box<dyn RecordSink>>, AppError> {
    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();

    if config.csv.enabled {
        sinks.push(Box::new(CsvExporter::new(config.csv.path_prefix.clone())));
    }

    if config.sheets.enabled {
        let file_id = config
            .sheets
            .file_id
            .clone()
            .ok_or(ConfigError::MissingSetting("SHEETS_FILE_ID"))?;
        let credentials = config
            .sheets
            .credentials_path
            .as_deref()
            .ok_or(ConfigError::MissingSetting("SHEETS_CREDENTIALS"))?;

        let client = GoogleSheetsClient::from_service_account(credentials)?;
        sinks.push(Box::new(SheetsPublisher::new(
            client,
            file_id,
            config.sheets.sheet_name.clone(),
        )));
    }

    if sinks.is_empty() {
        warn!("no outputs enabled, scraped units will be discarded");
    }

    Ok(sinks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use newport_listings::config::{
        CsvOutputConfig, ProxyConfig, ScrapeConfig, SheetsOutputConfig, TelemetryConfig,
    };
    use newport_listings::workflows::listings::{FragmentSource, DEFAULT_PAGE_DELAY};

    fn config(csv: bool) -> AppConfig {
        AppConfig {
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            scrape: ScrapeConfig {
                page_delay: DEFAULT_PAGE_DELAY,
                fragment_source: FragmentSource::AriaLabel,
            },
            proxy: ProxyConfig::default(),
            csv: CsvOutputConfig {
                enabled: csv,
                path_prefix: "units_".to_string(),
            },
            sheets: SheetsOutputConfig {
                enabled: false,
                file_id: None,
                sheet_name: "Units".to_string(),
                credentials_path: None,
            },
        }
    }

    #[test]
    fn csv_sink_follows_config() {
        let sinks = build_sinks(&config(true)).expect("sinks build");
        let names: Vec<_> = sinks.iter().map(|sink| sink.name()).collect();
        assert_eq!(names, vec!["csv"]);

        assert!(build_sinks(&config(false)).expect("sinks build").is_empty());
    }

    #[test]
    fn sheets_without_destination_is_rejected() {
        let mut config = config(false);
        config.sheets.enabled = true;
        let err = build_sinks(&config).err().expect("missing file id");
        assert!(matches!(
            err,
            AppError::Config(ConfigError::MissingSetting("SHEETS_FILE_ID"))
        ));
    }
}
