use crate::infra::build_sinks;
use chrono::Local;
use clap::Args;
use newport_listings::config::AppConfig;
use newport_listings::error::AppError;
use newport_listings::telemetry;
use newport_listings::workflows::listings::{FragmentSource, ListingPaginator, NewportClient};
use newport_listings::workflows::units::UnitExtractor;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ScrapeArgs {
    /// Route listing requests through the debugging proxy (TLS verification off)
    #[arg(long)]
    pub(crate) proxy: bool,
    /// Override the debugging proxy URL
    #[arg(long)]
    pub(crate) proxy_url: Option<String>,
    /// Skip the dated CSV export
    #[arg(long)]
    pub(crate) no_csv: bool,
    /// Override the CSV file name prefix (may include directories)
    #[arg(long)]
    pub(crate) csv_prefix: Option<String>,
    /// Append the units to the configured Google Sheets worksheet
    #[arg(long)]
    pub(crate) sheets: bool,
    /// Override the worksheet name
    #[arg(long)]
    pub(crate) sheet_name: Option<String>,
    /// Seconds to wait before each page request after the first
    #[arg(long)]
    pub(crate) page_delay_secs: Option<u64>,
    /// Read listings from element text or the button accessibility label
    #[arg(long)]
    pub(crate) fragment_source: Option<FragmentSource>,
}

impl ScrapeArgs {
    fn apply(self, config: &mut AppConfig) {
        if self.proxy {
            config.proxy.enabled = true;
        }
        if let Some(url) = self.proxy_url {
            config.proxy.url = url;
        }
        if self.no_csv {
            config.csv.enabled = false;
        }
        if let Some(prefix) = self.csv_prefix {
            config.csv.path_prefix = prefix;
        }
        if self.sheets {
            config.sheets.enabled = true;
        }
        if let Some(sheet_name) = self.sheet_name {
            config.sheets.sheet_name = sheet_name;
        }
        if let Some(secs) = self.page_delay_secs {
            config.scrape.page_delay = Duration::from_secs(secs);
        }
        if let Some(source) = self.fragment_source {
            config.scrape.fragment_source = source;
        }
    }
}

pub(crate) fn run_scrape(args: ScrapeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    args.apply(&mut config);
    config.validate()?;

    telemetry::init(&config.telemetry)?;

    let sinks = build_sinks(&config)?;
    let client = NewportClient::new(&config.proxy)?;
    let mut paginator = ListingPaginator::new(client, config.scrape.fragment_source)
        .with_page_delay(config.scrape.page_delay);

    info!(
        fragment_source = %config.scrape.fragment_source,
        proxy = config.proxy.enabled,
        "starting listing scrape"
    );
    let outcome = paginator.scrape_units(&UnitExtractor)?;

    let run_at = Local::now();
    for sink in &sinks {
        sink.publish(&outcome.records, run_at)?;
        info!(sink = sink.name(), units = outcome.records.len(), "export finished");
    }

    println!(
        "Scraped {} units across {} pages ({} outputs written)",
        outcome.records.len(),
        outcome.pages,
        sinks.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use newport_listings::config::{
        CsvOutputConfig, ProxyConfig, ScrapeConfig, SheetsOutputConfig, TelemetryConfig,
    };

    fn base_config() -> AppConfig {
        AppConfig {
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            scrape: ScrapeConfig {
                page_delay: Duration::from_secs(2),
                fragment_source: FragmentSource::AriaLabel,
            },
            proxy: ProxyConfig::default(),
            csv: CsvOutputConfig {
                enabled: true,
                path_prefix: "units_".to_string(),
            },
            sheets: SheetsOutputConfig {
                enabled: false,
                file_id: Some("sheet-123".to_string()),
                sheet_name: "Units".to_string(),
                credentials_path: None,
            },
        }
    }

    #[test]
    fn flags_override_loaded_config() {
        let mut config = base_config();
        let args = ScrapeArgs {
            proxy: true,
            no_csv: true,
            sheets: true,
            sheet_name: Some("August".to_string()),
            page_delay_secs: Some(0),
            fragment_source: Some(FragmentSource::TextContent),
            ..ScrapeArgs::default()
        };
        args.apply(&mut config);

        assert!(config.proxy.enabled);
        assert!(!config.csv.enabled);
        assert!(config.sheets.enabled);
        assert_eq!(config.sheets.sheet_name, "August");
        assert_eq!(config.scrape.page_delay, Duration::ZERO);
        assert_eq!(config.scrape.fragment_source, FragmentSource::TextContent);
        assert!(config.validate().is_err());
    }

    #[test]
    fn no_flags_keep_loaded_config() {
        let mut config = base_config();
        ScrapeArgs::default().apply(&mut config);
        assert_eq!(config, base_config());
    }
}
