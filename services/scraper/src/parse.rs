use clap::Args;
use newport_listings::config::TelemetryConfig;
use newport_listings::error::AppError;
use newport_listings::telemetry;
use newport_listings::workflows::units::{UnitExtractor, UnitRecord};

#[derive(Args, Debug)]
pub(crate) struct ParseArgs {
    /// Listing sentences, e.g. the aria-label of a unit's button
    #[arg(required = true)]
    pub(crate) fragments: Vec<String>,
    /// Print one compact JSON object per line instead of a pretty array
    #[arg(long)]
    pub(crate) lines: bool,
}

pub(crate) fn run_parse(args: ParseArgs) -> Result<(), AppError> {
    telemetry::init(&TelemetryConfig {
        log_level: "warn".to_string(),
    })?;

    let records = extract(&args.fragments)?;
    if args.lines {
        for record in &records {
            println!("{}", serde_json::to_string(record)?);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }
    Ok(())
}

fn extract(fragments: &[String]) -> Result<Vec<UnitRecord>, AppError> {
    Ok(UnitExtractor.extract_all(fragments.iter().map(String::as_str))?)
}
