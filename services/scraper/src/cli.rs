use crate::parse::{run_parse, ParseArgs};
use crate::scrape::{run_scrape, ScrapeArgs};
use clap::{Parser, Subcommand};
use newport_listings::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Newport Listings Scraper",
    about = "Collect Newport Rentals unit listings into CSV and Google Sheets",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape every listing page and export the units (default command)
    Scrape(ScrapeArgs),
    /// Extract unit records from listing sentences and print them as JSON
    Parse(ParseArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Scrape(ScrapeArgs::default()));

    match command {
        Command::Scrape(args) => run_scrape(args),
        Command::Parse(args) => run_parse(args),
    }
}
