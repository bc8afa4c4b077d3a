mod cli;
mod infra;
mod parse;
mod scrape;

use newport_listings::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
