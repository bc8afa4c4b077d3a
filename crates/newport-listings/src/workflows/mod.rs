pub mod export;
pub mod listings;
pub mod units;
