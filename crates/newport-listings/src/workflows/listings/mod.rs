mod fetcher;
mod fragments;

pub use fetcher::{
    FetchError, ListingQuery, NewportClient, PageSource, LANDING_URL, UNIT_LIST_URL,
};
pub use fragments::{extract_fragments, FragmentSource};

use crate::workflows::units::{ExtractionError, UnitExtractor, UnitRecord};
use std::time::Duration;
use tracing::info;

/// Pause before each page request after the first.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Records gathered by one complete pass over the listing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub records: Vec<UnitRecord>,
    pub pages: u32,
}

/// Walks unit-list pages in order until a page comes back empty.
#[derive(Debug)]
pub struct ListingPaginator<S> {
    source: S,
    fragment_source: FragmentSource,
    page_delay: Duration,
}

impl<S: PageSource> ListingPaginator<S> {
    pub fn new(source: S, fragment_source: FragmentSource) -> Self {
        Self {
            source,
            fragment_source,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    pub fn with_page_delay(mut self, page_delay: Duration) -> Self {
        self.page_delay = page_delay;
        self
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Hands each non-empty page's fragments to `on_page` and returns the
    /// number of pages delivered.
    pub fn paginate<F>(&mut self, mut on_page: F) -> Result<u32, ScrapeError>
    where
        F: FnMut(u32, Vec<String>) -> Result<(), ScrapeError>,
    {
        self.source.warm_up()?;

        let mut page = 1;
        loop {
            if page > 1 && !self.page_delay.is_zero() {
                std::thread::sleep(self.page_delay);
            }

            let body = self.source.fetch_page(page)?;
            if body.trim().is_empty() {
                info!(page, "empty unit list, pagination finished");
                return Ok(page - 1);
            }

            let fragments = extract_fragments(&body, self.fragment_source);
            info!(page, listings = fragments.len(), "unit list page fetched");
            on_page(page, fragments)?;
            page += 1;
        }
    }

    /// Fetches every page and extracts each listing. The first fragment that
    /// fails extraction aborts the run and nothing is returned.
    pub fn scrape_units(&mut self, extractor: &UnitExtractor) -> Result<ScrapeOutcome, ScrapeError> {
        let mut records = Vec::new();
        let pages = self.paginate(|_, fragments| {
            for fragment in &fragments {
                records.push(extractor.extract(fragment)?);
            }
            Ok(())
        })?;

        info!(pages, units = records.len(), "scrape complete");
        Ok(ScrapeOutcome { records, pages })
    }
}
