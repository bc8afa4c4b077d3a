use crate::config::ProxyConfig;
use reqwest::blocking::Client;
use reqwest::{Proxy, StatusCode};
use serde::Serialize;
use tracing::{debug, info};

pub const LANDING_URL: &str = "https://www.newportrentals.com/apartments-jersey-city-for-rent/";
pub const UNIT_LIST_URL: &str = "https://www.newportrentals.com/ajax/getunitlist.asp";

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("invalid proxy url '{url}': {source}")]
    Proxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: StatusCode },
}

/// Supplier of unit-list pages, numbered from 1.
pub trait PageSource {
    /// Called once before the first page is requested.
    fn warm_up(&mut self) -> Result<(), FetchError> {
        Ok(())
    }

    /// Returns the raw body for `page`; an empty body means no more pages.
    fn fetch_page(&mut self, page: u32) -> Result<String, FetchError>;
}

/// Form fields posted to the unit-list endpoint. Defaults mirror the site's
/// unfiltered search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    pub bedrooms: String,
    pub price_min: u32,
    pub is_default_min_price: bool,
    pub price_max: u32,
    pub is_default_max_price: bool,
    pub buildings: String,
    pub move_in_date: String,
    pub available_now_only: u8,
    pub page: u32,
    pub last_num: String,
    pub sort: String,
    pub number_per_page: String,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            bedrooms: String::new(),
            price_min: 1000,
            is_default_min_price: true,
            price_max: 20000,
            is_default_max_price: true,
            buildings: String::new(),
            move_in_date: String::new(),
            available_now_only: 0,
            page: 1,
            last_num: String::new(),
            sort: String::new(),
            number_per_page: "undefined".to_string(),
        }
    }
}

impl ListingQuery {
    pub fn for_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// Blocking client for the Newport Rentals unit-list endpoint.
#[derive(Debug)]
pub struct NewportClient {
    client: Client,
    query: ListingQuery,
    landing_url: String,
    unit_list_url: String,
}

impl NewportClient {
    pub fn new(proxy: &ProxyConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder().user_agent(USER_AGENT).cookie_store(true);

        if proxy.enabled {
            let route = Proxy::all(&proxy.url).map_err(|source| FetchError::Proxy {
                url: proxy.url.clone(),
                source,
            })?;
            builder = builder.proxy(route).danger_accept_invalid_certs(true);
            info!(proxy = %proxy.url, "routing listing requests through debugging proxy");
        }

        let client = builder.build().map_err(FetchError::Client)?;
        Ok(Self {
            client,
            query: ListingQuery::default(),
            landing_url: LANDING_URL.to_string(),
            unit_list_url: UNIT_LIST_URL.to_string(),
        })
    }

    fn checked_text(
        url: &str,
        response: reqwest::blocking::Response,
    ) -> Result<String, FetchError> {
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.text().map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })
    }
}

impl PageSource for NewportClient {
    fn warm_up(&mut self) -> Result<(), FetchError> {
        let response = self
            .client
            .get(&self.landing_url)
            .send()
            .map_err(|source| FetchError::Request {
                url: self.landing_url.clone(),
                source,
            })?;
        Self::checked_text(&self.landing_url, response)?;
        debug!(url = %self.landing_url, "landing page loaded");
        Ok(())
    }

    fn fetch_page(&mut self, page: u32) -> Result<String, FetchError> {
        let response = self
            .client
            .post(&self.unit_list_url)
            .form(&self.query.for_page(page))
            .send()
            .map_err(|source| FetchError::Request {
                url: self.unit_list_url.clone(),
                source,
            })?;
        Self::checked_text(&self.unit_list_url, response)
    }
}
