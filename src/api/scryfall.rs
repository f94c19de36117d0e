//! Blocking Scryfall API client: paged set search, set listing and image bytes.

use crate::error::{LackeyError, Result};
use crate::models::{ScryfallCard, ScryfallError, ScryfallSet, SearchPage, SetList};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Production API root
pub const SCRYFALL_API: &str = "https://api.scryfall.com";

const USER_AGENT: &str = concat!("LackeyFetch/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Scryfall `unique` search mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueMode {
    /// One entry per card name
    Cards,
    /// Every printing, so each collector number shows up
    Prints,
}

impl UniqueMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UniqueMode::Cards => "cards",
            UniqueMode::Prints => "prints",
        }
    }
}

/// Scryfall client with a fixed delay between search pages
pub struct ScryfallClient {
    client: Client,
    base_url: String,
    page_delay: Duration,
}

impl ScryfallClient {
    /// Client against the public API
    pub fn new() -> Result<Self> {
        Self::with_base_url(SCRYFALL_API)
    }

    /// Client against another API root (mock servers in tests)
    pub fn with_base_url(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            page_delay: Duration::ZERO,
        })
    }

    /// Sleep this long between successive search pages
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Fetch every card of a set, following `has_more` until the last page
    pub fn search_set(&self, set_code: &str, unique: UniqueMode) -> Result<Vec<ScryfallCard>> {
        log::info!("Fetching cards for set: {}", set_code);

        let url = format!("{}/cards/search", self.base_url);
        let query = format!("set:{}", set_code.to_lowercase());

        let mut all_cards = Vec::new();
        let mut page: u32 = 1;

        loop {
            log::info!("  Fetching page {}...", page);

            let page_param = page.to_string();
            let request = self.client.get(&url).query(&[
                ("q", query.as_str()),
                ("unique", unique.as_str()),
                ("page", page_param.as_str()),
            ]);
            let result: SearchPage = self.get_json(request).inspect_err(|e| {
                log::error!("  ERROR: {}", e);
            })?;

            let count = result.data.len();
            all_cards.extend(result.data);
            log::info!("  Got {} cards (total: {})", count, all_cards.len());

            if !result.has_more {
                break;
            }

            page += 1;
            if !self.page_delay.is_zero() {
                std::thread::sleep(self.page_delay);
            }
        }

        log::info!("Found {} cards", all_cards.len());
        Ok(all_cards)
    }

    /// Fetch the full set listing
    pub fn fetch_sets(&self) -> Result<Vec<ScryfallSet>> {
        let url = format!("{}/sets", self.base_url);
        log::debug!("Fetching set list: {}", url);

        let list: SetList = self.get_json(self.client.get(&url))?;
        if list.has_more {
            log::warn!("Set list reports more pages; only the first page is used");
        }
        Ok(list.data)
    }

    /// Fetch image bytes from an absolute URL
    pub fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("Fetching image: {}", url);

        let response = self.client.get(url).send()?;

        if response.status().is_success() {
            Ok(response.bytes()?.to_vec())
        } else {
            Err(LackeyError::HttpStatus(response.status()))
        }
    }

    fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.header(ACCEPT, "application/json").send()?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json::<T>()?);
        }

        match response.json::<ScryfallError>() {
            Ok(error) => Err(LackeyError::ApiResponse {
                code: error.code,
                details: error.details,
            }),
            Err(_) => Err(LackeyError::HttpStatus(status)),
        }
    }
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
