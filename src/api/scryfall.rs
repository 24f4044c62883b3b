//! Scryfall API client.
//!
//! Blocking reqwest client. Requests to the API host are paced so consecutive
//! calls stay at least `Config::request_delay` apart; image downloads from the
//! CDN are not paced.

use std::cell::Cell;
use std::thread;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::{Face, Printing, RelatedPart};

/// Scryfall card object (only the fields we use)
#[derive(Debug, Deserialize, Clone)]
pub struct ScryfallCard {
    pub name: String,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub set_name: String,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default)]
    pub released_at: Option<NaiveDate>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    /// For double-faced cards, images are in card_faces
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
    #[serde(default)]
    pub all_parts: Option<Vec<RelatedCard>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ImageUris {
    pub small: Option<String>,
    pub normal: Option<String>,
    pub large: Option<String>,
    pub png: Option<String>,
}

impl ImageUris {
    /// Best print-quality JPEG: large, then normal, then png
    pub fn print_uri(&self) -> Option<&str> {
        self.large
            .as_deref()
            .or(self.normal.as_deref())
            .or(self.png.as_deref())
    }

    fn to_face(&self, index: usize) -> Option<Face> {
        Some(Face {
            index,
            image_uri_small: self.small.clone(),
            image_uri_large: self.print_uri()?.to_string(),
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RelatedCard {
    pub name: String,
    pub component: String,
    pub uri: String,
}

/// Paginated list object returned by /cards/search
#[derive(Debug, Deserialize)]
pub struct ScryfallList {
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// Scryfall API error response
#[derive(Debug, Deserialize)]
pub struct ScryfallError {
    pub code: String,
    pub details: String,
}

impl ScryfallCard {
    /// Related cards other than this one
    pub fn related_parts(&self) -> Vec<RelatedPart> {
        self.all_parts
            .iter()
            .flatten()
            .filter(|part| part.name != self.name)
            .map(|part| RelatedPart {
                name: part.name.clone(),
                component: part.component.clone(),
                uri: part.uri.clone(),
            })
            .collect()
    }

    /// Convert into a `Printing`.
    ///
    /// A card with a top-level image is single-faced even when it has
    /// `card_faces` (split, adventure and flip cards). Without a top-level
    /// image, the first two faces carrying images make it double-faced.
    pub fn into_printing(self) -> Result<Printing> {
        let faces = match self.image_uris.as_ref() {
            Some(uris) => uris.to_face(0).into_iter().collect(),
            None => self
                .card_faces
                .iter()
                .flatten()
                .filter_map(|face| face.image_uris.as_ref())
                .take(2)
                .enumerate()
                .filter_map(|(index, uris)| uris.to_face(index))
                .collect::<Vec<_>>(),
        };

        if faces.is_empty() {
            return Err(Error::NoImageAvailable(self.name));
        }

        let related = self.related_parts();
        Ok(Printing {
            is_double_faced: faces.len() == 2,
            faces,
            related,
            name: self.name,
            set_code: self.set,
            set_name: self.set_name,
            collector_number: self.collector_number,
            release_date: self.released_at,
        })
    }
}

pub struct ScryfallClient {
    client: Client,
    base_url: String,
    request_delay: Duration,
    last_request: Cell<Option<Instant>>,
}

impl ScryfallClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base.trim_end_matches('/').to_string(),
            request_delay: config.request_delay,
            last_request: Cell::new(None),
        })
    }

    /// Sleep until at least `request_delay` has passed since the last API call
    fn pace(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.request_delay {
                thread::sleep(self.request_delay - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }

    fn get_api(&self, url: &str, query: &[(&str, &str)]) -> Result<Response> {
        self.pace();
        log::info!("Fetching from Scryfall: {} {:?}", url, query);
        Ok(self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT, "application/json")
            .send()?)
    }

    /// Decode a successful response, mapping 404 to `not_found`
    fn decode<T: DeserializeOwned>(response: Response, not_found: impl FnOnce() -> Error) -> Result<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(not_found());
        }

        let body = response.text()?;
        if status.is_success() {
            return Ok(serde_json::from_str::<T>(&body)?);
        }
        match serde_json::from_str::<ScryfallError>(&body) {
            Ok(error) => Err(Error::Api {
                code: error.code,
                details: error.details,
            }),
            Err(_) => Err(Error::HttpStatus(status)),
        }
    }

    fn named_card(&self, name: &str, set_code: Option<&str>) -> Result<ScryfallCard> {
        let url = format!("{}/cards/named", self.base_url);
        let mut query = vec![("fuzzy", name)];
        if let Some(set) = set_code {
            query.push(("set", set));
        }

        let response = self.get_api(&url, &query)?;
        Self::decode(response, || Error::card_not_found(name, set_code))
    }

    /// Resolve a card name (fuzzy) to one printing, optionally within a set
    pub fn card_by_name(&self, name: &str, set_code: Option<&str>) -> Result<Printing> {
        self.named_card(name, set_code)?.into_printing()
    }

    /// Resolve a card from a Scryfall card URI (as found in `all_parts`)
    pub fn card_by_uri(&self, uri: &str) -> Result<Printing> {
        let response = self.get_api(uri, &[])?;
        let card: ScryfallCard = Self::decode(response, || Error::card_not_found(uri, None))?;
        card.into_printing()
    }

    /// All printings of an exact card name, oldest first.
    ///
    /// Follows pagination until the results are exhausted or `limit` is reached.
    pub fn search_printings(&self, name: &str, limit: Option<usize>) -> Result<Vec<Printing>> {
        let url = format!("{}/cards/search", self.base_url);
        let exact = exact_name_query(name);
        let query = [
            ("q", exact.as_str()),
            ("unique", "prints"),
            ("order", "released"),
            ("dir", "asc"),
        ];

        let mut response = self.get_api(&url, &query)?;
        let mut printings = Vec::new();

        loop {
            let page: ScryfallList = Self::decode(response, || Error::card_not_found(name, None))?;
            for card in page.data {
                let card_name = card.name.clone();
                match card.into_printing() {
                    Ok(printing) => printings.push(printing),
                    Err(e) => log::warn!("Skipping printing of {}: {}", card_name, e),
                }
            }

            if limit.is_some_and(|limit| printings.len() >= limit) {
                break;
            }
            match page.next_page {
                Some(next) if page.has_more => response = self.get_api(&next, &[])?,
                _ => break,
            }
        }

        if let Some(limit) = limit {
            printings.truncate(limit);
        }
        Ok(printings)
    }

    /// Tokens, meld pieces and other cards linked from the named card
    pub fn related_parts(&self, name: &str) -> Result<Vec<RelatedPart>> {
        Ok(self.named_card(name, None)?.related_parts())
    }

    /// Fetch image bytes
    pub fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        log::debug!("Fetching image: {}", url);

        let response = self.client.get(url).send()?;

        if response.status().is_success() {
            Ok(response.bytes()?.to_vec())
        } else {
            Err(Error::HttpStatus(response.status()))
        }
    }
}

/// Scryfall exact-name search term; quotes inside the name are backslash-escaped
fn exact_name_query(name: &str) -> String {
    format!("!\"{}\"", name.replace('"', "\\\""))
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
