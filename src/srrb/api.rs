use super::dto;
use super::model::{PostSummary, StreamInfo};
use crate::config::model::Config;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use tracing::{debug, instrument, warn};

/// Client for the srrb.ru listing and its event detail pages. One instance is
/// built per run and shared read-only across the fan-out workers.
pub struct SrrbAPI {
    client: ClientWithMiddleware,
    listing_url: String,
}

#[derive(Debug)]
pub enum ListingError {
    Unreachable,
}

impl SrrbAPI {
    pub fn new(config: &Config) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static(config.accept_language),
        );

        let client = Client::builder()
            .user_agent(config.user_agent)
            .default_headers(headers)
            .timeout(config.request_timeout)
            // Some srrb.ru mirrors serve a broken certificate chain.
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .expect("Failed to build the HTTP client");

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(
                ExponentialBackoff::builder().build_with_max_retries(config.max_retries),
            ))
            .build();

        Self {
            client,
            listing_url: config.listing_url.to_string(),
        }
    }

    /**
    Fetches the listing page and returns every event fragment on it. An empty
    page is a valid (empty) result; only failing to load the page at all is an
    error.
    */
    #[instrument(skip(self), fields(url = %self.listing_url))]
    pub async fn get_listing(&self) -> Result<Vec<PostSummary>, ListingError> {
        let html = self
            .get_page(&self.listing_url)
            .await
            .ok_or(ListingError::Unreachable)?;

        Ok(dto::parse_listing(&html))
    }

    /// Fetches one detail page. Transport failures degrade to an empty
    /// [`StreamInfo`]; they never surface to the caller.
    #[instrument(skip(self))]
    pub async fn get_stream_info(&self, url: &str) -> StreamInfo {
        match self.get_page(url).await {
            Some(html) => dto::parse_stream_info(&html),
            None => StreamInfo::default(),
        }
    }

    async fn get_page(&self, url: &str) -> Option<String> {
        debug!("Loading {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                warn!("Failed to load {}: {}", url, err);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(err) => {
                warn!("Failed to load {}: {}", url, err);
                return None;
            }
        };

        match response.text().await {
            Ok(body) => Some(body),
            Err(err) => {
                warn!("Failed to read the body of {}: {}", url, err);
                None
            }
        }
    }
}
