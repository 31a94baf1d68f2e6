use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{error, info};
use url::form_urlencoded;

use crate::config::Config;
use crate::navigation::Category;
use crate::parser::{parse_items, FeedItem, ParseError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}")]
    Status { url: String, status: StatusCode },
}

/// Anything that turns a feed request into no items.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Which aggregator feed to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Top,
    Category(Category),
    /// Free-text topic as typed by the user
    Search(String),
}

/// Form-encode a search topic for the `q` parameter. Spaces become `+`.
pub fn search_query_term(topic: &str) -> String {
    form_urlencoded::byte_serialize(topic.as_bytes()).collect()
}

pub struct Fetcher {
    client: Client,
    base_url: String,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn feed_url(&self, source: &FeedSource) -> String {
        match source {
            FeedSource::Top => format!("{}/rss", self.base_url),
            FeedSource::Category(category) => format!(
                "{}/news/rss/headlines/section/topic/{}",
                self.base_url, category
            ),
            FeedSource::Search(topic) => format!(
                "{}/rss/search?q={}",
                self.base_url,
                search_query_term(topic)
            ),
        }
    }

    /// GET `url` and return the body. Non-2xx responses are errors.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request_error = |source: reqwest::Error| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let bytes = response.bytes().await.map_err(request_error)?;
        Ok(bytes.to_vec())
    }

    /// Fetch and parse one feed.
    pub async fn load(&self, source: &FeedSource) -> Result<Vec<FeedItem>, FeedError> {
        let url = self.feed_url(source);
        info!("Fetching feed: {}", url);

        let bytes = self.fetch(&url).await.inspect_err(|e| {
            error!("Failed to fetch feed '{}': {}", url, e);
        })?;
        let items = parse_items(&bytes).inspect_err(|e| {
            error!("Failed to parse feed '{}': {}", url, e);
        })?;

        info!("Parsed {} items from '{}'", items.len(), url);
        Ok(items)
    }
}
