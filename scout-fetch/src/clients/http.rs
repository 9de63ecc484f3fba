//! JSON-over-HTTP listing and detail client
//!
//! - Listing: `GET {base_url}{list_route}[?token=<cursor>]` →
//!   `{ "result": [id, ..], "token": "next" | null }`
//! - Detail: `GET {base_url}{detail_route}/{id}` →
//!   `{ "id": .., "name": .., "age": .., "number": .. }`

use super::{DetailClient, DetailError, ListingClient, ListingError};
use crate::model::{Cursor, DetailRecord, ListingPage};
use reqwest::{StatusCode, Url};
use scout_common::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = concat!("scout-fetch/", env!("CARGO_PKG_VERSION"));

/// Endpoint and transport settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub base_url: String,
    pub list_route: String,
    pub detail_route: String,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct ListingResponse {
    /// Required: a body without it is a parse failure, not an empty page
    result: Vec<String>,
    #[serde(default)]
    token: Option<String>,
}

/// Client for both collaborator endpoints
#[derive(Debug, Clone)]
pub struct HttpClient {
    http_client: reqwest::Client,
    list_url: Url,
    detail_base: Url,
}

impl HttpClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            Error::Config(format!("Invalid base_url '{}': {}", config.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base_url must be a hierarchical URL: {}",
                config.base_url
            )));
        }
        let list_url = route_url(&base, &config.list_route);
        let detail_base = route_url(&base, &config.detail_route);

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Internal(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            http_client,
            list_url,
            detail_base,
        })
    }

    /// Detail URL with the identifier appended as one escaped path segment
    pub fn detail_url(&self, id: &str) -> Url {
        let mut url = self.detail_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    pub fn list_url(&self) -> &Url {
        &self.list_url
    }
}

/// Append `route` to the path of `base`, keeping any prefix such as `/v1`
fn route_url(base: &Url, route: &str) -> Url {
    let mut url = base.clone();
    let path = format!(
        "{}/{}",
        base.path().trim_end_matches('/'),
        route.trim_start_matches('/')
    );
    url.set_path(&path);
    url
}

#[async_trait::async_trait]
impl ListingClient for HttpClient {
    async fn list(
        &self,
        cursor: Option<&Cursor>,
    ) -> std::result::Result<ListingPage, ListingError> {
        let mut request = self.http_client.get(self.list_url.clone());
        if let Some(cursor) = cursor {
            request = request.query(&[("token", cursor.as_str())]);
        }

        tracing::debug!(
            url = %self.list_url,
            cursor = ?cursor.map(Cursor::as_str),
            "Requesting listing page"
        );

        let response = request
            .send()
            .await
            .map_err(|e| ListingError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ListingError::Api(status.as_u16(), error_text));
        }

        let body: ListingResponse = response
            .json()
            .await
            .map_err(|e| ListingError::Parse(e.to_string()))?;

        Ok(ListingPage {
            ids: body.result,
            next: Cursor::from_token(body.token),
        })
    }
}

#[async_trait::async_trait]
impl DetailClient for HttpClient {
    async fn detail(&self, id: &str) -> std::result::Result<DetailRecord, DetailError> {
        let url = self.detail_url(id);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| DetailError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DetailError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(DetailError::Api(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DetailError::Network(e.to_string()))?;

        decode_detail(&bytes)
    }
}

/// Decode a detail body; `null` and undecodable bodies are malformed
pub fn decode_detail(body: &[u8]) -> std::result::Result<DetailRecord, DetailError> {
    match serde_json::from_slice::<Option<DetailRecord>>(body) {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(DetailError::Malformed("null body".to_string())),
        Err(e) => Err(DetailError::Malformed(e.to_string())),
    }
}
