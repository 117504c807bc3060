//! Blocking HTTP implementation of the backend collaborators.
//!
//! Requests run on whichever thread calls them; the board's dispatcher keeps
//! them off the UI loop by calling from worker threads.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use super::payload::decode_list;
use super::{DealsApi, StagesApi};
use crate::config::BoardConfig;
use crate::error::ApiError;
use crate::models::{Deal, DealUpdate, Stage};

const USER_AGENT: &str = concat!("deal-board/", env!("CARGO_PKG_VERSION"));

/// Deals/stages backend reached over HTTP with JSON bodies.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// Build a backend client with the configured timeouts.
    pub fn new(config: &BoardConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `{base}/deals/{id}` with `deal_id` percent-encoded as one segment.
    fn deal_url(&self, deal_id: &str) -> Result<String, ApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .push("deals")
            .push(deal_id);
        Ok(url.to_string())
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder, url: &str) -> Result<Response, ApiError> {
        self.authorize(request)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })
    }

    fn fetch_list(&self, path: &str, owner: &str, what: &str) -> Result<Value, ApiError> {
        let url = Url::parse_with_params(&self.url(path), &[("owner", owner)])
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        let url = url.to_string();
        debug!(%url, "fetching {what}");

        let response = self.send(self.client.get(&url), &url)?;
        validate_response_status(&response, &format!("Failed to fetch {what}"))?;

        response
            .json::<Value>()
            .map_err(|source| ApiError::Decode { url, source })
    }
}

/// Map a non-2xx response to [`ApiError::Status`].
pub(crate) fn validate_response_status(response: &Response, context: &str) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }
    Err(ApiError::Status {
        context: format!(
            "{context} ({})",
            status.canonical_reason().unwrap_or("Unknown error")
        ),
        status: status.as_u16(),
    })
}

impl DealsApi for HttpBackend {
    fn list_deals(&self, owner: &str) -> Result<Vec<Deal>, ApiError> {
        let body = self.fetch_list("deals", owner, "deals")?;
        Ok(decode_list(body, "deals"))
    }

    fn update_deal(&self, deal_id: &str, update: &DealUpdate) -> Result<(), ApiError> {
        let url = self.deal_url(deal_id)?;
        debug!(%url, stage = %update.stage, "updating deal");

        let response = self.send(self.client.put(&url).json(update), &url)?;
        validate_response_status(&response, &format!("Failed to update deal {deal_id}"))
    }
}

impl StagesApi for HttpBackend {
    fn list_stages(&self, owner: &str) -> Result<Vec<Stage>, ApiError> {
        let body = self.fetch_list("stages", owner, "stages")?;
        Ok(decode_list(body, "stages"))
    }
}
