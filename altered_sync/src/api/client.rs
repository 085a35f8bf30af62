//! Blocking HTTP client for the Altered API

use super::{PageQuery, PageSource, TradelistEntry};
use altered_common::{ApiError, ApiResult, HydraPage};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.altered.gg";

/// Attempts per request before giving up on connection-level failures
pub const MAX_ATTEMPTS: u32 = 5;

const USER_AGENT: &str = "altered_sync/0.1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Altered API client.
///
/// When a token is set it is sent as-is in the `Authorization` header, and
/// catalog requests are restricted to the user's collection unless
/// `only_load_collection` is disabled.
pub struct AlteredClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    only_load_collection: bool,
    max_attempts: u32,
}

impl AlteredClient {
    pub fn new(base_url: &str, token: Option<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            only_load_collection: true,
            max_attempts: MAX_ATTEMPTS,
        })
    }

    pub fn with_only_load_collection(mut self, only_load_collection: bool) -> Self {
        self.only_load_collection = only_load_collection;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn query_params(&self, query: &PageQuery, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("itemsPerPage", query.items_per_page.to_string()),
            ("page", page.to_string()),
        ];
        for rarity in &query.rarities {
            params.push(("rarity[]", rarity.clone()));
        }
        params.push(("locale", query.language.api_locale().to_string()));
        if self.token.is_some() && self.only_load_collection {
            params.push(("collection", "true".to_string()));
        }
        if let Some(ref faction) = query.faction {
            params.push(("factions[]", faction.clone()));
        }
        params
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token {
            Some(ref token) => request.header(AUTHORIZATION, token),
            None => request,
        }
    }

    /// Send a request, rebuilding it for every attempt. Only transport errors
    /// are retried; any HTTP response, successful or not, ends the loop.
    fn send_with_retry<F>(&self, url: &str, build: F) -> ApiResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.authorize(build()).send() {
                Ok(response) => return Ok(response),
                Err(source) if attempt >= self.max_attempts => {
                    return Err(ApiError::ExhaustedRetries {
                        url: url.to_string(),
                        attempts: attempt,
                        source,
                    });
                }
                Err(e) => {
                    log::warn!(
                        "Error ({}): {}. Retrying (attempt {}/{})...",
                        url,
                        e,
                        attempt + 1,
                        self.max_attempts
                    );
                }
            }
        }
    }

    fn ensure_success(&self, response: Response, url: &str) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            log::error!("Request to {} failed with status {}", url, status);
            Err(ApiError::HttpStatus {
                status,
                url: url.to_string(),
                authenticated: self.is_authenticated(),
            })
        }
    }

    /// Replace the authenticated user's tradelist with `entries`
    pub fn put_tradelist(&self, entries: &[TradelistEntry]) -> ApiResult<()> {
        #[derive(Serialize)]
        struct Payload<'a> {
            cards: &'a [TradelistEntry],
        }

        let url = self.url("ownership_lists/tradelist");
        let payload = serde_json::to_vec(&Payload { cards: entries })?;
        log::info!("Putting {} cards on the tradelist", entries.len());

        let response = self.send_with_retry(&url, || {
            self.client
                .put(&url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload.clone())
        })?;
        self.ensure_success(response, &url)?;
        Ok(())
    }
}

impl PageSource for AlteredClient {
    fn fetch_page<T: DeserializeOwned>(
        &self,
        query: &PageQuery,
        page: u32,
    ) -> ApiResult<HydraPage<T>> {
        let url = self.url(query.endpoint.path());
        let params = self.query_params(query, page);
        log::debug!("GET {} page {} ({})", url, page, query.language);

        let response = self.send_with_retry(&url, || self.client.get(&url).query(&params))?;
        let response = self.ensure_success(response, &url)?;
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
