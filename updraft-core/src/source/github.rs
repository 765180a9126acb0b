// SPDX-FileCopyrightText: 2026 Mattia Egloff <mattia.egloff@pm.me>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub releases API client

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, LOCATION};
use reqwest::{Client, RequestBuilder};

use super::ReleaseSource;
use crate::config::CacheConfig;
use crate::error::{CacheError, CacheResult};
use crate::types::UpstreamRelease;

const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_BINARY: &str = "application/octet-stream";

/// Release source backed by the GitHub REST API.
pub struct GithubSource {
    client: Client,
    no_redirect: Client,
    api_url: String,
    token: Option<String>,
}

impl GithubSource {
    /// Creates a client from the cache configuration.
    pub fn new(config: &CacheConfig) -> CacheResult<Self> {
        let builder = || {
            Client::builder()
                .timeout(config.timeout())
                .user_agent(config.user_agent())
        };

        Ok(Self {
            client: builder().build()?,
            no_redirect: builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()?,
            api_url: config.api_url().to_string(),
            token: config.token().map(str::to_string),
        })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }
}

#[async_trait]
impl ReleaseSource for GithubSource {
    async fn list_releases(
        &self,
        account: &str,
        repository: &str,
    ) -> CacheResult<Vec<UpstreamRelease>> {
        const STEP: &str = "listing releases";

        let url = format!("{}/repos/{}/{}/releases", self.api_url, account, repository);
        let response = self
            .authorize(self.client.get(&url).header(ACCEPT, ACCEPT_JSON))
            .send()
            .await
            .map_err(|e| CacheError::upstream(STEP, e.to_string()))?;

        if !response.status().is_success() {
            return Err(CacheError::upstream(
                STEP,
                format!("HTTP {} from {}", response.status().as_u16(), url),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| CacheError::upstream(STEP, format!("invalid release list: {}", e)))
    }

    async fn fetch_text(&self, url: &str) -> CacheResult<String> {
        const STEP: &str = "fetching manifest";

        let response = self
            .authorize(self.client.get(url).header(ACCEPT, ACCEPT_BINARY))
            .send()
            .await
            .map_err(|e| CacheError::upstream(STEP, e.to_string()))?;

        if !response.status().is_success() {
            return Err(CacheError::upstream(
                STEP,
                format!("HTTP {} from {}", response.status().as_u16(), url),
            ));
        }

        response
            .text()
            .await
            .map_err(|e| CacheError::upstream(STEP, e.to_string()))
    }

    async fn resolve_download(&self, api_url: &str) -> CacheResult<String> {
        const STEP: &str = "resolving download";

        let response = self
            .authorize(self.no_redirect.get(api_url).header(ACCEPT, ACCEPT_BINARY))
            .send()
            .await
            .map_err(|e| CacheError::upstream(STEP, e.to_string()))?;

        if !response.status().is_redirection() {
            return Err(CacheError::upstream(
                STEP,
                format!("expected redirect, got HTTP {}", response.status().as_u16()),
            ));
        }

        response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| CacheError::upstream(STEP, "redirect without location"))
    }
}
