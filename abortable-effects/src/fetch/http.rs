//! HTTP fetcher backed by reqwest.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use super::{Fetch, FetchResponse, RequestInit};
use crate::cancellation::abortable;
use crate::config::FetchConfig;
use crate::errors::EffectError;

/// [`Fetch`] implementation over a shared `reqwest::Client`.
///
/// A request whose signal fires before the response body has been read fails
/// with [`EffectError::Aborted`]; the in-flight request is dropped.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl ReqwestFetcher {
    /// Creates a fetcher from configuration.
    pub fn new(config: FetchConfig) -> Result<Self, EffectError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| EffectError::network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn build_request(
        &self,
        url: &str,
        init: &RequestInit,
    ) -> Result<reqwest::RequestBuilder, EffectError> {
        let method = reqwest::Method::from_bytes(init.method.as_bytes())
            .map_err(|_| EffectError::network(format!("Invalid HTTP method: {}", init.method)))?;

        let mut request = self.client.request(method, url);
        for (key, value) in self.config.headers.iter().chain(init.headers.iter()) {
            request = request.header(key, value);
        }
        if let Some(body) = &init.body {
            request = request.body(body.clone());
        }
        Ok(request)
    }
}

#[async_trait]
impl Fetch for ReqwestFetcher {
    async fn fetch(
        &self,
        input: &str,
        init: Option<RequestInit>,
    ) -> Result<FetchResponse, EffectError> {
        let init = init.unwrap_or_default();
        let url = self.config.resolve_url(input);
        let request = self.build_request(&url, &init)?;

        debug!(url = %url, method = %init.method, "Issuing fetch");
        let send = async move {
            let response = request
                .send()
                .await
                .map_err(|e| EffectError::network(e.to_string()))?;

            let status = response.status().as_u16();
            let final_url = response.url().to_string();
            let headers: HashMap<String, String> = response
                .headers()
                .iter()
                .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.to_string(), v.to_string())))
                .collect();
            let body = response
                .text()
                .await
                .map_err(|e| EffectError::network(e.to_string()))?;

            Ok::<_, EffectError>(FetchResponse {
                status,
                url: final_url,
                headers,
                body,
            })
        };

        match &init.signal {
            Some(signal) => abortable(signal, send).await,
            None => send.await,
        }
    }
}
