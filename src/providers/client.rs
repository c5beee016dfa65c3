//! HTTP client for the finance API with retry and backoff

use super::util::{RetryPolicy, Sleeper, TokioSleeper, with_retry};
use crate::core::config::ApiConfig;
use crate::core::error::FetchError;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, error};

/// Per-request knobs. The body is kept as a JSON value so it can be resent
/// on every attempt.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl Default for RequestOptions {
    fn default() -> Self {
        RequestOptions {
            method: Method::GET,
            body: None,
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn delete() -> Self {
        RequestOptions {
            method: Method::DELETE,
            ..Self::default()
        }
    }

    pub fn json<B: Serialize>(method: Method, body: &B) -> Result<Self, serde_json::Error> {
        Ok(RequestOptions {
            method,
            body: Some(serde_json::to_value(body)?),
            ..Self::default()
        })
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Adds a header, replacing the default of the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(
        config: &ApiConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(ApiClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            policy: RetryPolicy {
                retries: config.retries,
                base_delay: config.backoff_base(),
                retry_client_errors: config.retry_client_errors,
            },
            sleeper,
        })
    }

    /// Sends `options` to `endpoint`, retrying transport failures and
    /// non-success statuses. Only a 2xx response is returned.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Response, FetchError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint)).map_err(|e| {
            FetchError::InvalidUrl {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            }
        })?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&options.query);
        }
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(options.headers.clone());

        with_retry(
            || async {
                let mut builder = self
                    .http
                    .request(options.method.clone(), url.clone())
                    .headers(headers.clone());
                if let Some(body) = &options.body {
                    builder = builder.body(body.to_string());
                }

                let response = builder.send().await.map_err(|e| FetchError::Transport {
                    endpoint: endpoint.to_string(),
                    source: e,
                })?;

                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Http {
                        endpoint: endpoint.to_string(),
                        status,
                    });
                }
                debug!("{} {} -> {}", options.method, endpoint, status);
                Ok::<_, FetchError>(response)
            },
            &self.policy,
            self.sleeper.as_ref(),
            endpoint,
        )
        .await
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, FetchError> {
        let response = self
            .request(endpoint, RequestOptions::get().with_query(query))
            .await?;
        Self::decode(endpoint, response).await
    }

    /// Sends a JSON body and discards whatever comes back.
    pub async fn send_json<B: Serialize>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<(), FetchError> {
        let options = RequestOptions::json(method, body).map_err(|e| FetchError::Decode {
            endpoint: endpoint.to_string(),
            source: e,
        })?;
        self.request(endpoint, options).await?;
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &str,
        response: Response,
    ) -> Result<T, FetchError> {
        let response_text = response.text().await.map_err(|e| FetchError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        serde_json::from_str(&response_text).map_err(|e| {
            error!(
                error = ?e,
                response = %response_text,
                "Failed to parse response from {endpoint}"
            );
            FetchError::Decode {
                endpoint: endpoint.to_string(),
                source: e,
            }
        })
    }
}
