//! HTTP plumbing shared by every Prism Central client
//!
//! Handles basic authentication, the `NTNX-Request-Id` header on writes,
//! retry with exponential backoff, and unwrapping of the v4 response envelope.

use ntnx_core::{BackendConfiguration, BackendTarget, PrismConfig};
use reqwest::header::ACCEPT;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::ApiResponse;

/// Header Prism Central uses to recognise a replayed create request
pub const REQUEST_ID_HEADER: &str = "NTNX-Request-Id";

/// Low-level client bound to one backend target
pub struct ApiClient {
    http: Client,
    base_url: Url,
    config: BackendConfiguration,
}

impl ApiClient {
    /// Create a client for the given configuration
    pub fn new(config: BackendConfiguration) -> Result<Self, ApiError> {
        // Prism Central ships with a self-signed certificate
        let http = Client::builder()
            .danger_accept_invalid_certs(!config.verify_tls)
            .timeout(config.request_timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(ApiError::Client)?;

        let raw = config.base_url();
        let base_url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// Resolve the configuration for `target` and build a client for it.
    ///
    /// Returns the configuration alongside the client, mirroring the
    /// `(client, configuration)` pair the tools work with.
    pub fn resolve(
        prism: &PrismConfig,
        target: BackendTarget,
    ) -> Result<(Self, BackendConfiguration), ApiError> {
        let config = prism.client_config(target)?;
        debug!(
            target = %target,
            host = %config.host,
            port = config.port,
            "Resolved backend client"
        );
        let client = Self::new(config.clone())?;
        Ok((client, config))
    }

    pub fn target(&self) -> BackendTarget {
        self.config.target
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn config(&self) -> &BackendConfiguration {
        &self.config
    }

    pub(crate) fn expect_target(&self, expected: BackendTarget) -> Result<(), ApiError> {
        if self.config.target == expected {
            Ok(())
        } else {
            Err(ApiError::WrongTarget {
                expected,
                actual: self.config.target,
            })
        }
    }

    /// Append `segments` to the base URL, each percent-encoded as a single
    /// path segment. `/`, `?` and `#` inside a segment never change the path
    /// structure; `.` and `..` are refused.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: format!("invalid path segment '{}'", bad),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request and unwrap the response envelope
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = self.endpoint(segments)?;
        let url = url.as_str();
        debug!("GET {}", url);

        let resp = self
            .send(Method::GET, url, |req| req.query(query))
            .await?;
        Self::decode(url, resp).await
    }

    /// Make a POST request with a JSON body and unwrap the response envelope.
    ///
    /// Each call carries a fresh request id, so two calls with identical
    /// bodies are two distinct operations on the backend; retries of the same
    /// call reuse the id.
    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<ApiResponse<T>, ApiError> {
        let url = self.endpoint(segments)?;
        let url = url.as_str();
        let request_id = Uuid::new_v4().to_string();
        debug!(request_id = %request_id, "POST {}", url);

        let resp = self
            .send(Method::POST, url, |req| {
                req.header(REQUEST_ID_HEADER, request_id.as_str()).json(body)
            })
            .await?;
        Self::decode(url, resp).await
    }

    /// Send a request, retrying transient failures with exponential backoff
    async fn send<F>(&self, method: Method, url: &str, build: F) -> Result<Response, ApiError>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let max_retries = self.config.max_retry_attempts;
        let mut retry = 0;

        loop {
            let req = self
                .http
                .request(method.clone(), url)
                .basic_auth(&self.config.username, Some(&self.config.password))
                .header(ACCEPT, "application/json");

            match build(req).send().await {
                Ok(resp) if is_retryable_status(resp.status()) && retry < max_retries => {
                    warn!(
                        status = %resp.status(),
                        retry = retry + 1,
                        "Transient API response, retrying {}",
                        url
                    );
                }
                Ok(resp) => return Ok(resp),
                Err(e) if (e.is_connect() || e.is_timeout()) && retry < max_retries => {
                    warn!(error = %e, retry = retry + 1, "Request failed, retrying {}", url);
                }
                Err(e) => {
                    return Err(ApiError::Transport {
                        url: url.to_string(),
                        source: e,
                    })
                }
            }

            retry += 1;
            tokio::time::sleep(self.config.backoff_delay(retry)).await;
        }
    }

    async fn decode<T: DeserializeOwned>(
        url: &str,
        resp: Response,
    ) -> Result<ApiResponse<T>, ApiError> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| ApiError::Transport {
            url: url.to_string(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(ApiError::from_status(status, &body));
        }

        if body.trim().is_empty() {
            return Ok(ApiResponse::empty());
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}
