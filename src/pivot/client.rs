use std::time::Instant;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;

use crate::config::{normalize_base, ClientConfig};
use crate::constants::{CATALOG_PATH, DIMENSIONS_PATH, QUERY_PATH, UNKNOWN_API_ERROR};
use crate::logging;

use super::types::{DimensionValuesResponse, PivotCatalog, PivotQueryPayload, QueryResponse};

/// Failures talking to the pivot API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("pivot API answered {status} on {path}: {message}")]
    Status {
        path: String,
        status: u16,
        message: String,
    },
    #[error("cannot build a request URL from {url}")]
    Url { url: String },
    #[error("unexpected response body from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Async client for the `/api/pivot` endpoints.
#[derive(Clone, Debug)]
pub struct PivotClient {
    http: Client,
    base: String,
    values_limit: u32,
}

impl PivotClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .user_agent(concat!("tablero-pivot/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base: normalize_base(&config.api_base),
            values_limit: config.values_limit,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    pub async fn catalog(&self) -> Result<PivotCatalog, ApiError> {
        self.send(CATALOG_PATH, self.http.get(self.endpoint(CATALOG_PATH)))
            .await
    }

    pub async fn query(&self, payload: &PivotQueryPayload) -> Result<QueryResponse, ApiError> {
        let request = self.http.post(self.endpoint(QUERY_PATH)).json(payload);
        self.send(QUERY_PATH, request).await
    }

    /// Values of one dimension, optionally narrowed by a search term.
    /// `limit` falls back to the configured default; `0` sends no limit at all.
    pub async fn dimension_values(
        &self,
        dimension_id: &str,
        search: Option<&str>,
        limit: Option<u32>,
    ) -> Result<DimensionValuesResponse, ApiError> {
        let url = self.dimension_values_url(dimension_id)?;
        let path = url.path().to_string();

        let mut params: Vec<(&str, String)> = Vec::with_capacity(2);
        if let Some(search) = search.map(str::trim).filter(|search| !search.is_empty()) {
            params.push(("busqueda", search.to_string()));
        }
        let limit = limit.unwrap_or(self.values_limit);
        if limit > 0 {
            params.push(("limite", limit.to_string()));
        }

        let request = self.http.get(url).query(&params);
        self.send(&path, request).await
    }

    /// The dimension id is pushed as a single percent-encoded path segment.
    pub fn dimension_values_url(&self, dimension_id: &str) -> Result<Url, ApiError> {
        let endpoint = self.endpoint(DIMENSIONS_PATH);
        let invalid = || ApiError::Url {
            url: endpoint.clone(),
        };
        let mut url = Url::parse(&endpoint).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|()| invalid())?
            .push(dimension_id)
            .push("valores");
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        path: &str,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let started = Instant::now();
        let transport = |source| ApiError::Transport {
            path: path.to_string(),
            source,
        };

        let response = request.send().await.map_err(|err| {
            logging::error(
                "api_request_failed",
                "pivot API unreachable",
                logging::metadata_from_pairs(&[
                    ("path", json!(path)),
                    ("error", json!(err.to_string())),
                ]),
            );
            transport(err)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(transport)?;

        logging::info(
            "api_request",
            "pivot API responded",
            logging::metadata_from_pairs(&[
                ("path", json!(path)),
                ("status", json!(status.as_u16())),
                ("bytes", json!(body.len())),
                ("elapsed_ms", json!(started.elapsed().as_millis() as u64)),
            ]),
        );

        if !status.is_success() {
            let message = if body.trim().is_empty() {
                UNKNOWN_API_ERROR.to_string()
            } else {
                body
            };
            return Err(ApiError::Status {
                path: path.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }
}
