//! Scan Service Client
//!
//! Starts malware scans through the scan files API.

use async_trait::async_trait;
use clamtag_core::config::ScanServiceConfig;
use clamtag_core::types::ObjectRef;
use clamtag_core::{Error, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Normalized response of a scan start request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResponse {
    /// True only for HTTP 200
    pub started: bool,
    /// Status code, if a response was received at all
    pub status: Option<u16>,
}

impl ScanResponse {
    pub fn from_status(status: u16) -> Self {
        Self {
            started: status == StatusCode::OK.as_u16(),
            status: Some(status),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            started: false,
            status: None,
        }
    }
}

/// Starts scans of S3 objects
#[async_trait]
pub trait ScanService: Send + Sync {
    /// Request a scan of `object`. Never fails: every failure mode is a
    /// `ScanResponse` with `started == false`.
    async fn start_scan(&self, api_key: &str, object: &ObjectRef) -> ScanResponse;
}

/// Scan service backed by the scan files HTTP API
#[derive(Debug, Clone)]
pub struct HttpScanService {
    http_client: Client,
    endpoint: String,
}

impl HttpScanService {
    pub fn new(config: &ScanServiceConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| Error::InvalidConfig(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(http_client, config.start_endpoint()))
    }

    pub fn with_client(http_client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ScanService for HttpScanService {
    async fn start_scan(&self, api_key: &str, object: &ObjectRef) -> ScanResponse {
        initiate_scan(&self.http_client, &self.endpoint, api_key, object).await
    }
}

/// Issue the authenticated GET that starts a scan.
pub async fn initiate_scan(
    http_client: &Client,
    endpoint: &str,
    api_key: &str,
    object: &ObjectRef,
) -> ScanResponse {
    let result = http_client
        .get(endpoint)
        .header(ACCEPT, "application/json")
        .header(AUTHORIZATION, api_key)
        .send()
        .await;

    match result {
        Ok(response) => {
            let response = ScanResponse::from_status(response.status().as_u16());
            if response.started {
                debug!(object = %object, "Scan started");
            } else {
                warn!(
                    object = %object,
                    status = ?response.status,
                    "Failed to start scan"
                );
            }
            response
        }
        Err(e) => {
            warn!(object = %object, error = %e, "Failed to start scan: request failed");
            e.status()
                .map_or_else(ScanResponse::unreachable, |s| ScanResponse {
                    started: false,
                    status: Some(s.as_u16()),
                })
        }
    }
}
