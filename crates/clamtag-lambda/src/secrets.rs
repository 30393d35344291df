//! Scan API key retrieval
//!
//! The API key lives in SSM Parameter Store. It is fetched the first time a
//! batch needs it and then kept for the life of the process; a new key
//! requires a new process (a Lambda cold start).
//!
//! A failed fetch is not cached. The next batch that needs the key makes
//! one more attempt, so a transient SSM outage costs the batches that ran
//! during it and nothing more.

use async_trait::async_trait;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::Client;
use clamtag_core::{Error, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

/// Source of named secrets
#[async_trait]
pub trait SecretSource: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<String>;
}

/// Secret source backed by SSM `GetParameter` with decryption
#[derive(Debug, Clone)]
pub struct SsmSecretSource {
    client: Client,
}

impl SsmSecretSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretSource for SsmSecretSource {
    async fn get_secret(&self, name: &str) -> Result<String> {
        let output = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                Error::CredentialUnavailable(format!(
                    "Unable to get '{}' SSM parameter: {}",
                    name,
                    DisplayErrorContext(e)
                ))
            })?;

        output
            .parameter()
            .and_then(|p| p.value())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::CredentialUnavailable(format!("SSM parameter '{}' has no value", name))
            })
    }
}

/// Process-wide cache of the scan API key
pub struct CredentialCache {
    source: Arc<dyn SecretSource>,
    param_name: String,
    api_key: OnceCell<String>,
}

impl CredentialCache {
    pub fn new(source: Arc<dyn SecretSource>, param_name: impl Into<String>) -> Self {
        Self {
            source,
            param_name: param_name.into(),
            api_key: OnceCell::new(),
        }
    }

    /// The API key, fetching it if no earlier fetch succeeded.
    ///
    /// Concurrent callers share a single in-flight fetch.
    pub async fn api_key(&self) -> Result<&str> {
        self.api_key
            .get_or_try_init(|| async {
                info!(param = %self.param_name, "Fetching scan API key");
                self.source.get_secret(&self.param_name).await
            })
            .await
            .map(String::as_str)
    }

    pub fn is_cached(&self) -> bool {
        self.api_key.initialized()
    }
}

impl std::fmt::Debug for CredentialCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCache")
            .field("param_name", &self.param_name)
            .field("cached", &self.is_cached())
            .finish()
    }
}
