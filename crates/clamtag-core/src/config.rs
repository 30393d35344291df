//! Configuration for Clamtag

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClamtagConfig {
    #[serde(default)]
    pub scan: ScanServiceConfig,

    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClamtagConfig {
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::InvalidConfig(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay values present in the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("SCAN_FILES_URL") {
            self.scan.url = url;
        }
        if let Some(name) = var("SCAN_FILES_API_KEY_PARAM_NAME") {
            self.scan.api_key_param_name = name;
        }
        if let Some(timeout) = var("SCAN_FILES_TIMEOUT_SECS") {
            if let Ok(t) = timeout.parse() {
                self.scan.timeout_secs = t;
            }
        }
        if let Some(region) = var("REGION") {
            self.aws.region = region;
        }
        if let Some(level) = var("CLAMTAG_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("CLAMTAG_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        self.scan.validate()?;
        if self.aws.region.is_empty() {
            return Err(crate::Error::InvalidConfig("aws.region is empty".into()));
        }
        Ok(())
    }
}

/// Scan service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanServiceConfig {
    /// Base URL of the scan files API
    #[serde(default)]
    pub url: String,
    /// SSM parameter holding the scan API key
    #[serde(default)]
    pub api_key_param_name: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    5
}

impl Default for ScanServiceConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key_param_name: String::new(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

impl ScanServiceConfig {
    pub fn validate(&self) -> crate::Result<()> {
        if self.url.is_empty() {
            return Err(crate::Error::InvalidConfig("scan.url is not set".into()));
        }
        let parsed = Url::parse(&self.url).map_err(|e| {
            crate::Error::InvalidConfig(format!("scan.url {:?} is not a URL: {}", self.url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(crate::Error::InvalidConfig(format!(
                "scan.url must be http or https, got {}",
                parsed.scheme()
            )));
        }
        if self.api_key_param_name.is_empty() {
            return Err(crate::Error::InvalidConfig(
                "scan.api_key_param_name is not set".into(),
            ));
        }
        Ok(())
    }

    /// Full URL of the endpoint that starts a scan
    pub fn start_endpoint(&self) -> String {
        format!(
            "{}{}",
            self.url.trim_end_matches('/'),
            crate::SCAN_START_PATH
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    pub region: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: crate::DEFAULT_REGION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}
