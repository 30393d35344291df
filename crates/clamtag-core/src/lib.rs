//! Clamtag Core Library
//!
//! Core types, configuration and errors shared by the clamtag scan mediator.

pub mod config;
pub mod error;
pub mod types;

pub use config::ClamtagConfig;
pub use error::{Error, Result};

/// Clamtag version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default AWS region
pub const DEFAULT_REGION: &str = "ca-central-1";

/// Event source of S3 object created notifications (lowercase `eventSource`)
pub const EVENT_SOURCE_S3: &str = "aws:s3";

/// Event source of SNS scan status notifications (PascalCase `EventSource`)
pub const EVENT_SOURCE_SNS: &str = "aws:sns";

/// Identity of the scanner written to every tagged object
pub const SCANNER_NAME: &str = "clamav";

/// Tag key holding the scanner identity
pub const TAG_SCANNER: &str = "av-scanner";

/// Tag key holding the scan status
pub const TAG_STATUS: &str = "av-status";

/// Tag key holding the tagging time in milliseconds since the epoch
pub const TAG_TIMESTAMP: &str = "av-timestamp";

/// Path appended to the scan service base URL to start a scan
pub const SCAN_START_PATH: &str = "/version";
