//! Error types for Clamtag

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Record Errors
    #[error("Unsupported event source")]
    UnknownOrigin,

    #[error("Unable to resolve S3 object from record: {0}")]
    UnresolvableIdentity(String),

    #[error("Status update is missing the scan result attribute")]
    MissingScanResult,

    // Collaborator Errors
    #[error("Failed to start scan (status: {})", .status.map_or_else(|| "none".to_string(), |s| s.to_string()))]
    ScanStartFailure { status: Option<u16> },

    #[error("Failed to tag S3 object: {0}")]
    TagWriteFailure(String),

    #[error("Scan API key unavailable: {0}")]
    CredentialUnavailable(String),

    // Configuration Errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnknownOrigin => "UnknownOrigin",
            Error::UnresolvableIdentity(_) => "UnresolvableIdentity",
            Error::MissingScanResult => "MissingScanResult",
            Error::ScanStartFailure { .. } => "ScanStartFailure",
            Error::TagWriteFailure(_) => "TagWriteFailure",
            Error::CredentialUnavailable(_) => "CredentialUnavailable",
            Error::InvalidConfig(_) => "InvalidConfig",
        }
    }
}
