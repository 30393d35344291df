//! Clamtag Lambda
//!
//! Starts malware scans of newly created S3 objects and records scan
//! status on the objects as tags:
//! - S3 `ObjectCreated` records start a scan and tag `IN_PROGRESS`
//!   (or `FAILED_TO_START`)
//! - SNS records carry a finished scan's result, which is tagged verbatim

pub mod events;
pub mod handler;
pub mod reconciler;
pub mod scanner;
pub mod secrets;
pub mod tagging;

#[cfg(test)]
pub(crate) mod testing;

pub use handler::{build_reconciler, handle_event, InvocationEvent};
pub use reconciler::{Reconciler, RecordReport};
pub use scanner::{initiate_scan, HttpScanService, ScanResponse, ScanService};
pub use secrets::{CredentialCache, SecretSource, SsmSecretSource};
pub use tagging::{write_tags, ObjectTagger, S3ObjectTagger};
