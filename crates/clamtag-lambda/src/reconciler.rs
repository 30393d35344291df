//! Batch Reconciler
//!
//! Drives every record of an invocation through classification, object
//! resolution, scan start or status passthrough, and tagging, then folds
//! the per-record results into one `BatchResult`.

use chrono::Utc;
use clamtag_core::types::{
    BatchResult, NotificationRecord, ObjectRef, Origin, RawRecord, ScanOutcome, TagSet,
};
use clamtag_core::Error;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::events::{classify, decode};
use crate::scanner::ScanService;
use crate::secrets::CredentialCache;
use crate::tagging::{write_tags, ObjectTagger};

/// What happened to a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    pub origin: Origin,
    pub object: Option<ObjectRef>,
    pub outcome: Option<ScanOutcome>,
    pub tagged: bool,
}

impl RecordReport {
    fn new(origin: Origin) -> Self {
        Self {
            origin,
            object: None,
            outcome: None,
            tagged: false,
        }
    }

    /// A record is in error if its scan failed to start or its object did
    /// not end up tagged. Records that never reach tagging are untagged.
    pub fn is_error(&self) -> bool {
        self.outcome
            .as_ref()
            .is_some_and(ScanOutcome::is_failed_to_start)
            || !self.tagged
    }
}

/// API key lookup state for the batch in progress
#[derive(Debug, Default)]
enum BatchCredential<'a> {
    #[default]
    Pending,
    Ready(&'a str),
    Unavailable,
}

impl<'a> BatchCredential<'a> {
    /// Fetch at most once per batch, even when the fetch fails.
    async fn resolve(&mut self, cache: &'a CredentialCache) -> Option<&'a str> {
        if let BatchCredential::Pending = self {
            *self = match cache.api_key().await {
                Ok(key) => BatchCredential::Ready(key),
                Err(e) => {
                    error!(error = %e, code = e.code(), "Scan API key unavailable for this batch");
                    BatchCredential::Unavailable
                }
            };
        }

        match self {
            BatchCredential::Ready(key) => Some(*key),
            _ => None,
        }
    }
}

/// Reconciles notification batches against the scan service and S3 tags
pub struct Reconciler {
    scanner: Arc<dyn ScanService>,
    tagger: Arc<dyn ObjectTagger>,
    credentials: CredentialCache,
}

impl Reconciler {
    pub fn new(
        scanner: Arc<dyn ScanService>,
        tagger: Arc<dyn ObjectTagger>,
        credentials: CredentialCache,
    ) -> Self {
        Self {
            scanner,
            tagger,
            credentials,
        }
    }

    /// Process every record in order and summarize the batch.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn reconcile(&self, records: &[RawRecord]) -> BatchResult {
        let mut credential = BatchCredential::default();
        let mut errors = 0;

        for record in records {
            let report = self.process_record(record, &mut credential).await;
            if report.is_error() {
                errors += 1;
            }
        }

        let result = BatchResult::from_counts(records.len(), errors);
        info!(status = result.status, errors, "{}", result.body);
        result
    }

    async fn process_record<'a>(
        &'a self,
        record: &RawRecord,
        credential: &mut BatchCredential<'a>,
    ) -> RecordReport {
        let origin = classify(record);
        let mut report = RecordReport::new(origin);

        let resolved = decode(origin, record).and_then(|decoded| {
            let object = decoded.object_ref()?;
            Ok((decoded, object))
        });
        let (decoded, object) = match resolved {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(
                    origin = %origin,
                    error = %e,
                    code = e.code(),
                    record = %record,
                    "Skipping record"
                );
                return report;
            }
        };

        let outcome = match &decoded {
            NotificationRecord::ObjectCreated(_) => {
                Some(self.start_scan(&object, credential).await)
            }
            NotificationRecord::StatusUpdate(_) => match decoded.scan_result() {
                Some(result) => Some(ScanOutcome::Reported(result.to_string())),
                None => {
                    let e = Error::MissingScanResult;
                    warn!(object = %object, error = %e, code = e.code(), record = %record, "Skipping record");
                    None
                }
            },
            NotificationRecord::Unknown => None,
        };

        if let Some(outcome) = &outcome {
            let tags = TagSet::scan_result(outcome, Utc::now().timestamp_millis());
            report.tagged = write_tags(self.tagger.as_ref(), &object, &tags).await;
            info!(
                origin = %origin,
                object = %object,
                status = %outcome,
                tagged = report.tagged,
                "Processed record"
            );
        }

        report.object = Some(object);
        report.outcome = outcome;
        report
    }

    async fn start_scan<'a>(
        &'a self,
        object: &ObjectRef,
        credential: &mut BatchCredential<'a>,
    ) -> ScanOutcome {
        let Some(api_key) = credential.resolve(&self.credentials).await else {
            warn!(object = %object, "Not starting scan without an API key");
            return ScanOutcome::FailedToStart;
        };

        let response = self.scanner.start_scan(api_key, object).await;
        if !response.started {
            let e = Error::ScanStartFailure {
                status: response.status,
            };
            warn!(object = %object, error = %e, code = e.code());
        }
        ScanOutcome::from_start_status(response.status)
    }
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}
