//! Origin classification

use clamtag_core::types::{Origin, RawRecord};
use clamtag_core::{EVENT_SOURCE_S3, EVENT_SOURCE_SNS};

/// S3 spells the source field in camelCase
const S3_SOURCE_FIELD: &str = "eventSource";
/// SNS spells the source field in PascalCase
const SNS_SOURCE_FIELD: &str = "EventSource";

/// Determine which service produced a record.
///
/// Both the field name and its value must match exactly; a record with the
/// SNS value under the S3 field name (or the reverse) is `Unknown`.
pub fn classify(record: &RawRecord) -> Origin {
    if source_field(record, S3_SOURCE_FIELD) == Some(EVENT_SOURCE_S3) {
        Origin::CreationEvent
    } else if source_field(record, SNS_SOURCE_FIELD) == Some(EVENT_SOURCE_SNS) {
        Origin::StatusUpdate
    } else {
        Origin::Unknown
    }
}

fn source_field<'a>(record: &'a RawRecord, field: &str) -> Option<&'a str> {
    record.get(field).and_then(|v| v.as_str())
}
