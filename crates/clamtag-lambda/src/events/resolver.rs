//! Record decoding and object resolution

use clamtag_core::types::{
    NotificationRecord, ObjectRef, Origin, RawRecord, S3EventRecord, SnsRecord,
};
use clamtag_core::{Error, Result};
use serde::Deserialize;

/// Decode a record into the shape its origin promises.
pub fn decode(origin: Origin, record: &RawRecord) -> Result<NotificationRecord> {
    match origin {
        Origin::CreationEvent => S3EventRecord::deserialize(record)
            .map(NotificationRecord::ObjectCreated)
            .map_err(|e| Error::UnresolvableIdentity(format!("malformed S3 event record: {}", e))),
        Origin::StatusUpdate => SnsRecord::deserialize(record)
            .map(NotificationRecord::StatusUpdate)
            .map_err(|e| Error::UnresolvableIdentity(format!("malformed SNS record: {}", e))),
        Origin::Unknown => Ok(NotificationRecord::Unknown),
    }
}

/// Resolve the S3 object a record refers to, or `None` if it can't be.
pub fn resolve(origin: Origin, record: &RawRecord) -> Option<ObjectRef> {
    decode(origin, record).and_then(|r| r.object_ref()).ok()
}
