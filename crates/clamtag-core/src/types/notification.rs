//! Notification record types
//!
//! Lambda invocations carry two record shapes that share nothing but a
//! source field, and even that differs in casing:
//! - S3 object created records (`eventSource: "aws:s3"`)
//! - SNS scan status records (`EventSource: "aws:sns"`)

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::ObjectRef;

/// A record exactly as delivered in the invocation's `Records` array
pub type RawRecord = serde_json::Value;

/// SNS message attribute carrying the bucket name
pub const ATTR_BUCKET: &str = "Bucket";
/// SNS message attribute carrying the object key
pub const ATTR_KEY: &str = "Key";
/// SNS message attribute carrying the scan result
pub const ATTR_RESULT: &str = "Result";

// ============================================================================
// Origin
// ============================================================================

/// Service that produced a notification record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// S3 `s3:ObjectCreated:*` notification
    CreationEvent,
    /// SNS message reporting a scan status
    StatusUpdate,
    Unknown,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::CreationEvent => crate::EVENT_SOURCE_S3,
            Origin::StatusUpdate => crate::EVENT_SOURCE_SNS,
            Origin::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// S3 Event Record
// ============================================================================

/// S3 event record (the parts of the AWS format we read)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3EventRecord {
    #[serde(default)]
    pub event_source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws_region: Option<String>,
    pub s3: S3Info,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Info {
    pub bucket: S3BucketInfo,
    pub object: S3ObjectInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3BucketInfo {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct S3ObjectInfo {
    /// Key as sent by S3: URL encoded, with spaces as `+`
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
}

impl S3ObjectInfo {
    /// Decode the key into the name the object was stored under.
    ///
    /// `+` is replaced before percent decoding so an encoded plus (`%2B`)
    /// survives as a literal `+`.
    pub fn decoded_key(&self) -> crate::Result<String> {
        let spaced = self.key.replace('+', " ");
        percent_decode_str(&spaced)
            .decode_utf8()
            .map(|k| k.into_owned())
            .map_err(|e| {
                crate::Error::UnresolvableIdentity(format!(
                    "object key {:?} is not valid UTF-8 once decoded: {}",
                    self.key, e
                ))
            })
    }
}

// ============================================================================
// SNS Record
// ============================================================================

/// SNS record carrying a scan status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsRecord {
    #[serde(default)]
    pub event_source: String,
    pub sns: SnsMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default)]
    pub message_attributes: HashMap<String, MessageAttribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageAttribute {
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Binary attributes carry `BinaryValue` instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl SnsMessage {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.message_attributes
            .get(name)
            .and_then(|a| a.value.as_deref())
    }
}

// ============================================================================
// Decoded Record
// ============================================================================

/// A record decoded into the shape its origin promises
#[derive(Debug, Clone)]
pub enum NotificationRecord {
    ObjectCreated(S3EventRecord),
    StatusUpdate(SnsRecord),
    Unknown,
}

impl NotificationRecord {
    /// Bucket and key of the object this record refers to
    pub fn object_ref(&self) -> crate::Result<ObjectRef> {
        match self {
            NotificationRecord::ObjectCreated(record) => Ok(ObjectRef::new(
                &record.s3.bucket.name,
                record.s3.object.decoded_key()?,
            )),
            NotificationRecord::StatusUpdate(record) => {
                let attrs = &record.sns;
                match (attrs.attribute(ATTR_BUCKET), attrs.attribute(ATTR_KEY)) {
                    (Some(bucket), Some(key)) => Ok(ObjectRef::new(bucket, key)),
                    _ => Err(crate::Error::UnresolvableIdentity(
                        "SNS message is missing the Bucket or Key attribute".into(),
                    )),
                }
            }
            NotificationRecord::Unknown => Err(crate::Error::UnknownOrigin),
        }
    }

    /// Scan result reported by a status update, passed through as-is
    pub fn scan_result(&self) -> Option<&str> {
        match self {
            NotificationRecord::StatusUpdate(record) => record.sns.attribute(ATTR_RESULT),
            _ => None,
        }
    }
}
