//! Object types

use serde::{Deserialize, Serialize};

use super::ScanOutcome;

/// Canonical identity of an S3 object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Object tag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered tag set for an object.
///
/// A tag set is always written whole: S3 replaces every existing tag on the
/// object with the submitted set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSet {
    pub tags: Vec<Tag>,
}

impl TagSet {
    /// Tags recorded for a scan outcome: scanner, status, then timestamp.
    pub fn scan_result(outcome: &ScanOutcome, timestamp_ms: i64) -> Self {
        Self {
            tags: vec![
                Tag::new(crate::TAG_SCANNER, crate::SCANNER_NAME),
                Tag::new(crate::TAG_STATUS, outcome.as_str()),
                Tag::new(crate::TAG_TIMESTAMP, timestamp_ms.to_string()),
            ],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }
}
