//! Object tagging
//!
//! Writes scan tags onto S3 objects. Every write replaces the object's
//! whole tag set.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::types::{Tag, Tagging};
use aws_sdk_s3::Client;
use clamtag_core::types::{ObjectRef, TagSet};
use clamtag_core::{Error, Result};
use tracing::{debug, error, warn};

/// Replaces the tag set of an object
#[async_trait]
pub trait ObjectTagger: Send + Sync {
    /// Write `tags` as the object's complete tag set and return the version
    /// id reported back, if any.
    async fn put_tags(&self, object: &ObjectRef, tags: &TagSet) -> Result<Option<String>>;
}

/// Tagger backed by `PutObjectTagging`
#[derive(Debug, Clone)]
pub struct S3ObjectTagger {
    client: Client,
}

impl S3ObjectTagger {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectTagger for S3ObjectTagger {
    async fn put_tags(&self, object: &ObjectRef, tags: &TagSet) -> Result<Option<String>> {
        let tag_set = tags
            .iter()
            .map(|t| Tag::builder().key(&t.key).value(&t.value).build())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::TagWriteFailure(format!("invalid tag: {}", e)))?;

        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| Error::TagWriteFailure(format!("invalid tag set: {}", e)))?;

        let output = self
            .client
            .put_object_tagging()
            .bucket(&object.bucket)
            .key(&object.key)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| Error::TagWriteFailure(DisplayErrorContext(e).to_string()))?;

        Ok(output.version_id().map(str::to_string))
    }
}

/// Tag an object, reporting whether S3 confirmed a new version.
///
/// Failures are logged and folded into `false`.
pub async fn write_tags(tagger: &dyn ObjectTagger, object: &ObjectRef, tags: &TagSet) -> bool {
    match tagger.put_tags(object, tags).await {
        Ok(Some(version_id)) => {
            debug!(object = %object, version_id = %version_id, "Tagged object");
            true
        }
        Ok(None) => {
            warn!(
                object = %object,
                "Tag write returned no version id; is bucket versioning enabled?"
            );
            false
        }
        Err(e) => {
            error!(object = %object, error = %e, code = e.code(), "Failed to tag S3 object");
            false
        }
    }
}
