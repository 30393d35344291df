//! Lambda invocation handling

use aws_config::{BehaviorVersion, Region};
use clamtag_core::types::{BatchResult, RawRecord};
use clamtag_core::{ClamtagConfig, Result};
use lambda_runtime::LambdaEvent;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::reconciler::Reconciler;
use crate::scanner::HttpScanService;
use crate::secrets::{CredentialCache, SsmSecretSource};
use crate::tagging::S3ObjectTagger;

/// Invocation payload: a batch of S3 and/or SNS records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvocationEvent {
    #[serde(rename = "Records", default)]
    pub records: Vec<RawRecord>,
}

/// Handle one invocation. Record failures are reported through the
/// returned `BatchResult`, never as an invocation error.
pub async fn handle_event(
    reconciler: &Reconciler,
    event: LambdaEvent<InvocationEvent>,
) -> std::result::Result<BatchResult, lambda_runtime::Error> {
    let (payload, context) = event.into_parts();
    info!(
        request_id = %context.request_id,
        records = payload.records.len(),
        "Invocation received"
    );
    Ok(reconciler.reconcile(&payload.records).await)
}

/// Build a reconciler wired to AWS and the scan files API.
///
/// The API key is not fetched here; the first batch that needs it does.
pub async fn build_reconciler(config: &ClamtagConfig) -> Result<Reconciler> {
    config.validate()?;

    let aws = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.aws.region.clone()))
        .load()
        .await;

    let scanner = HttpScanService::new(&config.scan)?;
    info!(endpoint = scanner.endpoint(), region = %config.aws.region, "Scan service configured");

    let tagger = S3ObjectTagger::new(aws_sdk_s3::Client::new(&aws));
    let secrets = SsmSecretSource::new(aws_sdk_ssm::Client::new(&aws));

    Ok(Reconciler::new(
        Arc::new(scanner),
        Arc::new(tagger),
        CredentialCache::new(Arc::new(secrets), &config.scan.api_key_param_name),
    ))
}
