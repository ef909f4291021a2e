use aws_config::{BehaviorVersion, Region};
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use aws_sdk_s3::primitives::ByteStream;
use cardsite_config::publish::PublishConfig;
use color_eyre::eyre::{Context, Result, eyre};
use log::debug;
use tokio::runtime::{Builder, Runtime};

use crate::{
  plan::UploadObject,
  publish::{CdnInvalidator, ObjectStore},
};

/// S3 bucket and CloudFront distribution behind the blocking publish traits.
///
/// The SDK is async; every call is driven to completion on a private
/// single-threaded runtime.
pub struct AwsBackend {
  runtime:    Runtime,
  s3:         aws_sdk_s3::Client,
  cloudfront: aws_sdk_cloudfront::Client,
  bucket:     String,
}

impl AwsBackend {
  /// Load credentials for the configured region and profile.
  ///
  /// # Errors
  ///
  /// Returns an error if the runtime cannot be started.
  pub fn connect(config: &PublishConfig) -> Result<Self> {
    let runtime = Builder::new_current_thread()
      .enable_all()
      .build()
      .wrap_err("Failed to start async runtime")?;

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
      .region(Region::new(config.region.clone()));
    if let Some(profile) = &config.profile {
      debug!("Using credentials profile {profile}");
      loader = loader.profile_name(profile);
    }
    let sdk_config = runtime.block_on(loader.load());

    Ok(Self {
      s3: aws_sdk_s3::Client::new(&sdk_config),
      cloudfront: aws_sdk_cloudfront::Client::new(&sdk_config),
      bucket: config.bucket.clone(),
      runtime,
    })
  }
}

impl ObjectStore for AwsBackend {
  fn put(&self, object: &UploadObject, body: Vec<u8>) -> Result<()> {
    let request = self
      .s3
      .put_object()
      .bucket(&self.bucket)
      .key(&object.key)
      .content_type(object.content_type)
      .content_language(&object.content_language)
      .set_content_encoding(object.content_encoding.map(str::to_string))
      .body(ByteStream::from(body));

    self
      .runtime
      .block_on(request.send())
      .wrap_err_with(|| {
        format!("Failed to put s3://{}/{}", self.bucket, object.key)
      })?;
    Ok(())
  }
}

impl CdnInvalidator for AwsBackend {
  fn invalidate(
    &self,
    distribution_id: &str,
    paths: &[&str],
    caller_reference: &str,
  ) -> Result<String> {
    let items: Vec<String> = paths.iter().map(|p| (*p).to_string()).collect();
    let quantity = i32::try_from(items.len())?;

    let paths = Paths::builder()
      .quantity(quantity)
      .set_items(Some(items))
      .build()?;
    let batch = InvalidationBatch::builder()
      .paths(paths)
      .caller_reference(caller_reference)
      .build()?;

    let output = self
      .runtime
      .block_on(
        self
          .cloudfront
          .create_invalidation()
          .distribution_id(distribution_id)
          .invalidation_batch(batch)
          .send(),
      )
      .wrap_err_with(|| {
        format!("Failed to create invalidation for {distribution_id}")
      })?;

    output
      .invalidation()
      .map(|invalidation| invalidation.id().to_string())
      .ok_or_else(|| eyre!("Invalidation response carried no invalidation"))
  }
}
