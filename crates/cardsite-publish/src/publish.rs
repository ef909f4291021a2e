use std::fs;

use cardsite_config::Config;
use color_eyre::eyre::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};

use crate::plan::{UploadObject, plan_uploads};

/// Paths invalidated after every upload.
pub const INVALIDATION_PATHS: &[&str] = &["/*"];

/// Somewhere objects can be stored.
pub trait ObjectStore {
  /// Store `body` under `object.key` with the object's headers.
  ///
  /// # Errors
  ///
  /// Returns an error if the object could not be stored.
  fn put(&self, object: &UploadObject, body: Vec<u8>) -> Result<()>;
}

/// A CDN whose cached copies can be dropped.
pub trait CdnInvalidator {
  /// Request an invalidation of `paths` and return its id.
  ///
  /// # Errors
  ///
  /// Returns an error if the request was rejected.
  fn invalidate(
    &self,
    distribution_id: &str,
    paths: &[&str],
    caller_reference: &str,
  ) -> Result<String>;
}

/// Logs what would be uploaded without touching the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRun;

impl ObjectStore for DryRun {
  fn put(&self, object: &UploadObject, body: Vec<u8>) -> Result<()> {
    info!(
      "Would upload {} ({} bytes, {}{})",
      object.key,
      body.len(),
      object.content_type,
      object
        .content_encoding
        .map(|enc| format!(", {enc}"))
        .unwrap_or_default()
    );
    Ok(())
  }
}

impl CdnInvalidator for DryRun {
  fn invalidate(
    &self,
    distribution_id: &str,
    paths: &[&str],
    caller_reference: &str,
  ) -> Result<String> {
    info!(
      "Would invalidate {} on {distribution_id} ({caller_reference})",
      paths.join(", ")
    );
    Ok(format!("dry-run-{caller_reference}"))
  }
}

/// Outcome of a publish run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PublishReport {
  /// Objects stored.
  pub uploaded:     usize,
  /// Of those, how many were stored gzip-encoded.
  pub gzipped:      usize,
  /// Keys that failed to upload.
  pub failed:       Vec<String>,
  /// Id of the invalidation request, if one was made.
  pub invalidation: Option<String>,
}

impl PublishReport {
  #[must_use]
  pub fn is_clean(&self) -> bool {
    self.failed.is_empty()
  }
}

/// Upload the deploy tree to `store`, then invalidate the CDN.
///
/// A failing object is logged and recorded in the report; the remaining
/// objects are still uploaded. The invalidation runs only when an
/// `invalidator` is given and a distribution id is configured. A rejected
/// invalidation is logged and leaves [`PublishReport::invalidation`] empty.
///
/// # Errors
///
/// Returns an error if the deploy tree cannot be listed.
pub fn publish(
  config: &Config,
  store: &dyn ObjectStore,
  invalidator: Option<&dyn CdnInvalidator>,
) -> Result<PublishReport> {
  let objects = plan_uploads(config)?;
  info!(
    "Uploading {} objects from {} to bucket {}",
    objects.len(),
    config.dist_dir.display(),
    config.publish().bucket
  );

  let progress = ProgressBar::new(objects.len() as u64);
  if let Ok(style) =
    ProgressStyle::with_template("{bar:40} {pos}/{len} {wide_msg}")
  {
    progress.set_style(style);
  }

  let mut report = PublishReport::default();
  for object in &objects {
    progress.set_message(object.key.clone());

    match upload(store, object) {
      Ok(()) => {
        let tag = if object.content_encoding.is_some() {
          report.gzipped += 1;
          "[GZIP]"
        } else {
          "[RAW]"
        };
        progress.println(format!("Uploaded {tag} : {}", object.key));
        report.uploaded += 1;
      },
      Err(e) => {
        error!("Failed to upload {}: {e:?}", object.key);
        report.failed.push(object.key.clone());
      },
    }

    progress.inc(1);
  }
  progress.finish_and_clear();

  info!(
    "Uploaded {} objects ({} gzip), {} failed",
    report.uploaded,
    report.gzipped,
    report.failed.len()
  );

  if let Some(invalidator) = invalidator {
    report.invalidation = invalidate(config, invalidator);
  }

  Ok(report)
}

fn upload(store: &dyn ObjectStore, object: &UploadObject) -> Result<()> {
  let body = fs::read(&object.path)
    .wrap_err_with(|| format!("Failed to read {}", object.path.display()))?;
  store.put(object, body)
}

fn invalidate(
  config: &Config,
  invalidator: &dyn CdnInvalidator,
) -> Option<String> {
  let publish = config.publish();
  let Some(distribution_id) = publish.distribution_id.as_deref() else {
    warn!("No distribution id configured, skipping CDN invalidation");
    return None;
  };

  let caller_reference = uuid::Uuid::new_v4().to_string();
  match invalidator.invalidate(
    distribution_id,
    INVALIDATION_PATHS,
    &caller_reference,
  ) {
    Ok(id) => {
      info!("Invalidation created: {id}");
      Some(id)
    },
    Err(e) => {
      error!("Failed to invalidate {distribution_id}: {e:?}");
      None
    },
  }
}
