use cardsite_config::Config;
#[cfg(feature = "publish")]
use cardsite_publish::aws::AwsBackend;
use cardsite_publish::{CdnInvalidator, DryRun, PublishReport, publish};
use cardsite_utils::assets::{PipelineReport, mirror_tree};
use color_eyre::eyre::Result;
use log::{info, warn};

/// Mirror `output_dir` into `dist_dir`, minified and gzipped.
///
/// # Errors
///
/// Returns an error if the staging tree does not exist.
pub fn compress(config: &Config) -> Result<PipelineReport> {
  let report = mirror_tree(config)?;
  if !report.is_clean() {
    warn!(
      "{} files could not be processed and are missing from {}",
      report.failed.len(),
      config.dist_dir.display()
    );
  }
  Ok(report)
}

/// Upload `dist_dir` and, unless disabled, invalidate the CDN.
///
/// # Errors
///
/// Returns an error if the deploy tree cannot be listed or the storage
/// backend is unavailable.
pub fn upload(
  config: &Config,
  dry_run: bool,
  invalidate: bool,
) -> Result<PublishReport> {
  if dry_run {
    info!("Dry run, nothing will be uploaded");
    let invalidator = invalidate.then_some(&DryRun as &dyn CdnInvalidator);
    return publish(config, &DryRun, invalidator);
  }

  upload_to_aws(config, invalidate)
}

#[cfg(feature = "publish")]
fn upload_to_aws(config: &Config, invalidate: bool) -> Result<PublishReport> {
  let backend = AwsBackend::connect(&config.publish())?;
  let invalidator = invalidate.then_some(&backend as &dyn CdnInvalidator);
  publish(config, &backend, invalidator)
}

#[cfg(not(feature = "publish"))]
fn upload_to_aws(_config: &Config, _invalidate: bool) -> Result<PublishReport> {
  color_eyre::eyre::bail!(
    "cardsite was built without the `publish` feature, rebuild with \
     `--features publish` or pass --dry-run"
  )
}
