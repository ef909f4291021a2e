//! Upload of the deploy tree to object storage and CDN invalidation.
//!
//! The stage is written against the [`ObjectStore`] and [`CdnInvalidator`]
//! traits. [`DryRun`] only logs; the S3 and CloudFront backend lives behind
//! the `aws` feature.
#[cfg(feature = "aws")]
pub mod aws;
pub mod plan;
pub mod publish;

pub use plan::{UploadObject, content_type, plan_uploads};
pub use publish::{
  CdnInvalidator,
  DryRun,
  ObjectStore,
  PublishReport,
  publish,
};
