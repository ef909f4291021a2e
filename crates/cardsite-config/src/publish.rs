use cardsite_macros::Configurable;
use serde::{Deserialize, Serialize};

/// Object storage and CDN settings for the publish stage.
#[derive(Debug, Clone, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct PublishConfig {
  /// Target bucket.
  #[config(key = "bucket")]
  pub bucket: String,

  /// Bucket region.
  #[config(key = "region")]
  pub region: String,

  /// Named credentials profile. The default credential chain is used when
  /// unset.
  #[config(key = "profile", allow_empty)]
  pub profile: Option<String>,

  /// Destination folder inside the bucket. Empty uploads to the bucket root.
  #[config(key = "prefix")]
  pub prefix: String,

  /// Value of the `Content-Language` header of every object.
  #[config(key = "content_language")]
  pub content_language: String,

  /// CDN distribution to invalidate after an upload.
  #[config(key = "distribution_id", allow_empty)]
  pub distribution_id: Option<String>,

  /// Extensions (without dot) whose objects are stored gzip-encoded.
  pub gzip_extensions: Vec<String>,
}

impl Default for PublishConfig {
  fn default() -> Self {
    Self {
      bucket:           "maulmann.de".to_string(),
      region:           "eu-central-1".to_string(),
      profile:          None,
      prefix:           String::new(),
      content_language: "en-US".to_string(),
      distribution_id:  None,
      gzip_extensions:  ["html", "css", "js", "json", "xml", "svg", "txt"]
        .into_iter()
        .map(String::from)
        .collect(),
    }
  }
}

impl PublishConfig {
  /// Destination prefix with surrounding slashes removed.
  #[must_use]
  pub fn normalized_prefix(&self) -> &str {
    self.prefix.trim_matches(|c| c == '/' || c == '\\')
  }

  /// Whether objects with this extension are served gzip-encoded.
  #[must_use]
  pub fn is_gzip_extension(&self, extension: &str) -> bool {
    self
      .gzip_extensions
      .iter()
      .any(|ext| ext.trim_start_matches('.').eq_ignore_ascii_case(extension))
  }
}
