use std::path::{Path, PathBuf};

use cardsite_config::Config;
use color_eyre::eyre::{Result, bail};
use walkdir::WalkDir;

/// `Content-Type` for a file name, by extension.
#[must_use]
pub fn content_type(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase)
    .unwrap_or_default();

  match ext.as_str() {
    "html" => "text/html",
    "css" => "text/css",
    "js" => "application/javascript",
    "json" => "application/json",
    "jpg" | "jpeg" => "image/jpeg",
    "png" => "image/png",
    "gif" => "image/gif",
    "svg" => "image/svg+xml",
    "ico" => "image/x-icon",
    "xml" => "application/xml",
    "txt" => "text/plain",
    "pdf" => "application/pdf",
    _ => "application/octet-stream",
  }
}

/// One file of the deploy tree and the object it becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadObject {
  /// Local file.
  pub path:             PathBuf,
  /// Object key, forward slashes, below the configured prefix.
  pub key:              String,
  pub content_type:     &'static str,
  /// `Some("gzip")` when the file holds gzip-encoded bytes.
  pub content_encoding: Option<&'static str>,
  pub content_language: String,
}

/// Object key of `rel_path` below `prefix`.
#[must_use]
pub fn object_key(prefix: &str, rel_path: &Path) -> String {
  let rel = rel_path
    .components()
    .map(|c| c.as_os_str().to_string_lossy())
    .collect::<Vec<_>>()
    .join("/");

  if prefix.is_empty() {
    rel
  } else {
    format!("{prefix}/{rel}")
  }
}

/// Every object to upload from `config.dist_dir`, sorted by key.
///
/// Hidden files and directories are left out.
///
/// # Errors
///
/// Returns an error if the deploy directory does not exist.
pub fn plan_uploads(config: &Config) -> Result<Vec<UploadObject>> {
  let root = &config.dist_dir;
  if !root.is_dir() {
    bail!("Source directory does not exist: {}", root.display());
  }

  let publish = config.publish();
  let prefix = publish.normalized_prefix();

  let mut objects = Vec::new();
  let walker = WalkDir::new(root)
    .sort_by_file_name()
    .into_iter()
    .filter_entry(|e| {
      e.depth() == 0
        || e.file_name().to_str().is_none_or(|s| !s.starts_with('.'))
    });

  for entry in walker {
    let entry = entry?;
    #[allow(
      clippy::filetype_is_file,
      reason = "Only regular files become objects"
    )]
    if !entry.file_type().is_file() {
      continue;
    }

    let path = entry.path();
    let Ok(rel_path) = path.strip_prefix(root) else {
      continue;
    };

    objects.push(UploadObject {
      path:             path.to_path_buf(),
      key:              object_key(prefix, rel_path),
      content_type:     content_type(path),
      content_encoding: config.is_gzip_encoded(rel_path).then_some("gzip"),
      content_language: publish.content_language.clone(),
    });
  }

  objects.sort_by(|a, b| a.key.cmp(&b.key));
  Ok(objects)
}
