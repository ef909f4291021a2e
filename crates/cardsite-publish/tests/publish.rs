#![allow(clippy::expect_used, clippy::unwrap_used, reason = "Fine in tests")]
use std::{cell::RefCell, fs, path::Path};

use cardsite_config::{Config, publish::PublishConfig};
use cardsite_publish::{
  CdnInvalidator,
  DryRun,
  ObjectStore,
  UploadObject,
  publish,
};
use color_eyre::eyre::{Result, bail};

#[derive(Default)]
struct RecordingStore {
  puts:    RefCell<Vec<(UploadObject, Vec<u8>)>>,
  fail_on: Option<&'static str>,
}

impl ObjectStore for RecordingStore {
  fn put(&self, object: &UploadObject, body: Vec<u8>) -> Result<()> {
    if self.fail_on == Some(object.key.as_str()) {
      bail!("bucket said no");
    }
    self.puts.borrow_mut().push((object.clone(), body));
    Ok(())
  }
}

#[derive(Default)]
struct RecordingCdn {
  calls:  RefCell<Vec<(String, Vec<String>, String)>>,
  reject: bool,
}

impl CdnInvalidator for RecordingCdn {
  fn invalidate(
    &self,
    distribution_id: &str,
    paths: &[&str],
    caller_reference: &str,
  ) -> Result<String> {
    if self.reject {
      bail!("throttled");
    }
    self.calls.borrow_mut().push((
      distribution_id.to_string(),
      paths.iter().map(|p| (*p).to_string()).collect(),
      caller_reference.to_string(),
    ));
    Ok("I2J0I21PCUYOIK".to_string())
  }
}

fn deploy_tree(root: &Path) {
  fs::create_dir_all(root.join("cards/1997-98")).unwrap();
  fs::create_dir_all(root.join("images/1997-98")).unwrap();
  fs::write(root.join("index.html"), b"\x1f\x8bindex").unwrap();
  fs::write(root.join("cards/1997-98/fleer-33.html"), b"\x1f\x8bpage").unwrap();
  fs::write(root.join("images/1997-98/fleer-33-front.jpg"), b"jpeg").unwrap();
  fs::write(root.join(".hidden"), b"nope").unwrap();
}

fn config(dist: &Path, distribution_id: Option<&str>) -> Config {
  Config {
    dist_dir: dist.to_path_buf(),
    publish: Some(PublishConfig {
      prefix: "juwan".to_string(),
      distribution_id: distribution_id.map(String::from),
      ..Default::default()
    }),
    ..Default::default()
  }
}

#[test]
fn test_uploads_every_object_with_headers() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir in test");
  deploy_tree(dir.path());

  let store = RecordingStore::default();
  let report = publish(&config(dir.path(), None), &store, None).unwrap();

  assert_eq!(report.uploaded, 3);
  assert_eq!(report.gzipped, 2);
  assert!(report.is_clean());
  assert_eq!(report.invalidation, None);

  let puts = store.puts.borrow();
  let keys: Vec<_> = puts.iter().map(|(o, _)| o.key.as_str()).collect();
  assert_eq!(keys, [
    "juwan/cards/1997-98/fleer-33.html",
    "juwan/images/1997-98/fleer-33-front.jpg",
    "juwan/index.html",
  ]);

  let (page, body) = &puts[0];
  assert_eq!(page.content_type, "text/html");
  assert_eq!(page.content_encoding, Some("gzip"));
  assert_eq!(page.content_language, "en-US");
  assert_eq!(body, b"\x1f\x8bpage");

  let (image, body) = &puts[1];
  assert_eq!(image.content_type, "image/jpeg");
  assert_eq!(image.content_encoding, None);
  assert_eq!(body, b"jpeg");
}

#[test]
fn test_failed_object_does_not_stop_upload() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir in test");
  deploy_tree(dir.path());

  let store = RecordingStore {
    fail_on: Some("juwan/cards/1997-98/fleer-33.html"),
    ..Default::default()
  };
  let report = publish(&config(dir.path(), None), &store, None).unwrap();

  assert_eq!(report.uploaded, 2);
  assert_eq!(report.failed, ["juwan/cards/1997-98/fleer-33.html"]);
  assert!(!report.is_clean());
}

#[test]
fn test_invalidates_everything_after_upload() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir in test");
  deploy_tree(dir.path());

  let store = RecordingStore::default();
  let cdn = RecordingCdn::default();
  let report =
    publish(&config(dir.path(), Some("E2ABCDEF")), &store, Some(&cdn))
      .unwrap();

  assert_eq!(report.invalidation.as_deref(), Some("I2J0I21PCUYOIK"));

  let calls = cdn.calls.borrow();
  assert_eq!(calls.len(), 1);
  let (distribution_id, paths, caller_reference) = &calls[0];
  assert_eq!(distribution_id, "E2ABCDEF");
  assert_eq!(paths, &["/*"]);
  assert!(uuid::Uuid::parse_str(caller_reference).is_ok());
}

#[test]
fn test_missing_distribution_skips_invalidation() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir in test");
  deploy_tree(dir.path());

  let cdn = RecordingCdn::default();
  let report =
    publish(&config(dir.path(), None), &RecordingStore::default(), Some(&cdn))
      .unwrap();

  assert_eq!(report.uploaded, 3);
  assert_eq!(report.invalidation, None);
  assert!(cdn.calls.borrow().is_empty());
}

#[test]
fn test_rejected_invalidation_is_not_fatal() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir in test");
  deploy_tree(dir.path());

  let cdn = RecordingCdn {
    reject: true,
    ..Default::default()
  };
  let report = publish(
    &config(dir.path(), Some("E2ABCDEF")),
    &RecordingStore::default(),
    Some(&cdn),
  )
  .unwrap();

  assert_eq!(report.uploaded, 3);
  assert_eq!(report.invalidation, None);
}

#[test]
fn test_dry_run_uploads_nothing() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir in test");
  deploy_tree(dir.path());

  let report =
    publish(&config(dir.path(), Some("E2ABCDEF")), &DryRun, Some(&DryRun))
      .unwrap();
  assert_eq!(report.uploaded, 3);
  assert!(
    report
      .invalidation
      .is_some_and(|id| id.starts_with("dry-run-"))
  );
}

#[test]
fn test_missing_deploy_tree_is_fatal() {
  let dir = tempfile::tempdir().expect("Failed to create temp dir in test");
  let result = publish(
    &config(&dir.path().join("dist"), None),
    &RecordingStore::default(),
    None,
  );
  assert!(result.is_err());
}
