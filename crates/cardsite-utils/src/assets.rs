use std::{
  borrow::Cow,
  fs,
  path::{Path, PathBuf},
};

use cardsite_config::Config;
use color_eyre::eyre::{Context, Result, bail};
use log::{debug, error, info};
use walkdir::WalkDir;

use crate::{
  compress,
  postprocess::{self, AssetKind},
};

/// Outcome of one asset pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
  /// Files written to the mirror tree.
  pub processed:  usize,
  /// Files whose content a minifier changed.
  pub minified:   usize,
  /// Files stored gzip-encoded.
  pub compressed: usize,
  /// Files stored as-is.
  pub copied:     usize,
  /// Source paths that could not be processed.
  pub failed:     Vec<PathBuf>,
}

impl PipelineReport {
  #[must_use]
  pub fn is_clean(&self) -> bool {
    self.failed.is_empty()
  }
}

/// Mirror `config.output_dir` into `config.dist_dir`, minifying and
/// compressing along the way.
///
/// HTML, CSS and JavaScript are minified according to the `postprocess`
/// section. Files with an extension listed in `publish.gzip_extensions` are
/// gzipped under their original name, everything else is copied verbatim.
/// Hidden files and directories are skipped.
///
/// A file that fails is logged and recorded in the report and the walk moves
/// on to the next one.
///
/// # Errors
///
/// Returns an error if the source directory does not exist or the destination
/// root cannot be created.
pub fn mirror_tree(config: &Config) -> Result<PipelineReport> {
  let source = &config.output_dir;
  let dest = &config.dist_dir;

  if !source.is_dir() {
    bail!("Source directory {} does not exist", source.display());
  }
  fs::create_dir_all(dest).wrap_err_with(|| {
    format!("Failed to create destination directory {}", dest.display())
  })?;

  info!("Processing {} into {}", source.display(), dest.display());

  let mut report = PipelineReport::default();
  let walker = WalkDir::new(source)
    .follow_links(false)
    .into_iter()
    .filter_entry(|e| {
      e.depth() == 0
        || e.file_name().to_str().is_none_or(|s| !s.starts_with('.'))
    });

  for entry in walker {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        error!("Failed to read directory entry: {e}");
        if let Some(path) = e.path() {
          report.failed.push(path.to_path_buf());
        }
        continue;
      },
    };

    #[allow(
      clippy::filetype_is_file,
      reason = "Only regular files are mirrored, symlinks are skipped"
    )]
    if !entry.file_type().is_file() {
      continue;
    }

    let path = entry.path();
    let Ok(rel_path) = path.strip_prefix(source) else {
      continue;
    };
    let dest_path = dest.join(rel_path);

    match process_file(path, rel_path, &dest_path, config) {
      Ok(outcome) => {
        report.processed += 1;
        if outcome.minified {
          report.minified += 1;
        }
        if outcome.compressed {
          report.compressed += 1;
        } else {
          report.copied += 1;
        }
      },
      Err(e) => {
        error!("Failed to process {}: {e:?}", path.display());
        report.failed.push(path.to_path_buf());
      },
    }
  }

  info!(
    "Processed {} files ({} minified, {} gzipped, {} copied, {} failed)",
    report.processed,
    report.minified,
    report.compressed,
    report.copied,
    report.failed.len()
  );

  Ok(report)
}

struct FileOutcome {
  minified:   bool,
  compressed: bool,
}

fn process_file(
  path: &Path,
  rel_path: &Path,
  dest_path: &Path,
  config: &Config,
) -> Result<FileOutcome> {
  if let Some(parent) = dest_path.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory {}", parent.display())
    })?;
  }

  let raw =
    fs::read(path).wrap_err_with(|| format!("Failed to read {}", path.display()))?;

  let postprocess_config = config.postprocess();
  let (bytes, minified) = match AssetKind::from_path(path) {
    Some(kind) => {
      let text = String::from_utf8(raw)
        .wrap_err_with(|| format!("{} is not valid UTF-8", path.display()))?;
      let out = postprocess::minify(kind, &text, &postprocess_config)
        .wrap_err_with(|| format!("Failed to minify {}", path.display()))?;
      let changed = matches!(&out, Cow::Owned(minified) if *minified != text);
      (out.into_owned().into_bytes(), changed)
    },
    None => (raw, false),
  };

  let compressed = config.is_gzip_encoded(rel_path);
  let output = if compressed {
    compress::gzip(&bytes, postprocess_config.gzip_level())
      .wrap_err_with(|| format!("Failed to gzip {}", path.display()))?
  } else {
    bytes
  };

  fs::write(dest_path, output)
    .wrap_err_with(|| format!("Failed to write {}", dest_path.display()))?;

  debug!(
    "{} -> {}{}",
    rel_path.display(),
    dest_path.display(),
    if compressed { " (gzip)" } else { "" }
  );

  Ok(FileOutcome {
    minified,
    compressed,
  })
}
