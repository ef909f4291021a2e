use std::fs;

use cardsite_config::Config;
use cardsite_html::{AssembledIndex, IndexAssembler, Templates, index::read_fragments};
use color_eyre::eyre::{Context, Result};
use jiff::civil::DateTime;
use log::info;

/// Assemble `output_dir/index.html` from the fragments of `content_dir`.
///
/// # Errors
///
/// Returns an error if the fragments cannot be read or the index cannot be
/// rendered or written.
pub fn write_index(
  config: &Config,
  templates: &Templates,
  generated_at: DateTime,
) -> Result<AssembledIndex> {
  let fragments = read_fragments(&config.content_dir)?;
  let index =
    IndexAssembler::new(templates, config).assemble(&fragments, generated_at)?;

  fs::create_dir_all(&config.output_dir).wrap_err_with(|| {
    format!(
      "Failed to create output directory {}",
      config.output_dir.display()
    )
  })?;

  let path = config.index_path();
  fs::write(&path, &index.html)
    .wrap_err_with(|| format!("Failed to write index {}", path.display()))?;

  info!(
    "Index written to {} ({} seasons, {} cards)",
    path.display(),
    index.sections.len(),
    index.total_rows()
  );
  Ok(index)
}
