use std::fs;

use cardsite_catalog::CollectionDocument;
use cardsite_config::Config;
use cardsite_export::{ImportScript, Lookups, SqlExporter};
use color_eyre::eyre::{Context, Result};
use jiff::civil::DateTime;
use log::{info, warn};

/// Write the SQL import script for every card of the generated index to
/// `export.output_file`.
///
/// # Errors
///
/// Returns an error if the index or the lookup dump cannot be read or
/// parsed, or if the script cannot be written.
pub fn write_sql(
  config: &Config,
  generated_at: DateTime,
) -> Result<ImportScript> {
  let export = config.export();

  let index_path = config.index_path();
  let html = fs::read_to_string(&index_path).wrap_err_with(|| {
    format!("Failed to read index {}", index_path.display())
  })?;
  let tables = CollectionDocument::parse(&html).tables()?;

  let lookups = if let Some(path) = &export.lookup_file {
    Lookups::from_file(path)?
  } else {
    warn!(
      "No export.lookup_file configured, every card gets the base variant and \
       no theme"
    );
    Lookups::default()
  };

  let script = SqlExporter::new(&lookups, config).export(
    tables.iter().flat_map(|table| &table.records),
    generated_at,
  );

  if let Some(parent) = export.output_file.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory {}", parent.display())
    })?;
  }
  fs::write(&export.output_file, &script.sql).wrap_err_with(|| {
    format!("Failed to write SQL script {}", export.output_file.display())
  })?;

  info!(
    "SQL import script written to {} ({} cards)",
    export.output_file.display(),
    script.cards.len()
  );
  if script.unresolved_brands > 0 {
    warn!("{} cards have no resolved brand", script.unresolved_brands);
  }
  Ok(script)
}
