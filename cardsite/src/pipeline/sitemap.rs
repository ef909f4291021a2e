use std::fs;

use cardsite_catalog::CollectionDocument;
use cardsite_config::Config;
use cardsite_html::{SitemapBuilder, SitemapReport};
use color_eyre::eyre::{Context, Result};
use jiff::civil::Date;
use log::{info, warn};

/// Write the sitemap for the cards listed in the generated index.
///
/// # Errors
///
/// Returns an error if the index cannot be read or parsed, or if the sitemap
/// cannot be written.
pub fn write_sitemap(config: &Config, lastmod: Date) -> Result<SitemapReport> {
  let index_path = config.index_path();
  let html = fs::read_to_string(&index_path).wrap_err_with(|| {
    format!("Failed to read index {}", index_path.display())
  })?;

  let records: Vec<_> = CollectionDocument::parse(&html)
    .tables()?
    .into_iter()
    .flat_map(|table| table.records)
    .collect();

  let builder = SitemapBuilder::new(config);
  if !builder.images_dir().is_dir() {
    warn!(
      "Images directory {} not found, the sitemap will list no images",
      builder.images_dir().display()
    );
  }
  let sitemap = builder.build(&records, lastmod);

  let path = config.sitemap_path();
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory {}", parent.display())
    })?;
  }
  fs::write(&path, &sitemap.xml)
    .wrap_err_with(|| format!("Failed to write sitemap {}", path.display()))?;

  info!(
    "Sitemap written to {}: {} cards, {} URLs, {} missing images",
    path.display(),
    sitemap.report.cards,
    sitemap.report.urls,
    sitemap.report.missing_images
  );
  Ok(sitemap.report)
}
