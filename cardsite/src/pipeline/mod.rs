//! Pipeline stages run by the CLI.
//!
//! Every stage reads its inputs from disk and writes its outputs to disk, so
//! stages can be run one at a time or chained by [`build`].
mod deploy;
mod export;
mod index;
mod pages;
mod sitemap;

use cardsite_config::Config;
use cardsite_html::Templates;
use color_eyre::eyre::Result;
pub use deploy::{compress, upload};
pub use export::write_sql;
pub use index::write_index;
use jiff::Zoned;
use log::info;
pub use pages::write_pages;
pub use sitemap::write_sitemap;

/// Run index, pages, sitemap and compress against `config`.
///
/// # Errors
///
/// Returns an error if a configured input is missing or any stage fails.
pub fn build(config: &Config) -> Result<()> {
  info!("Starting site build...");
  config.validate_paths()?;

  let templates = Templates::load(config)?;
  let now = Zoned::now();

  write_index(config, &templates, now.datetime())?;
  write_pages(config, &templates)?;
  write_sitemap(config, now.date())?;
  let report = compress(config)?;

  info!(
    "Site built in {}, deployable copy in {} ({} files)",
    config.output_dir.display(),
    config.dist_dir.display(),
    report.processed
  );
  Ok(())
}
