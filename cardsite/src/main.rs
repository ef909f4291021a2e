use std::fs;

use cardsite::{
  cli::{Cli, Commands},
  pipeline,
};
use cardsite_config::Config;
use cardsite_html::Templates;
use color_eyre::eyre::{Context, Result, bail};
use jiff::Zoned;
use log::info;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(cli.verbosity.log_level_filter())
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => return init(output, format, *force),

    Commands::ExportTemplates {
      output_dir,
      force,
      templates,
    } => {
      Config::export_templates(output_dir, *force, Some(templates.clone()))
        .wrap_err_with(|| {
          format!("Failed to export templates to {}", output_dir.display())
        })?;
      return Ok(());
    },

    _ => {},
  }

  let config = Config::load(&cli.config_files, &cli.config_overrides)?;

  match &cli.command {
    Commands::Index => {
      let templates = Templates::load(&config)?;
      pipeline::write_index(&config, &templates, Zoned::now().datetime())?;
    },
    Commands::Pages => {
      let templates = Templates::load(&config)?;
      pipeline::write_pages(&config, &templates)?;
    },
    Commands::Sitemap => {
      pipeline::write_sitemap(&config, Zoned::now().date())?;
    },
    Commands::Compress => {
      pipeline::compress(&config)?;
    },
    Commands::Publish {
      dry_run,
      no_invalidate,
    } => {
      let report = pipeline::upload(&config, *dry_run, !no_invalidate)?;
      if !report.is_clean() {
        log::warn!("{} objects failed to upload", report.failed.len());
      }
    },
    Commands::Build => pipeline::build(&config)?,
    Commands::ExportSql { output, lookups } => {
      let mut config = config;
      if let Some(output) = output {
        config.export.get_or_insert_with(Default::default).output_file =
          output.clone();
      }
      if let Some(lookups) = lookups {
        config.export.get_or_insert_with(Default::default).lookup_file =
          Some(lookups.clone());
      }
      pipeline::write_sql(&config, Zoned::now().datetime())?;
    },
    Commands::Init { .. } | Commands::ExportTemplates { .. } => {},
  }

  Ok(())
}

fn init(output: &std::path::Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent() {
    if !parent.as_os_str().is_empty() && !parent.exists() {
      fs::create_dir_all(parent).wrap_err_with(|| {
        format!("Failed to create directory: {}", parent.display())
      })?;
      info!("Created directory: {}", parent.display());
    }
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to describe your \
     collection."
  );
  Ok(())
}
