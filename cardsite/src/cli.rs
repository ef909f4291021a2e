use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

/// Command line interface for cardsite
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "cardsite: static pages for a trading card collection"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  #[command(flatten)]
  pub verbosity: Verbosity<InfoLevel>,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append, global = true)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append, global = true)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the cardsite CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new cardsite configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "cardsite.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Export the built-in templates to a directory for customization.
  ExportTemplates {
    /// Output directory for template files.
    #[arg(short, long, default_value = "templates")]
    output_dir: PathBuf,

    /// Whether to overwrite existing files.
    #[arg(long)]
    force: bool,

    /// Specific templates to export (e.g. card.html, html). If not specified,
    /// exports all.
    templates: Vec<String>,
  },

  /// Assemble the index page from the season fragments.
  Index,

  /// Render a detail page for every card and link the index rows to them.
  Pages,

  /// Write the sitemap for the generated index.
  Sitemap,

  /// Minify and gzip the staging tree into the deploy directory.
  Compress,

  /// Upload the deploy directory and invalidate the CDN.
  Publish {
    /// Log what would be uploaded without contacting the bucket.
    #[arg(long)]
    dry_run: bool,

    /// Skip the CDN invalidation after the upload.
    #[arg(long)]
    no_invalidate: bool,
  },

  /// Run index, pages, sitemap and compress in order.
  Build,

  /// Write an SQL import script for the cards of the generated index.
  ExportSql {
    /// Script to write instead of `export.output_file`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// SQL dump with the lookup tables, instead of `export.lookup_file`.
    #[arg(short, long)]
    lookups: Option<PathBuf>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
