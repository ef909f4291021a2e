use std::{
  collections::HashMap,
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use cardsite_macros::Configurable;
use serde::{Deserialize, Serialize};

use crate::{
  error::ConfigError,
  export::ExportConfig,
  postprocess::PostprocessConfig,
  publish::PublishConfig,
  site::SiteConfig,
  sitemap::SitemapConfig,
};

/// Configuration for the cardsite build pipeline.
///
/// A single [`Config`] is assembled in `main` from built-in defaults, config
/// files and `--config KEY=VALUE` overrides, then handed by reference to every
/// stage. Sections that are absent from every source fall back to their
/// defaults through the accessor methods.
#[derive(Debug, Clone, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct Config {
  /// Directory holding one HTML table fragment per season.
  #[config(key = "content_dir")]
  pub content_dir: PathBuf,

  /// Staging directory for the generated site.
  #[config(key = "output_dir")]
  pub output_dir: PathBuf,

  /// Deployable mirror of `output_dir`.
  #[config(key = "dist_dir")]
  pub dist_dir: PathBuf,

  /// Local image tree consulted by the sitemap builder.
  #[config(key = "images_dir")]
  pub images_dir: PathBuf,

  /// URL path segment of the generated detail pages.
  #[config(key = "cards_folder")]
  pub cards_folder: String,

  /// URL path segment of the card images.
  #[config(key = "images_folder")]
  pub images_folder: String,

  /// Directory whose files override the embedded templates by name.
  #[config(key = "template_dir", allow_empty)]
  pub template_dir: Option<PathBuf>,

  /// Site identity and fixed page copy.
  #[config(nested)]
  pub site: Option<SiteConfig>,

  /// Sitemap generation settings.
  #[config(nested)]
  pub sitemap: Option<SitemapConfig>,

  /// Minify and gzip settings for the deploy tree.
  #[config(nested)]
  pub postprocess: Option<PostprocessConfig>,

  /// Object storage and CDN settings.
  #[config(nested)]
  pub publish: Option<PublishConfig>,

  /// SQL import script settings.
  #[config(nested)]
  pub export: Option<ExportConfig>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      content_dir:   PathBuf::from("content"),
      output_dir:    PathBuf::from("build"),
      dist_dir:      PathBuf::from("dist"),
      images_dir:    PathBuf::from("images"),
      cards_folder:  "cards".to_string(),
      images_folder: "images".to_string(),
      template_dir:  None,
      site:          None,
      sitemap:       None,
      postprocess:   None,
      publish:       None,
      export:        None,
    }
  }
}

impl Config {
  /// Site section, or its defaults.
  #[must_use]
  pub fn site(&self) -> SiteConfig {
    self.site.clone().unwrap_or_default()
  }

  /// Sitemap section, or its defaults.
  #[must_use]
  pub fn sitemap(&self) -> SitemapConfig {
    self.sitemap.clone().unwrap_or_default()
  }

  /// Postprocess section, or its defaults.
  #[must_use]
  pub fn postprocess(&self) -> PostprocessConfig {
    self.postprocess.clone().unwrap_or_default()
  }

  /// Publish section, or its defaults.
  #[must_use]
  pub fn publish(&self) -> PublishConfig {
    self.publish.clone().unwrap_or_default()
  }

  /// Export section, or its defaults.
  #[must_use]
  pub fn export(&self) -> ExportConfig {
    self.export.clone().unwrap_or_default()
  }

  /// Whether the deploy tree stores `path` gzip-encoded.
  ///
  /// The asset pipeline and the publisher both ask this, so stored bytes and
  /// the `Content-Encoding` header cannot disagree.
  #[must_use]
  pub fn is_gzip_encoded(&self, path: &Path) -> bool {
    self.postprocess().gzip
      && path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| self.publish().is_gzip_extension(ext))
  }

  /// Path of the generated index page.
  #[must_use]
  pub fn index_path(&self) -> PathBuf {
    self.output_dir.join("index.html")
  }

  /// Path of the generated sitemap.
  #[must_use]
  pub fn sitemap_path(&self) -> PathBuf {
    self.output_dir.join(self.sitemap().file_name)
  }

  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format is
  /// unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
      .map_err(ConfigError::io("read config file", path))?;

    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match extension.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|source| {
          ConfigError::Json {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|source| {
          ConfigError::Toml {
            path: path.to_path_buf(),
            source,
          }
        })
      },
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from files and CLI overrides, merging them.
  ///
  /// Explicit config files are merged in order. Without any, a config file in
  /// a standard location is used if one exists, otherwise the defaults.
  /// Overrides are applied last.
  ///
  /// # Errors
  ///
  /// Returns an error if a config file cannot be loaded or an override is
  /// malformed.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged_config = Self::from_file(first)?;

      for config_path in rest {
        let additional_config = Self::from_file(config_path)?;
        merged_config.merge(additional_config);
      }

      if config_files.len() > 1 {
        log::info!("Loaded and merged {} config files", config_files.len());
      }

      merged_config
    } else if let Some(discovered_config) = Self::find_config_file() {
      log::info!(
        "Using discovered config file: {}",
        discovered_config.display()
      );
      Self::from_file(&discovered_config)?
    } else {
      log::debug!("No config file found, using defaults");
      Self::default()
    };

    config.apply_overrides(config_overrides)?;

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
  ///
  /// # Example
  ///
  /// ```rust, ignore
  /// config.apply_overrides(&vec![
  ///     "publish.bucket=example.org".to_string(),
  ///     "postprocess.minify_css=false".to_string(),
  /// ])?;
  /// ```
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Merge another config into this one, with the other config's values taking
  /// precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields and nested sections: other's [`Some`] replaces
  /// - [`Vec<T>`] fields: other's entries are appended
  /// - Plain fields: other's value always replaces
  pub fn merge(&mut self, other: Self) {
    self.merge_fields(other);
  }

  /// Path to a template file inside the configured template directory.
  ///
  /// This method does not check if the returned path exists.
  #[must_use]
  pub fn get_template_file(&self, name: &str) -> Option<PathBuf> {
    self.template_dir.as_ref().map(|dir| dir.join(name))
  }

  /// Search for config files in common locations
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let current_dir = std::env::current_dir().ok()?;
        Self::find_config_file_in(&current_dir)
      })
      .clone()
  }

  fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    let config_filenames = [
      "cardsite.toml",
      "cardsite.json",
      ".cardsite.toml",
      ".cardsite.json",
      ".config/cardsite.toml",
      ".config/cardsite.json",
    ];

    config_filenames
      .iter()
      .map(|filename| dir.join(filename))
      .find(|path| path.is_file())
  }

  /// Validate all input paths specified in the configuration.
  ///
  /// Output directories are created on demand and are not checked. Every
  /// problem is reported at once.
  ///
  /// # Errors
  ///
  /// Returns an error listing every configured path that is missing or of the
  /// wrong kind.
  pub fn validate_paths(&self) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    let mut check_dir = |label: &str, path: &Path| {
      if !path.exists() {
        errors.push(format!("{label} does not exist: {}", path.display()));
      } else if !path.is_dir() {
        errors
          .push(format!("{label} is not a directory: {}", path.display()));
      }
    };

    check_dir("Content directory", &self.content_dir);
    check_dir("Images directory", &self.images_dir);
    if let Some(ref template_dir) = self.template_dir {
      check_dir("Template directory", template_dir);
    }

    if !errors.is_empty() {
      let error_message = errors.join("\n");
      return Err(ConfigError::Config(format!(
        "Configuration path validation errors:\n{error_message}"
      )));
    }

    Ok(())
  }

  /// Generate a default configuration file with commented explanations
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unknown or the file cannot be written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)
      .map_err(|e| ConfigError::Template(e.to_string()))?;

    fs::write(path, config_content)
      .map_err(ConfigError::io("write default config to", path))?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }

  /// Export embedded templates to a directory for customization
  ///
  /// `templates` narrows the export to the given file names or extensions;
  /// `None`, an empty list or `all` exports everything.
  ///
  /// # Errors
  ///
  /// Returns an error if the output directory cannot be created or a template
  /// cannot be written.
  pub fn export_templates(
    output_dir: &Path,
    force: bool,
    templates: Option<Vec<String>>,
  ) -> Result<(), ConfigError> {
    fs::create_dir_all(output_dir)
      .map_err(ConfigError::io("create template directory", output_dir))?;

    let all_templates = Self::get_template_sources();
    let templates_to_export: Vec<_> = match templates {
      Some(specified) if !specified.is_empty() => {
        all_templates
          .into_iter()
          .filter(|(name, _)| {
            specified.iter().any(|t| {
              *t == "all" || *name == t.as_str() || name.ends_with(&format!(".{t}"))
            })
          })
          .collect()
      },
      _ => all_templates.into_iter().collect(),
    };

    for (filename, content) in templates_to_export {
      let file_path = output_dir.join(filename);

      if file_path.exists() && !force {
        log::warn!(
          "File {} already exists. Use --force to overwrite.",
          file_path.display()
        );
        continue;
      }

      fs::write(&file_path, content)
        .map_err(ConfigError::io("write template file", &file_path))?;
      log::info!("Exported template: {}", file_path.display());
    }

    Ok(())
  }

  /// Get mapping of template filenames to their embedded content
  fn get_template_sources() -> HashMap<&'static str, &'static str> {
    cardsite_templates::all_templates()
  }
}

#[cfg(test)]
mod tests {
  #![allow(
    clippy::useless_vec,
    clippy::unwrap_used,
    clippy::field_reassign_with_default,
    reason = "Fine in tests"
  )]

  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.content_dir, PathBuf::from("content"));
    assert_eq!(config.output_dir, PathBuf::from("build"));
    assert_eq!(config.dist_dir, PathBuf::from("dist"));
    assert_eq!(config.cards_folder, "cards");
    assert_eq!(config.index_path(), PathBuf::from("build/index.html"));
    assert_eq!(config.sitemap_path(), PathBuf::from("build/sitemap.xml"));
    assert_eq!(config.publish().region, "eu-central-1");
  }

  #[test]
  fn test_is_gzip_encoded() {
    let mut config = Config::default();
    assert!(config.is_gzip_encoded(Path::new("cards/1997-98/a.html")));
    assert!(config.is_gzip_encoded(Path::new("css/main.CSS")));
    assert!(!config.is_gzip_encoded(Path::new("images/1997-98/a-front.jpg")));
    assert!(!config.is_gzip_encoded(Path::new("LICENSE")));

    config.postprocess = Some(PostprocessConfig {
      gzip: false,
      ..Default::default()
    });
    assert!(!config.is_gzip_encoded(Path::new("index.html")));
  }

  #[test]
  fn test_apply_overrides_paths_and_nested() {
    let mut config = Config::default();

    config
      .apply_overrides(&vec![
        "output_dir=/tmp/site".to_string(),
        "publish.bucket=example.org".to_string(),
        "postprocess.minify_css=false".to_string(),
        "site.base_url = https://example.org".to_string(),
      ])
      .unwrap();

    assert_eq!(config.output_dir, PathBuf::from("/tmp/site"));
    assert_eq!(config.publish().bucket, "example.org");
    assert!(!config.postprocess().minify_css);
    assert!(config.postprocess().minify_html);
    assert_eq!(config.site().base_url, "https://example.org");
  }

  #[test]
  fn test_apply_overrides_invalid_format() {
    let mut config = Config::default();

    let result = config.apply_overrides(&vec!["no_equals_sign".to_string()]);

    assert!(result.is_err());
    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Expected KEY=VALUE")
    );
  }

  #[test]
  fn test_apply_overrides_unknown_key() {
    let mut config = Config::default();

    let result = config.apply_overrides(&vec!["unknown_key=value".to_string()]);

    assert!(
      result
        .unwrap_err()
        .to_string()
        .contains("Unknown configuration key")
    );

    let result = config.apply_overrides(&vec!["publish.nope=1".to_string()]);
    assert!(result.is_err());
  }

  #[test]
  fn test_apply_override_option_path_with_empty() {
    let mut config = Config::default();
    config.apply_override("template_dir", "/tmp/tpl").unwrap();
    assert_eq!(config.template_dir, Some(PathBuf::from("/tmp/tpl")));
    assert_eq!(
      config.get_template_file("card.html"),
      Some(PathBuf::from("/tmp/tpl/card.html"))
    );

    config.apply_override("template_dir", "").unwrap();
    assert!(config.template_dir.is_none());
    assert!(config.get_template_file("card.html").is_none());
  }

  #[test]
  fn test_merge_nested_sections_replace() {
    let mut base = Config::default();
    base.publish = Some(PublishConfig {
      bucket: "base".to_string(),
      ..Default::default()
    });

    let mut other = Config::default();
    other.output_dir = PathBuf::from("public");
    other.publish = None;
    other.sitemap = Some(SitemapConfig {
      stylesheet: None,
      ..Default::default()
    });

    base.merge(other);

    assert_eq!(base.output_dir, PathBuf::from("public"));
    // publish stays, other had no section
    assert_eq!(base.publish().bucket, "base");
    assert!(base.sitemap().stylesheet.is_none());
  }

  #[test]
  fn test_from_file_toml_and_json() {
    let dir = tempfile::tempdir().unwrap();

    let toml_path = dir.path().join("cardsite.toml");
    fs::write(
      &toml_path,
      "output_dir = \"out\"\n[publish]\nbucket = \"cards.example\"\n",
    )
    .unwrap();
    let config = Config::from_file(&toml_path).unwrap();
    assert_eq!(config.output_dir, PathBuf::from("out"));
    assert_eq!(config.publish().bucket, "cards.example");
    // untouched fields keep their defaults
    assert_eq!(config.publish().content_language, "en-US");
    assert_eq!(config.content_dir, PathBuf::from("content"));

    let json_path = dir.path().join("cardsite.json");
    fs::write(&json_path, r#"{ "site": { "subject": "Chris Webber" } }"#)
      .unwrap();
    let config = Config::from_file(&json_path).unwrap();
    assert_eq!(config.site().subject, "Chris Webber");

    let yaml_path = dir.path().join("cardsite.yaml");
    fs::write(&yaml_path, "output_dir: out").unwrap();
    assert!(Config::from_file(&yaml_path).is_err());
  }

  #[test]
  fn test_from_file_errors_keep_path_and_source() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.toml");
    let err = Config::from_file(&missing).unwrap_err();
    assert!(
      matches!(&err, ConfigError::Io { path, source, .. }
        if *path == missing && source.kind() == std::io::ErrorKind::NotFound)
    );
    assert!(err.to_string().starts_with("Failed to read config file"));

    let broken_toml = dir.path().join("broken.toml");
    fs::write(&broken_toml, "output_dir = \"unterminated\n").unwrap();
    let err = Config::from_file(&broken_toml).unwrap_err();
    assert!(
      matches!(&err, ConfigError::Toml { path, .. } if *path == broken_toml)
    );
    assert!(std::error::Error::source(&err).is_some());

    let broken_json = dir.path().join("broken.json");
    fs::write(&broken_json, "{ \"output_dir\": ").unwrap();
    let err = Config::from_file(&broken_json).unwrap_err();
    assert!(
      matches!(&err, ConfigError::Json { path, .. } if *path == broken_json)
    );
  }

  #[test]
  fn test_export_templates_reports_unwritable_directory() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("templates");
    fs::write(&blocker, "not a directory").unwrap();

    let err = Config::export_templates(&blocker, true, None).unwrap_err();
    assert!(
      matches!(&err, ConfigError::Io { action, path, .. }
        if *action == "create template directory" && *path == blocker)
    );
  }

  #[test]
  fn test_load_merges_files_in_order_then_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.toml");
    let second = dir.path().join("second.toml");
    fs::write(&first, "output_dir = \"one\"\ndist_dir = \"d1\"\n").unwrap();
    fs::write(&second, "output_dir = \"two\"\n").unwrap();

    let config = Config::load(&[first, second], &[
      "dist_dir=d3".to_string(),
    ])
    .unwrap();

    assert_eq!(config.output_dir, PathBuf::from("two"));
    assert_eq!(config.dist_dir, PathBuf::from("d3"));
  }

  #[test]
  fn test_find_config_file_in_prefers_plain_name() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Config::find_config_file_in(dir.path()).is_none());

    fs::create_dir_all(dir.path().join(".config")).unwrap();
    fs::write(dir.path().join(".config/cardsite.toml"), "").unwrap();
    assert_eq!(
      Config::find_config_file_in(dir.path()),
      Some(dir.path().join(".config/cardsite.toml"))
    );

    fs::write(dir.path().join("cardsite.toml"), "").unwrap();
    assert_eq!(
      Config::find_config_file_in(dir.path()),
      Some(dir.path().join("cardsite.toml"))
    );
  }

  #[test]
  fn test_validate_paths_reports_all_problems() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.content_dir = dir.path().join("missing-content");
    config.images_dir = dir.path().join("missing-images");

    let err = config.validate_paths().unwrap_err().to_string();
    assert!(err.contains("Content directory does not exist"));
    assert!(err.contains("Images directory does not exist"));

    fs::create_dir_all(&config.content_dir).unwrap();
    fs::create_dir_all(&config.images_dir).unwrap();
    config.validate_paths().unwrap();
  }

  #[test]
  fn test_generate_default_config_parses_back() {
    let dir = tempfile::tempdir().unwrap();
    let toml_path = dir.path().join("cardsite.toml");
    Config::generate_default_config("toml", &toml_path).unwrap();
    let config = Config::from_file(&toml_path).unwrap();
    assert_eq!(config.publish().bucket, "maulmann.de");
    assert_eq!(config.sitemap().static_pages.len(), 5);

    let json_path = dir.path().join("cardsite.json");
    Config::generate_default_config("json", &json_path).unwrap();
    let config = Config::from_file(&json_path).unwrap();
    assert_eq!(config.postprocess().gzip_level, 9);

    assert!(
      Config::generate_default_config("yaml", &dir.path().join("x.yaml"))
        .is_err()
    );
  }

  #[test]
  fn test_export_templates_respects_force() {
    let dir = tempfile::tempdir().unwrap();
    let card = dir.path().join("card.html");
    fs::write(&card, "custom").unwrap();

    Config::export_templates(dir.path(), false, None).unwrap();
    assert_eq!(fs::read_to_string(&card).unwrap(), "custom");
    assert!(dir.path().join("index.html").exists());

    Config::export_templates(dir.path(), true, Some(vec![
      "card.html".to_string(),
    ]))
    .unwrap();
    assert_ne!(fs::read_to_string(&card).unwrap(), "custom");
  }
}
