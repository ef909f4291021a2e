use std::fs;

use cardsite_config::{Config, site::SiteConfig};
use cardsite_templates as templates;
use color_eyre::eyre::{Context as _, Result};
use tera::{Context, Tera};

/// Detail page template name.
pub const CARD: &str = "card";
/// Index shell template name.
pub const INDEX: &str = "index";
/// Shared `<head>` fragment template name.
pub const HEAD: &str = "head";

/// The page templates of one build.
///
/// Templates are registered without a file extension, so Tera does not
/// autoescape. Every value placed into a context must already be escaped,
/// see [`escape`].
pub struct Templates {
  tera: Tera,
}

impl Templates {
  /// Load every template, preferring files from `config.template_dir` over the
  /// embedded defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if a template override cannot be read or does not
  /// parse.
  pub fn load(config: &Config) -> Result<Self> {
    let mut tera = Tera::default();

    for (name, file_name, fallback) in [
      (CARD, "card.html", templates::CARD_TEMPLATE),
      (INDEX, "index.html", templates::INDEX_TEMPLATE),
      (HEAD, "head.html", templates::HEAD_TEMPLATE),
    ] {
      let content = load_template_content(config, file_name, fallback)?;
      tera
        .add_raw_template(name, &content)
        .wrap_err_with(|| format!("Failed to parse template {file_name}"))?;
    }

    Ok(Self { tera })
  }

  /// The embedded templates only.
  ///
  /// # Errors
  ///
  /// Returns an error if an embedded template fails to parse.
  pub fn embedded() -> Result<Self> {
    Self::load(&Config::default())
  }

  /// Render a registered template.
  ///
  /// # Errors
  ///
  /// Returns an error if rendering fails, e.g. on a missing variable.
  pub fn render(&self, name: &str, context: &Context) -> Result<String> {
    self
      .tera
      .render(name, context)
      .wrap_err_with(|| format!("Failed to render template '{name}'"))
  }

  /// Render the shared `<head>` block for a page `root_prefix` levels below
  /// the site root.
  ///
  /// # Errors
  ///
  /// Returns an error if rendering fails.
  pub fn render_head(
    &self,
    site: &SiteConfig,
    root_prefix: &str,
  ) -> Result<String> {
    let mut context = Context::new();
    context.insert("root_prefix", root_prefix);
    context.insert("stylesheet", &escape(&site.stylesheet));
    context.insert("analytics_id", &escape(&site.analytics_id));
    self.render(HEAD, &context)
  }
}

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape(text: &str) -> String {
  html_escape::encode_quoted_attribute(text).into_owned()
}

fn load_template_content(
  config: &Config,
  file_name: &str,
  fallback: &str,
) -> Result<String> {
  if let Some(path) = config.get_template_file(file_name)
    && path.exists()
  {
    log::debug!("Using template override {}", path.display());
    return fs::read_to_string(&path).wrap_err_with(|| {
      format!("Failed to read template file: {}", path.display())
    });
  }

  Ok(fallback.to_string())
}
