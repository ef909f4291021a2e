use cardsite_macros::Configurable;
use serde::{Deserialize, Serialize};

/// The `compress` stage: how `output_dir` is mirrored into `dist_dir`.
///
/// Minification runs per file kind (`minify-html`, `lightningcss`,
/// `oxc_minifier`), then files with an extension from
/// `publish.gzip_extensions` are gzip-encoded in place by `flate2`.
#[derive(Debug, Clone, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct PostprocessConfig {
  /// Minify detail pages, the index and any other `.html`
  #[config(key = "minify_html")]
  pub minify_html: bool,

  /// Minify stylesheets
  #[config(key = "minify_css")]
  pub minify_css: bool,

  /// Minify scripts
  #[config(key = "minify_js")]
  pub minify_js: bool,

  /// Whether to gzip files whose extension is in `publish.gzip_extensions`
  #[config(key = "gzip")]
  pub gzip: bool,

  /// Deflate level, values above 9 act as 9
  #[config(key = "gzip_level")]
  pub gzip_level: u32,

  /// `[postprocess.html]`
  #[config(nested)]
  pub html: Option<HtmlMinifyOptions>,

  /// `[postprocess.css]`
  #[config(nested)]
  pub css: Option<CssMinifyOptions>,

  /// `[postprocess.js]`
  #[config(nested)]
  pub js: Option<JsMinifyOptions>,
}

impl Default for PostprocessConfig {
  fn default() -> Self {
    Self {
      minify_html: true,
      minify_css:  true,
      minify_js:   true,
      gzip:        true,
      gzip_level:  9,
      html:        None,
      css:         None,
      js:          None,
    }
  }
}

/// Knobs passed to `minify-html`.
#[derive(Debug, Clone, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct HtmlMinifyOptions {
  /// Drop `<!-- -->` comments
  #[config(key = "remove_comments")]
  pub remove_comments: bool,

  /// Minify inline `<style>` and `style=""` contents
  #[config(key = "minify_css")]
  pub minify_css: bool,
}

impl Default for HtmlMinifyOptions {
  fn default() -> Self {
    Self {
      remove_comments: true,
      minify_css:      true,
    }
  }
}

/// Knobs passed to `lightningcss`.
#[derive(Debug, Clone, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct CssMinifyOptions {
  /// Emit minified output. When disabled the stylesheet is only re-printed.
  #[config(key = "minify")]
  pub minify: bool,
}

impl Default for CssMinifyOptions {
  fn default() -> Self {
    Self { minify: true }
  }
}

/// Knobs passed to `oxc_minifier`.
#[derive(Debug, Clone, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct JsMinifyOptions {
  /// Dead code elimination, constant folding and friends
  #[config(key = "compress")]
  pub compress: bool,

  /// Shorten local identifiers
  #[config(key = "mangle")]
  pub mangle: bool,
}

impl Default for JsMinifyOptions {
  fn default() -> Self {
    Self {
      compress: true,
      mangle:   true,
    }
  }
}

impl PostprocessConfig {
  /// `[postprocess.html]`, or its defaults.
  #[must_use]
  pub fn html_options(&self) -> HtmlMinifyOptions {
    self.html.clone().unwrap_or_default()
  }

  /// `[postprocess.css]`, or its defaults.
  #[must_use]
  pub fn css_options(&self) -> CssMinifyOptions {
    self.css.clone().unwrap_or_default()
  }

  /// `[postprocess.js]`, or its defaults.
  #[must_use]
  pub fn js_options(&self) -> JsMinifyOptions {
    self.js.clone().unwrap_or_default()
  }

  /// Compression level clamped to what `flate2` accepts.
  #[must_use]
  pub fn gzip_level(&self) -> u32 {
    self.gzip_level.min(9)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_defaults_enable_everything() {
    let config = PostprocessConfig::default();
    assert!(config.minify_html);
    assert!(config.minify_css);
    assert!(config.minify_js);
    assert!(config.gzip);
    assert_eq!(config.gzip_level(), 9);
  }

  #[test]
  fn test_apply_override_bools() {
    let mut config = PostprocessConfig::default();

    config.apply_override("minify_html", "false").unwrap();
    assert!(!config.minify_html);

    config.apply_override("gzip", "no").unwrap();
    assert!(!config.gzip);

    let err = config.apply_override("minify_css", "maybe").unwrap_err();
    assert!(err.to_string().contains("minify_css"));
  }

  #[test]
  fn test_gzip_level_is_clamped() {
    let mut config = PostprocessConfig::default();
    config.apply_override("gzip_level", "42").unwrap();
    assert_eq!(config.gzip_level, 42);
    assert_eq!(config.gzip_level(), 9);

    assert!(config.apply_override("gzip_level", "-1").is_err());
  }

  #[test]
  fn test_nested_options_are_created_on_demand() {
    let mut config = PostprocessConfig::default();
    assert!(config.html.is_none());

    config.apply_override("html.remove_comments", "false").unwrap();
    assert!(!config.html_options().remove_comments);

    config.apply_override("js.mangle", "false").unwrap();
    let js = config.js_options();
    assert!(js.compress);
    assert!(!js.mangle);
  }

  #[test]
  fn test_merge_fields_replaces_nested_sections() {
    let mut config = PostprocessConfig::default();
    config.css = Some(CssMinifyOptions { minify: true });

    let other = PostprocessConfig {
      minify_js: false,
      css: Some(CssMinifyOptions { minify: false }),
      ..Default::default()
    };
    config.merge_fields(other);

    assert!(!config.minify_js);
    assert!(!config.css_options().minify);
  }
}
