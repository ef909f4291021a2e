//! Minifiers for the text assets of the deploy tree.

use std::{borrow::Cow, path::Path};

use cardsite_config::postprocess::{
  CssMinifyOptions,
  HtmlMinifyOptions,
  JsMinifyOptions,
  PostprocessConfig,
};
use color_eyre::{Result, eyre::eyre};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Kind of text asset the minifiers know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
  Html,
  Css,
  Js,
}

impl AssetKind {
  /// Classify a path by its extension.
  #[must_use]
  pub fn from_path(path: &Path) -> Option<Self> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
      "html" | "htm" => Some(Self::Html),
      "css" => Some(Self::Css),
      "js" | "mjs" => Some(Self::Js),
      _ => None,
    }
  }

  /// Whether `config` switches minification on for this kind.
  #[must_use]
  pub const fn is_enabled(self, config: &PostprocessConfig) -> bool {
    match self {
      Self::Html => config.minify_html,
      Self::Css => config.minify_css,
      Self::Js => config.minify_js,
    }
  }
}

/// Minify `content` as `kind`.
///
/// Returns the input untouched when the kind is switched off.
///
/// # Errors
///
/// Returns an error if CSS or JavaScript does not parse.
pub fn minify<'a>(
  kind: AssetKind,
  content: &'a str,
  config: &PostprocessConfig,
) -> Result<Cow<'a, str>> {
  if !kind.is_enabled(config) {
    return Ok(Cow::Borrowed(content));
  }

  let minified = match kind {
    AssetKind::Html => html(content, &config.html_options()),
    AssetKind::Css => css(content, &config.css_options())?,
    AssetKind::Js => js(content, &config.js_options())?,
  };
  Ok(Cow::Owned(minified))
}

fn html(content: &str, options: &HtmlMinifyOptions) -> String {
  let cfg = minify_html::Cfg {
    keep_comments: !options.remove_comments,
    minify_css: options.minify_css,
    ..minify_html::Cfg::default()
  };
  String::from_utf8_lossy(&minify_html::minify(content.as_bytes(), &cfg))
    .into_owned()
}

fn css(content: &str, options: &CssMinifyOptions) -> Result<String> {
  let sheet = StyleSheet::parse(content, ParserOptions::default())
    .map_err(|e| eyre!("Failed to parse CSS: {e}"))?;

  let printed = sheet
    .to_css(PrinterOptions {
      minify: options.minify,
      ..PrinterOptions::default()
    })
    .map_err(|e| eyre!("Failed to print CSS: {e}"))?;
  Ok(printed.code)
}

fn js(content: &str, options: &JsMinifyOptions) -> Result<String> {
  let allocator = Allocator::default();
  // page scripts are classic scripts
  let parsed = Parser::new(&allocator, content, SourceType::cjs()).parse();

  if let Some(first) = parsed.errors.first() {
    return Err(eyre!(
      "Failed to parse JavaScript: {first} ({} errors)",
      parsed.errors.len()
    ));
  }

  let mut program = parsed.program;
  Minifier::new(MinifierOptions {
    compress: options.compress.then(CompressOptions::default),
    mangle:   options.mangle.then(MangleOptions::default),
  })
  .minify(&allocator, &mut program);

  Ok(
    Codegen::new()
      .with_options(CodegenOptions::minify())
      .build(&program)
      .code,
  )
}
