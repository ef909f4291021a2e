use std::fmt;

/// Error type for config template operations.
#[derive(Debug)]
pub enum TemplateError {
  /// The requested configuration format is not supported.
  UnsupportedFormat(String),
}

impl fmt::Display for TemplateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnsupportedFormat(format) => {
        write!(f, "Unsupported config format: {format}")
      },
    }
  }
}

impl std::error::Error for TemplateError {}

/// Default configuration template in TOML, written by `cardsite init`.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# cardsite configuration file

# Directory holding one HTML table fragment per season
content_dir = "content"

# Staging directory for the generated site
output_dir = "build"

# Deployable copy of the staging tree (minified + gzipped)
dist_dir = "dist"

# Where card images live. Only used to decide which images go into the sitemap
images_dir = "images"

# Folder names used in generated links
cards_folder = "cards"
images_folder = "images"

# Directory with template overrides (see `cardsite export-templates`)
# template_dir = "templates"

[site]
base_url = "https://www.maulmann.de"
subject = "Juwan Howard"
collection_title = "Juwan Howard Collection"
index_title = "Juwan Howard Basketball Trading Card Collection"
stylesheet = "css/main.css"
# Leave empty to drop the analytics snippet
analytics_id = ""
copyright = "Juwan Howard Collection &copy; 2026"

# Links at the bottom of the index page
# [[site.related_pages]]
# href = "Wantlist.html"
# title = "Juwan Howard Collection Wantlist"
# label = "Juwan Howard Basketball Cards Wantlist"

[sitemap]
file_name = "sitemap.xml"
stylesheet = "https://www.maulmann.de/sitemap.xsl"

# [[sitemap.static_pages]]
# path = "index.html"
# priority = 1.0
# changefreq = "weekly"

[postprocess]
minify_html = true
minify_css = true
minify_js = true
gzip = true
gzip_level = 9

[postprocess.html]
remove_comments = true
minify_css = true

[postprocess.js]
compress = true
mangle = true

[publish]
bucket = "maulmann.de"
region = "eu-central-1"
# profile = "default"
prefix = ""
content_language = "en-US"
# distribution_id = "E2XXXXXXXXXXXX"
gzip_extensions = ["html", "css", "js", "json", "xml", "svg", "txt"]

# `cardsite export-sql`: INSERT statements for a collection database
[export]
# Dump with the card_manufacturer, card_brand, card_theme and variant inserts
# lookup_file = "cardcollection.sql"
output_file = "collection_import.sql"
database = "cardcollection"
player_id = 1
rookie_season = "1994-95"
"#;

/// Default configuration template in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "content_dir": "content",
  "output_dir": "build",
  "dist_dir": "dist",
  "images_dir": "images",
  "cards_folder": "cards",
  "images_folder": "images",
  "site": {
    "base_url": "https://www.maulmann.de",
    "subject": "Juwan Howard",
    "collection_title": "Juwan Howard Collection",
    "index_title": "Juwan Howard Basketball Trading Card Collection",
    "stylesheet": "css/main.css",
    "analytics_id": "",
    "copyright": "Juwan Howard Collection &copy; 2026"
  },
  "sitemap": {
    "file_name": "sitemap.xml",
    "stylesheet": "https://www.maulmann.de/sitemap.xsl"
  },
  "postprocess": {
    "minify_html": true,
    "minify_css": true,
    "minify_js": true,
    "gzip": true,
    "gzip_level": 9,
    "html": {
      "remove_comments": true,
      "minify_css": true
    },
    "js": {
      "compress": true,
      "mangle": true
    }
  },
  "publish": {
    "bucket": "maulmann.de",
    "region": "eu-central-1",
    "prefix": "",
    "content_language": "en-US",
    "gzip_extensions": ["html", "css", "js", "json", "xml", "svg", "txt"]
  },
  "export": {
    "output_file": "collection_import.sql",
    "database": "cardcollection",
    "player_id": 1,
    "rookie_season": "1994-95"
  }
}
"#;

/// Get the correct configuration template based on the requested format.
///
/// # Errors
///
/// Returns an error if the requested format is not supported.
pub fn get_template(format: &str) -> Result<&'static str, TemplateError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(TemplateError::UnsupportedFormat(format.to_string())),
  }
}
