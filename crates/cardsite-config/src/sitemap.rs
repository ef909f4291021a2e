use cardsite_macros::Configurable;
use serde::{Deserialize, Serialize};

/// A hand-maintained page listed ahead of the card pages in the sitemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticPage {
  /// Path relative to the site root.
  pub path:       String,
  pub priority:   f32,
  pub changefreq: String,
}

impl StaticPage {
  fn new(path: &str, priority: f32, changefreq: &str) -> Self {
    Self {
      path: path.to_string(),
      priority,
      changefreq: changefreq.to_string(),
    }
  }
}

/// Sitemap generation settings
#[derive(Debug, Clone, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct SitemapConfig {
  /// File name of the sitemap inside the output directory.
  #[config(key = "file_name")]
  pub file_name: String,

  /// Optional XSL stylesheet URL, emitted as `<?xml-stylesheet?>`.
  #[config(key = "stylesheet", allow_empty)]
  pub stylesheet: Option<String>,

  /// Pages listed before the generated card pages.
  pub static_pages: Vec<StaticPage>,
}

impl Default for SitemapConfig {
  fn default() -> Self {
    Self {
      file_name:    "sitemap.xml".to_string(),
      stylesheet:   Some("https://www.maulmann.de/sitemap.xsl".to_string()),
      static_pages: vec![
        StaticPage::new("index.html", 1.0, "weekly"),
        StaticPage::new("Wantlist.html", 0.8, "monthly"),
        StaticPage::new("Baseball.html", 0.8, "monthly"),
        StaticPage::new("Flawless.html", 0.8, "monthly"),
        StaticPage::new("Panini.html", 0.8, "monthly"),
      ],
    }
  }
}
