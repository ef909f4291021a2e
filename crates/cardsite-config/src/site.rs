use cardsite_macros::Configurable;
use serde::{Deserialize, Serialize};

/// A link to a sibling collection page, listed in the index footer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedPage {
  pub href:  String,
  pub title: String,
  pub label: String,
}

impl RelatedPage {
  fn new(href: &str, title: &str, label: &str) -> Self {
    Self {
      href:  href.to_string(),
      title: title.to_string(),
      label: label.to_string(),
    }
  }
}

/// Site identity and the fixed copy that ends up in every generated page.
#[derive(Debug, Clone, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct SiteConfig {
  /// Public origin of the site, without a trailing slash.
  #[config(key = "base_url")]
  pub base_url: String,

  /// Player the collection is about. Used in alt texts and SEO copy.
  #[config(key = "subject")]
  pub subject: String,

  /// Suffix of every detail page `<title>`.
  #[config(key = "collection_title")]
  pub collection_title: String,

  /// `<title>` and `<h1>` of the index page.
  #[config(key = "index_title")]
  pub index_title: String,

  /// Meta description of the index page.
  #[config(key = "index_description")]
  pub index_description: String,

  /// Stylesheet path relative to the site root.
  #[config(key = "stylesheet")]
  pub stylesheet: String,

  /// Google Analytics measurement id. Analytics markup is omitted when empty.
  #[config(key = "analytics_id")]
  pub analytics_id: String,

  /// Footer line of the detail pages.
  #[config(key = "copyright")]
  pub copyright: String,

  /// "Other Collections" links at the bottom of the index.
  pub related_pages: Vec<RelatedPage>,
}

impl Default for SiteConfig {
  fn default() -> Self {
    Self {
      base_url:          "https://www.maulmann.de".to_string(),
      subject:           "Juwan Howard".to_string(),
      collection_title:  "Juwan Howard Collection".to_string(),
      index_title:       "Juwan Howard Basketball Trading Card Collection"
        .to_string(),
      index_description: "Private Collection of Juwan Howard Basketball \
                          Trading Cards. Containing many 1/1 and rare Trading \
                          Cards from companies like: Panini, Fleer, Topps \
                          and Upper Deck."
        .to_string(),
      stylesheet:        "css/main.css".to_string(),
      analytics_id:      "G-535TKYRZTR".to_string(),
      copyright:         "Juwan Howard Collection &copy; 2026".to_string(),
      related_pages:     vec![
        RelatedPage::new(
          "index.html",
          "Juwan Howard Cards Collection",
          "Juwan Howard Basketball Cards Collection",
        ),
        RelatedPage::new(
          "Wantlist.html",
          "Juwan Howard Collection Wantlist",
          "Juwan Howard Basketball Cards Wantlist",
        ),
        RelatedPage::new(
          "Baseball.html",
          "Upper Deck Baseball Cards",
          "Upper Deck Baseball Cards",
        ),
        RelatedPage::new(
          "Flawless.html",
          "2008 Upper Deck Flawless Basketball",
          "2008 Upper Deck Flawless Basketball",
        ),
        RelatedPage::new(
          "Panini.html",
          "2012-13 Panini Flawless Basketball",
          "2012-13 Panini Flawless Basketball",
        ),
      ],
    }
  }
}

impl SiteConfig {
  /// Absolute URL for a site-relative path.
  #[must_use]
  pub fn url_for(&self, path: &str) -> String {
    format!(
      "{}/{}",
      self.base_url.trim_end_matches('/'),
      path.trim_start_matches('/')
    )
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, reason = "Fine in tests")]

  use super::*;

  #[test]
  fn test_url_for_joins_with_single_slash() {
    let mut site = SiteConfig::default();
    assert_eq!(
      site.url_for("cards/1997-98/a.html"),
      "https://www.maulmann.de/cards/1997-98/a.html"
    );

    site.base_url = "https://example.org/".to_string();
    assert_eq!(site.url_for("/index.html"), "https://example.org/index.html");
  }

  #[test]
  fn test_site_overrides() {
    let mut site = SiteConfig::default();
    site.apply_override("subject", "Chris Webber").unwrap();
    site.apply_override("analytics_id", "").unwrap();

    assert_eq!(site.subject, "Chris Webber");
    assert!(site.analytics_id.is_empty());
    assert!(site.apply_override("related_pages", "x").is_err());
  }
}
