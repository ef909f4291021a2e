use std::{
  fmt::Write,
  path::{Path, PathBuf},
};

use cardsite_catalog::{CardRecord, DerivedIdentity, derive_identity, record::fields};
use cardsite_config::{
  Config,
  site::SiteConfig,
  sitemap::{SitemapConfig, StaticPage},
};
use jiff::civil::Date;
use log::warn;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Counts gathered while building a sitemap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SitemapReport {
  /// Card pages listed.
  pub cards:          usize,
  /// All `<url>` entries, static pages included.
  pub urls:           usize,
  /// Front or back images that were not found on disk.
  pub missing_images: usize,
}

/// A rendered sitemap and what went into it.
#[derive(Debug, Clone)]
pub struct Sitemap {
  pub xml:    String,
  pub report: SitemapReport,
}

/// Builds `sitemap.xml` for the card pages.
///
/// Card URLs come from [`derive_identity`], the same function that named the
/// pages. Image entries are only emitted for image files that exist below
/// `images_dir`.
pub struct SitemapBuilder {
  site:          SiteConfig,
  sitemap:       SitemapConfig,
  cards_folder:  String,
  images_folder: String,
  images_dir:    PathBuf,
}

impl SitemapBuilder {
  #[must_use]
  pub fn new(config: &Config) -> Self {
    Self {
      site:          config.site(),
      sitemap:       config.sitemap(),
      cards_folder:  config.cards_folder.clone(),
      images_folder: config.images_folder.trim_matches('/').to_string(),
      images_dir:    config.images_dir.clone(),
    }
  }

  /// Build the sitemap for `records`, stamping every entry with `lastmod`.
  #[must_use]
  pub fn build(&self, records: &[CardRecord], lastmod: Date) -> Sitemap {
    let lastmod = lastmod.to_string();
    let mut report = SitemapReport::default();

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    if let Some(stylesheet) = &self.sitemap.stylesheet {
      let _ = writeln!(
        xml,
        "<?xml-stylesheet type=\"text/xsl\" href=\"{}\"?>",
        escape_xml(stylesheet)
      );
    }
    let _ = writeln!(
      xml,
      "<urlset xmlns=\"{SITEMAP_NS}\"\n        xmlns:image=\"{IMAGE_NS}\">"
    );

    for page in &self.sitemap.static_pages {
      self.push_static(&mut xml, page, &lastmod);
      report.urls += 1;
    }

    for record in records {
      let identity = derive_identity(record, &self.cards_folder);
      let title = [
        fields::PLAYER,
        fields::SEASON,
        fields::BRAND,
        fields::VARIANT,
      ]
      .map(|key| record.get(key))
      .join(" ");

      let _ = writeln!(xml, "  <url>");
      let _ = writeln!(
        xml,
        "    <loc>{}</loc>",
        escape_xml(&self.site.url_for(&identity.full_path))
      );
      let _ = writeln!(xml, "    <lastmod>{lastmod}</lastmod>");
      let _ = writeln!(xml, "    <changefreq>never</changefreq>");
      let _ = writeln!(xml, "    <priority>0.6</priority>");

      for (side, label) in [("front", "Front view"), ("back", "Back view")] {
        if self.image_exists(&identity, side) {
          let url = self
            .site
            .url_for(&identity.image_path(&self.images_folder, side));
          let _ = writeln!(xml, "    <image:image>");
          let _ = writeln!(xml, "      <image:loc>{}</image:loc>", escape_xml(&url));
          let _ = writeln!(
            xml,
            "      <image:title>{label}: {}</image:title>",
            escape_xml(&title)
          );
          let _ = writeln!(xml, "    </image:image>");
        } else {
          warn!(
            "Missing {side} image for {}",
            identity.image_path(&self.images_dir.to_string_lossy(), side)
          );
          report.missing_images += 1;
        }
      }

      let _ = writeln!(xml, "  </url>");
      report.cards += 1;
      report.urls += 1;
    }

    xml.push_str("</urlset>");

    Sitemap { xml, report }
  }

  fn push_static(&self, xml: &mut String, page: &StaticPage, lastmod: &str) {
    let _ = writeln!(xml, "  <url>");
    let _ = writeln!(
      xml,
      "    <loc>{}</loc>",
      escape_xml(&self.site.url_for(&page.path))
    );
    let _ = writeln!(xml, "    <lastmod>{lastmod}</lastmod>");
    let _ = writeln!(
      xml,
      "    <changefreq>{}</changefreq>",
      escape_xml(&page.changefreq)
    );
    let _ = writeln!(xml, "    <priority>{:.1}</priority>", page.priority);
    let _ = writeln!(xml, "  </url>");
  }

  fn image_exists(&self, identity: &DerivedIdentity, side: &str) -> bool {
    self
      .images_dir
      .join(&identity.season_folder)
      .join(format!("{}-{side}.jpg", identity.filename_stem))
      .is_file()
  }

  /// Where the builder looks for card images.
  #[must_use]
  pub fn images_dir(&self) -> &Path {
    &self.images_dir
  }
}

/// Escape text for XML element content and attribute values.
fn escape_xml(text: &str) -> String {
  html_escape::encode_quoted_attribute(text).into_owned()
}
