#![allow(clippy::expect_used, clippy::unwrap_used, reason = "Fine in tests")]
mod common;

use std::fs;

use cardsite_catalog::{Card, CollectionDocument};
use cardsite_config::Config;
use cardsite_html::{Fragment, IndexAssembler, SitemapBuilder, Templates};
use common::{SEASON_1997, SEASON_2005};
use jiff::civil::date;
use tempfile::tempdir;

fn fragments() -> Vec<Fragment> {
  vec![
    Fragment {
      name:    "1997-98".to_string(),
      content: SEASON_1997.to_string(),
    },
    Fragment {
      name:    "2005-06".to_string(),
      content: SEASON_2005.to_string(),
    },
  ]
}

#[test]
fn test_assembled_index_parses_back_into_cards() {
  let templates = Templates::embedded().unwrap();
  let index = IndexAssembler::new(&templates, &Config::default())
    .assemble(&fragments(), date(2026, 10, 19).at(8, 0, 0, 0))
    .unwrap();

  assert!(index.html.contains("[This Season: 3 | Total: 3]"));
  assert!(index.html.contains("[This Season: 1 | Total: 4]"));

  let doc = CollectionDocument::parse(&index.html);
  let tables = doc.tables().unwrap();
  assert_eq!(tables.len(), 2);
  assert_eq!(tables[0].len(), 3);
  assert_eq!(tables[1].len(), 1);
  assert_eq!(tables[1].records[0].get("Grading Co."), "PSA");
}

#[test]
fn test_sitemap_matches_generated_pages() {
  let temp_dir = tempdir().expect("Failed to create temp dir in test");
  let config = Config {
    images_dir: temp_dir.path().join("images"),
    ..Default::default()
  };

  let templates = Templates::embedded().unwrap();
  let index = IndexAssembler::new(&templates, &config)
    .assemble(&fragments(), date(2026, 10, 19).at(8, 0, 0, 0))
    .unwrap();

  // name pages and rewrite the player cells, as the page stage does
  let doc = CollectionDocument::parse(&index.html);
  let mut page_paths = Vec::new();
  for table in doc.tables().unwrap() {
    for (row, record) in table.records.iter().enumerate() {
      let card = Card::new(record.clone(), &config.cards_folder);
      table
        .link_first_cell(row, &card.identity.full_path, "View details")
        .unwrap();
      page_paths.push(card.identity.full_path);
    }
  }
  let rewritten = doc.to_html().unwrap();

  // only the graded card has scans
  let season = config.images_dir.join("2005-06");
  fs::create_dir_all(&season).unwrap();
  for side in ["front", "back"] {
    fs::write(
      season.join(format!(
        "Juwan-Howard-Houston-Rockets-2005-06-Topps-101-9-{side}.jpg"
      )),
      b"jpg",
    )
    .unwrap();
  }

  let records: Vec<_> = CollectionDocument::parse(&rewritten)
    .tables()
    .unwrap()
    .into_iter()
    .flat_map(|table| table.records)
    .collect();
  let sitemap = SitemapBuilder::new(&config).build(&records, date(2026, 10, 19));

  for path in &page_paths {
    assert!(
      sitemap
        .xml
        .contains(&format!("<loc>https://www.maulmann.de/{path}</loc>")),
      "sitemap is missing {path}"
    );
  }

  assert_eq!(sitemap.report.cards, 4);
  assert_eq!(sitemap.report.urls, 9);
  assert_eq!(sitemap.report.missing_images, 6);
  assert_eq!(sitemap.xml.matches("<image:image>").count(), 2);
  assert!(sitemap.xml.contains(
    "<image:title>Back view: Juwan Howard 2005-06 Topps </image:title>"
  ));
}
