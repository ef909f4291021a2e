#![allow(clippy::expect_used, clippy::unwrap_used, reason = "Fine in tests")]

use std::fs;

use cardsite_catalog::{Card, CollectionDocument, derive_identity};
use tempfile::TempDir;

const INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
<h2><a id=1997-98>1997-98</a> [This Season: 2 | Total: 2]</h2>
<table>
<tr><th>Player</th><th>Season</th><th>Company</th><th>Brand</th><th>Variant</th><th>Number</th><th>Serial</th><th>Print Run</th></tr>
<tr><td>Juwan Howard</td><td>1997-98</td><td>Fleer</td><td>Fleer</td><td>Base</td><td>33</td><td>0</td><td></td></tr>
<tr><td>Juwan Howard</td><td>1997-98</td><td>Skybox</td><td>Metal Universe</td><td>Precious Metal Gems</td><td>80</td><td>7</td><td>100</td></tr>
</table>
<h2><a id=2005-06>2005-06</a> [This Season: 1 | Total: 3]</h2>
<table>
<tr><th>Player</th><th>Team</th><th>Season</th><th>Brand</th><th>Number</th><th>Grade</th></tr>
<tr><td>Juwan Howard</td><td></td><td>2005-06</td><td>Topps</td><td>101</td><td>9</td></tr>
</table>
</body>
</html>"#;

#[test]
fn test_index_round_trip_through_disk() {
  let dir = TempDir::new().expect("Failed to create temp dir");
  let path = dir.path().join("index.html");
  fs::write(&path, INDEX).unwrap();

  let doc = CollectionDocument::parse(&fs::read_to_string(&path).unwrap());
  let tables = doc.tables().unwrap();
  assert_eq!(tables.len(), 2);

  let cards: Vec<Card> = tables
    .iter()
    .flat_map(|table| table.records.iter().cloned())
    .map(|record| Card::new(record, "cards"))
    .collect();

  let paths: Vec<&str> =
    cards.iter().map(|c| c.identity.full_path.as_str()).collect();
  assert_eq!(paths, [
    "cards/1997-98/Juwan-Howard-Washington-Wizards-1997-98-Fleer-Fleer-Base-33.\
     html",
    "cards/1997-98/Juwan-Howard-Washington-Wizards-1997-98-Skybox-Metal-\
     Universe-Precious-Metal-Gems-80-sn7.html",
    "cards/2005-06/Juwan-Howard-Houston-Rockets-2005-06-Topps-101-9.html",
  ]);

  // link rewriting and re-parsing keeps every identity stable
  let mut row_offset = 0;
  for table in &tables {
    for (row, _) in table.records.iter().enumerate() {
      let card = &cards[row_offset + row];
      table
        .link_first_cell(row, &card.identity.full_path, "details")
        .unwrap();
    }
    row_offset += table.len();
  }
  fs::write(&path, doc.to_html().unwrap()).unwrap();

  let reparsed = CollectionDocument::parse(&fs::read_to_string(&path).unwrap());
  let rederived: Vec<String> = reparsed
    .tables()
    .unwrap()
    .iter()
    .flat_map(|table| table.records.iter())
    .map(|record| derive_identity(record, "cards").full_path)
    .collect();
  assert_eq!(rederived, paths);
}
