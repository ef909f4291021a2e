#![allow(dead_code, clippy::expect_used, reason = "Test helpers")]

use cardsite_catalog::{Card, CollectionDocument};

/// A season table with the columns of the real collection.
pub const SEASON_1997: &str = r"<table>
<tr><th>Player</th><th>Season</th><th>Company</th><th>Brand</th><th>Theme</th><th>Variant</th><th>Number</th><th>Serial</th><th>Print Run</th><th>Rookie</th><th>Game Used</th><th>Autograph</th></tr>
<tr>
<td>Juwan Howard</td><td>1997-98</td><td>Fleer</td><td>Fleer</td><td></td><td></td><td>33</td><td>0</td><td></td><td>No</td><td>No</td><td>No</td>
</tr>
<tr>
<td>Juwan Howard</td><td>1997-98</td><td>Skybox</td><td>Metal Universe</td><td>Precious Metal Gems</td><td>Gold Refractor</td><td>80</td><td>1/1</td><td>1</td><td>No</td><td>Yes</td><td>Yes</td>
</tr>
<tr>
<td>Juwan Howard</td><td>1997-98</td><td>Topps</td><td>Topps</td><td>None</td><td>Base</td><td>7</td><td>0</td><td></td><td>No</td><td>No</td><td>No</td>
</tr>
</table>
";

/// A second season with a graded card.
pub const SEASON_2005: &str = r"<table>
<tr><th>Player</th><th>Season</th><th>Brand</th><th>Number</th><th>Grading Co.</th><th>Grade</th></tr>
<tr>
<td>Juwan Howard</td><td>2005-06</td><td>Topps</td><td>101</td><td>PSA</td><td>9</td>
</tr>
</table>
";

/// Parse a standalone table fragment into cards.
pub fn cards_from(html: &str) -> Vec<Card> {
  CollectionDocument::parse(html)
    .tables()
    .expect("Failed to read tables in test")
    .into_iter()
    .flat_map(|table| table.records)
    .map(|record| Card::new(record, "cards"))
    .collect()
}
