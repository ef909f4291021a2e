use std::path::PathBuf;

use cardsite_macros::Configurable;
use serde::{Deserialize, Serialize};

/// Settings for `cardsite export-sql`, which turns the generated index into
/// `INSERT INTO card` statements for an existing collection database.
#[derive(Debug, Clone, Serialize, Deserialize, Configurable)]
#[serde(default)]
pub struct ExportConfig {
  /// SQL dump with the `card_manufacturer`, `card_brand`, `card_theme` and
  /// `variant` inserts used to resolve ids. Without it every card gets the
  /// base variant and no theme.
  #[config(key = "lookup_file", allow_empty)]
  pub lookup_file: Option<PathBuf>,

  /// Where the import script is written.
  #[config(key = "output_file")]
  pub output_file: PathBuf,

  /// Database selected with `USE` at the top of the script.
  #[config(key = "database")]
  pub database: String,

  /// `player_id` of every exported card.
  #[config(key = "player_id")]
  pub player_id: u32,

  /// Cards of this season count as rookie cards regardless of their text.
  #[config(key = "rookie_season", allow_empty)]
  pub rookie_season: Option<String>,
}

impl Default for ExportConfig {
  fn default() -> Self {
    Self {
      lookup_file:   None,
      output_file:   PathBuf::from("collection_import.sql"),
      database:      "cardcollection".to_string(),
      player_id:     1,
      rookie_season: Some("1994-95".to_string()),
    }
  }
}
