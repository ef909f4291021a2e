use std::sync::LazyLock;

use cardsite_catalog::{CardRecord, is_valid, record::fields};
use cardsite_config::export::ExportConfig;
use log::warn;
use regex::Regex;

use crate::lookup::{Lookups, normalize, static_regex};

static SERIAL_OF_RUN: LazyLock<Regex> =
  LazyLock::new(|| static_regex(r"^#?\s*(\d+)\s*/\s*(\d+)$"));
static RUN_ONLY: LazyLock<Regex> = LazyLock::new(|| static_regex(r"^(\d+)$"));

static ROOKIE_WORDS: LazyLock<Regex> = LazyLock::new(|| {
  static_regex(r"\b(?:rookie|rc|draft pick|draft day|collegiate|debut)")
});
static AUTOGRAPH_WORDS: LazyLock<Regex> = LazyLock::new(|| {
  static_regex(r"\b(?:autograph|signature|ink|signings|auto)")
});
static GAME_USED_WORDS: LazyLock<Regex> = LazyLock::new(|| {
  static_regex(
    r"\b(?:jersey|patch|material|game used|fabric|relic|duds|coverage|shirts|game worn|floor)",
  )
});

/// Numbering of a limited card. Zero means unknown or not numbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limited {
  pub print_run:     u32,
  pub serial_number: u32,
}

/// Parse `#7/100`, `7/100`, `100` (print run only), `--` or an empty string.
#[must_use]
pub fn parse_limited(text: &str) -> Option<Limited> {
  let text = text.trim();
  if text.is_empty() || text == "--" {
    return Some(Limited::default());
  }

  if let Some(caps) = SERIAL_OF_RUN.captures(text) {
    return Some(Limited {
      print_run:     caps.get(2)?.as_str().parse().ok()?,
      serial_number: caps.get(1)?.as_str().parse().ok()?,
    });
  }

  RUN_ONLY.captures(text).and_then(|caps| {
    Some(Limited {
      print_run:     caps.get(1)?.as_str().parse().ok()?,
      serial_number: 0,
    })
  })
}

/// Numbering of a record, from `Serial` (which may already read `7/100`)
/// and `Print Run`.
#[must_use]
pub fn limited_edition(record: &CardRecord) -> Option<Limited> {
  let serial = record.get(fields::SERIAL);
  let run = record.get(fields::PRINT_RUN);

  if !is_valid(serial) {
    parse_limited(if is_valid(run) { run } else { "" })
  } else if serial.contains('/') {
    parse_limited(serial)
  } else if is_valid(run) {
    parse_limited(&format!("{serial}/{run}"))
  } else {
    parse_limited(&format!("{serial}/0"))
  }
}

/// One row of the `card` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportCard {
  pub print_run:          u32,
  pub serial_number:      u32,
  pub season:             String,
  pub number:             String,
  pub rookie_card:        bool,
  pub game_used_material: bool,
  pub player_id:          u32,
  pub theme_id:           Option<u32>,
  pub autograph:          bool,
  pub variant_id:         u32,
  /// Resolved brand. Not a column, kept for reporting.
  pub brand_id:           Option<u32>,
}

impl ExportCard {
  /// Build the row for `record`.
  ///
  /// Flags come from the record's own columns or from keywords in its brand,
  /// theme and variant text. Unreadable numbering is logged and exported as
  /// not numbered.
  #[must_use]
  pub fn from_record(
    record: &CardRecord,
    lookups: &Lookups,
    config: &ExportConfig,
  ) -> Self {
    let season = record.get(fields::SEASON);
    let text = [fields::BRAND, fields::THEME, fields::VARIANT]
      .into_iter()
      .map(|key| record.get(key))
      .filter(|value| is_valid(value))
      .collect::<Vec<_>>()
      .join(" ");
    let words = normalize(&text);

    let limited = limited_edition(record).unwrap_or_else(|| {
      warn!(
        "Unreadable numbering '{}' / '{}' for {season} {text}, exporting as \
         not numbered",
        record.get(fields::SERIAL),
        record.get(fields::PRINT_RUN)
      );
      Limited::default()
    });

    let season_words = season.to_lowercase();
    let rookie_card = record.has(fields::ROOKIE)
      || ROOKIE_WORDS.is_match(&words)
      || config.rookie_season.as_deref() == Some(season)
      || season_words.contains("college")
      || season_words.contains("draft");

    let resolved = lookups.resolve(&text, record.get(fields::COMPANY));

    Self {
      print_run: limited.print_run,
      serial_number: limited.serial_number,
      season: season.to_string(),
      number: record.get(fields::NUMBER).to_string(),
      rookie_card,
      game_used_material: record.has(fields::GAME_USED)
        || GAME_USED_WORDS.is_match(&words),
      player_id: config.player_id,
      theme_id: resolved.theme_id,
      autograph: record.has(fields::AUTOGRAPH)
        || AUTOGRAPH_WORDS.is_match(&words),
      variant_id: resolved.variant_id,
      brand_id: resolved.brand_id,
    }
  }

  /// `INSERT INTO card (...) VALUES (...);`
  #[must_use]
  pub fn insert_statement(&self) -> String {
    format!(
      "INSERT INTO card (print_run, serial_number, season, number, \
       rookie_card, game_used_material, player_id, theme_id, autograph, \
       variant_id) VALUES ({}, {}, {}, {}, {}, {}, {}, {}, {}, {});",
      self.print_run,
      self.serial_number,
      sql_string(&self.season),
      sql_string(&self.number),
      u8::from(self.rookie_card),
      u8::from(self.game_used_material),
      self.player_id,
      self
        .theme_id
        .map_or_else(|| "NULL".to_string(), |id| id.to_string()),
      u8::from(self.autograph),
      self.variant_id
    )
  }
}

fn sql_string(text: &str) -> String {
  format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
}
