use indexmap::IndexMap;

/// Column names of the collection table that carry meaning.
pub mod fields {
  pub const PLAYER: &str = "Player";
  pub const TEAM: &str = "Team";
  pub const SEASON: &str = "Season";
  pub const COMPANY: &str = "Company";
  pub const BRAND: &str = "Brand";
  pub const THEME: &str = "Theme";
  pub const VARIANT: &str = "Variant";
  pub const NUMBER: &str = "Number";
  pub const SERIAL: &str = "Serial";
  pub const PRINT_RUN: &str = "Print Run";
  pub const GRADE: &str = "Grade";
  pub const GRADING_CO: &str = "Grading Co.";
  pub const ROOKIE: &str = "Rookie";
  pub const GAME_USED: &str = "Game Used";
  pub const AUTOGRAPH: &str = "Autograph";
}

/// Whether a raw attribute value counts as present.
///
/// Blank values and the literal `0` are absent.
#[must_use]
pub fn is_valid(value: &str) -> bool {
  let value = value.trim();
  !value.is_empty() && value != "0"
}

/// One row of the collection table, keyed by header name.
///
/// Column order is preserved. A repeated header overwrites the earlier value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardRecord {
  fields: IndexMap<String, String>,
}

impl CardRecord {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Set an attribute, trimming the value.
  pub fn insert(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
    self
      .fields
      .insert(key.into(), value.as_ref().trim().to_string());
  }

  /// Trimmed attribute value, or `""` when the column is missing.
  #[must_use]
  pub fn get(&self, key: &str) -> &str {
    self.fields.get(key).map_or("", |value| value.trim())
  }

  /// Whether the attribute is valid and not a `No`/`None` answer.
  #[must_use]
  pub fn has(&self, key: &str) -> bool {
    let value = self.get(key);
    is_valid(value)
      && !value.eq_ignore_ascii_case("no")
      && !value.eq_ignore_ascii_case("none")
  }

  /// Whether the attribute is a `Yes` answer.
  #[must_use]
  pub fn is_yes(&self, key: &str) -> bool {
    self.get(key).eq_ignore_ascii_case("yes")
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.fields.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }

  /// Attributes in column order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self
      .fields
      .iter()
      .map(|(key, value)| (key.as_str(), value.as_str()))
  }
}

impl<K, V> FromIterator<(K, V)> for CardRecord
where
  K: Into<String>,
  V: AsRef<str>,
{
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut record = Self::new();
    for (key, value) in iter {
      record.insert(key, value);
    }
    record
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_is_valid() {
    assert!(is_valid("Fleer"));
    assert!(is_valid(" 1/1 "));
    assert!(!is_valid(""));
    assert!(!is_valid("   "));
    assert!(!is_valid("0"));
    assert!(!is_valid(" 0 "));
    assert!(is_valid("00"));
  }

  #[test]
  fn test_get_trims_and_defaults() {
    let record: CardRecord =
      [("Player", "  Juwan Howard "), ("Season", "1997-98")]
        .into_iter()
        .collect();

    assert_eq!(record.get("Player"), "Juwan Howard");
    assert_eq!(record.get("Brand"), "");
    assert_eq!(record.len(), 2);
  }

  #[test]
  fn test_has_rejects_negative_answers() {
    let record: CardRecord = [
      ("Autograph", "Yes"),
      ("Game Used", "No"),
      ("Theme", "None"),
      ("Serial", "0"),
      ("Rookie", "no"),
    ]
    .into_iter()
    .collect();

    assert!(record.has("Autograph"));
    assert!(record.is_yes("Autograph"));
    assert!(!record.has("Game Used"));
    assert!(!record.has("Theme"));
    assert!(!record.has("Serial"));
    assert!(!record.has("Rookie"));
    assert!(!record.has("Missing"));
  }

  #[test]
  fn test_duplicate_header_keeps_position_and_last_value() {
    let record: CardRecord = [("Player", "A"), ("Team", "B"), ("Player", "C")]
      .into_iter()
      .collect();

    let keys: Vec<_> = record.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["Player", "Team"]);
    assert_eq!(record.get("Player"), "C");
  }
}
