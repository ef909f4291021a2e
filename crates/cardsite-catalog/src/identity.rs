//! Stable names for generated card artifacts.
//!
//! Everything that addresses a card page or image goes through
//! [`derive_identity`]. The sanitizer and token order below decide the public
//! URLs of the site, so changing either renames every page.

use crate::record::{CardRecord, fields, is_valid};

/// Season folder used when a card has no season.
pub const UNKNOWN_SEASON: &str = "Unknown_Season";

/// Team used when neither team nor season is known.
pub const UNKNOWN_TEAM: &str = "Unknown Team";

/// Team used when the season matches no entry of [`TEAM_BY_SEASON`].
pub const FALLBACK_TEAM: &str = "NBA";

/// Season year prefixes and the team the player was with at the time.
///
/// Checked in order against the start of the season string.
pub const TEAM_BY_SEASON: &[(&[&str], &str)] = &[
  (&["1994", "1995", "1996"], "Washington Bullets"),
  (&["1997", "1998", "1999", "2000"], "Washington Wizards"),
  (&["2001"], "Dallas Mavericks"),
  (&["2002"], "Denver Nuggets"),
  (&["2003"], "Orlando Magic"),
  (&["2004", "2005", "2006"], "Houston Rockets"),
  (&["2007"], "Dallas Mavericks"),
  (&["2008"], "Charlotte Bobcats"),
  (&["2009"], "Portland Trail Blazers"),
  (&["2010", "2011", "2012"], "Miami Heat"),
];

/// Infer the team from a season string such as `1997-98`.
#[must_use]
pub fn resolve_team(season: &str) -> &'static str {
  let season = season.trim();
  if season.is_empty() {
    return UNKNOWN_TEAM;
  }

  TEAM_BY_SEASON
    .iter()
    .find(|(prefixes, _)| prefixes.iter().any(|p| season.starts_with(p)))
    .map_or(FALLBACK_TEAM, |&(_, team)| team)
}

/// Turn arbitrary text into a file name segment.
///
/// Slashes become hyphens, anything outside ASCII letters, digits, whitespace
/// and `-` is dropped, every ASCII whitespace character (vertical tab
/// included) becomes `-` and hyphen runs collapse to one. The result only
/// contains `[A-Za-z0-9-]`, so sanitizing twice is a no-op.
#[must_use]
pub fn sanitize(raw: &str) -> String {
  let kept: String = raw
    .chars()
    .map(|c| if c == '/' || c == '\\' { '-' } else { c })
    .filter(|c| c.is_ascii_alphanumeric() || is_blank(*c) || *c == '-')
    .collect();

  let mut out = String::with_capacity(kept.len());
  for c in kept.trim().chars() {
    let c = if is_blank(c) { '-' } else { c };
    if c == '-' && out.ends_with('-') {
      continue;
    }
    out.push(c);
  }
  out
}

// `char::is_ascii_whitespace` leaves out U+000B
const fn is_blank(c: char) -> bool {
  c.is_ascii_whitespace() || c == '\x0B'
}

/// Names derived from a card record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedIdentity {
  /// Explicit team, or the one inferred from the season.
  pub team:          String,
  /// Sanitized file name without extension. Empty when no token is valid.
  pub filename_stem: String,
  /// Sanitized season, or [`UNKNOWN_SEASON`].
  pub season_folder: String,
  /// `{cards_folder}/{season_folder}/{filename_stem}.html`
  pub full_path:     String,
}

impl DerivedIdentity {
  /// Page file name, `{filename_stem}.html`.
  #[must_use]
  pub fn filename(&self) -> String {
    format!("{}.html", self.filename_stem)
  }

  /// Image path below an images root, e.g. `images/1997-98/stem-front.jpg`.
  #[must_use]
  pub fn image_path(&self, images_root: &str, side: &str) -> String {
    let root = images_root.trim_end_matches('/');
    if root.is_empty() {
      format!("{}/{}-{side}.jpg", self.season_folder, self.filename_stem)
    } else {
      format!(
        "{root}/{}/{}-{side}.jpg",
        self.season_folder, self.filename_stem
      )
    }
  }
}

/// Derive the identity of a card.
///
/// Tokens are Player, Team, Season, Company, Brand, Theme, Variant and
/// Number, followed by `sn{Serial}` and the Grade when present. Invalid
/// tokens are skipped. The grading company is not part of the name.
#[must_use]
pub fn derive_identity(
  record: &CardRecord,
  cards_folder: &str,
) -> DerivedIdentity {
  let team = if is_valid(record.get(fields::TEAM)) {
    record.get(fields::TEAM).to_string()
  } else {
    resolve_team(record.get(fields::SEASON)).to_string()
  };

  let mut tokens: Vec<&str> = Vec::with_capacity(10);
  for key in [
    fields::PLAYER,
    fields::TEAM,
    fields::SEASON,
    fields::COMPANY,
    fields::BRAND,
    fields::THEME,
    fields::VARIANT,
    fields::NUMBER,
  ] {
    let value = if key == fields::TEAM {
      team.as_str()
    } else {
      record.get(key)
    };
    if is_valid(value) {
      tokens.push(value);
    }
  }

  let serial = record.get(fields::SERIAL);
  let serial_token = is_valid(serial).then(|| format!("sn{serial}"));
  if let Some(ref token) = serial_token {
    tokens.push(token);
  }

  let grade = record.get(fields::GRADE);
  if is_valid(grade) {
    tokens.push(grade);
  }

  let filename_stem = sanitize(&tokens.join("-"));
  if filename_stem.is_empty() {
    log::warn!(
      "Card record has no usable name tokens, its page will be named '.html'"
    );
  }

  let season = record.get(fields::SEASON);
  let season_folder = if is_valid(season) {
    sanitize(season)
  } else {
    UNKNOWN_SEASON.to_string()
  };

  let cards_folder = cards_folder.trim_matches('/');
  let full_path = if cards_folder.is_empty() {
    format!("{season_folder}/{filename_stem}.html")
  } else {
    format!("{cards_folder}/{season_folder}/{filename_stem}.html")
  };

  DerivedIdentity {
    team,
    filename_stem,
    season_folder,
    full_path,
  }
}

/// A card record together with its derived identity.
///
/// The record's `Team` is filled in with the inferred team, so templates and
/// copy see the same team the file name was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
  pub record:   CardRecord,
  pub identity: DerivedIdentity,
}

impl Card {
  #[must_use]
  pub fn new(mut record: CardRecord, cards_folder: &str) -> Self {
    let identity = derive_identity(&record, cards_folder);
    if !is_valid(record.get(fields::TEAM)) {
      record.insert(fields::TEAM, &identity.team);
    }
    Self { record, identity }
  }

  #[must_use]
  pub fn get(&self, key: &str) -> &str {
    self.record.get(key)
  }

  #[must_use]
  pub fn has(&self, key: &str) -> bool {
    self.record.has(key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(pairs: &[(&str, &str)]) -> CardRecord {
    pairs.iter().copied().collect()
  }

  #[test]
  fn test_sanitize_examples() {
    assert_eq!(sanitize("1997-98"), "1997-98");
    assert_eq!(sanitize("Juwan Howard"), "Juwan-Howard");
    assert_eq!(sanitize("1/1"), "1-1");
    assert_eq!(sanitize("a\\b"), "a-b");
    assert_eq!(sanitize("Gold  Refractor!"), "Gold-Refractor");
    assert_eq!(sanitize("  Précis -- Test  "), "Prcis-Test");
    assert_eq!(sanitize("PMG (Green)"), "PMG-Green");
    assert_eq!(sanitize(""), "");
  }

  #[test]
  fn test_sanitize_turns_every_blank_into_a_hyphen() {
    assert_eq!(sanitize("Gold\tRefractor"), "Gold-Refractor");
    assert_eq!(sanitize("Gold\x0BRefractor"), "Gold-Refractor");
    assert_eq!(sanitize("Gold\r\n\x0C Refractor"), "Gold-Refractor");
    assert_eq!(sanitize("\x0B1997-98\t"), "1997-98");
  }

  #[test]
  fn test_sanitize_is_idempotent() {
    let inputs = [
      "Juwan Howard-Washington Wizards-1997-98-Fleer-33",
      "  //weird\\\\ input ## with ** stuff -- ",
      "Übergröße 1/25 \t tab",
      "---",
      "sn1/1-PSA 10",
      "",
    ];
    for input in inputs {
      let once = sanitize(input);
      assert_eq!(sanitize(&once), once, "input: {input:?}");
      assert!(
        once
          .chars()
          .all(|c| c.is_ascii_alphanumeric() || c == '-')
      );
      assert!(!once.contains("--"));
    }
  }

  #[test]
  fn test_resolve_team_table() {
    assert_eq!(resolve_team("1994-95"), "Washington Bullets");
    assert_eq!(resolve_team("1996-97"), "Washington Bullets");
    assert_eq!(resolve_team("1998-99"), "Washington Wizards");
    assert_eq!(resolve_team("2000-01"), "Washington Wizards");
    assert_eq!(resolve_team("2001-02"), "Dallas Mavericks");
    assert_eq!(resolve_team("2002-03"), "Denver Nuggets");
    assert_eq!(resolve_team("2003-04"), "Orlando Magic");
    assert_eq!(resolve_team("2005-06"), "Houston Rockets");
    assert_eq!(resolve_team("2007-08"), "Dallas Mavericks");
    assert_eq!(resolve_team("2008-09"), "Charlotte Bobcats");
    assert_eq!(resolve_team("2009-10"), "Portland Trail Blazers");
    assert_eq!(resolve_team("2012-13"), "Miami Heat");
  }

  #[test]
  fn test_resolve_team_fallbacks_differ() {
    assert_eq!(resolve_team(""), UNKNOWN_TEAM);
    assert_eq!(resolve_team("   "), UNKNOWN_TEAM);
    assert_eq!(resolve_team("2019-20"), FALLBACK_TEAM);
    assert_eq!(resolve_team("Rookie year"), FALLBACK_TEAM);
  }

  #[test]
  fn test_derive_identity_infers_team() {
    let identity = derive_identity(
      &record(&[
        ("Player", "Juwan Howard"),
        ("Season", "1997-98"),
        ("Brand", "Fleer"),
        ("Number", "33"),
      ]),
      "cards",
    );

    assert_eq!(identity.team, "Washington Wizards");
    assert_eq!(
      identity.filename_stem,
      "Juwan-Howard-Washington-Wizards-1997-98-Fleer-33"
    );
    assert_eq!(identity.season_folder, "1997-98");
    assert_eq!(
      identity.full_path,
      "cards/1997-98/Juwan-Howard-Washington-Wizards-1997-98-Fleer-33.html"
    );
    assert_eq!(
      identity.image_path("../../images", "back"),
      format!("../../images/1997-98/{}-back.jpg", identity.filename_stem)
    );
  }

  #[test]
  fn test_explicit_team_wins() {
    let identity = derive_identity(
      &record(&[
        ("Player", "Juwan Howard"),
        ("Team", "Michigan"),
        ("Season", "1994-95"),
      ]),
      "cards",
    );
    assert_eq!(identity.team, "Michigan");
    assert_eq!(identity.filename_stem, "Juwan-Howard-Michigan-1994-95");
  }

  #[test]
  fn test_serial_token() {
    let base = [("Player", "Juwan Howard"), ("Season", "1997-98")];

    let mut pairs = base.to_vec();
    pairs.push(("Serial", "0"));
    let identity = derive_identity(&record(&pairs), "cards");
    assert!(!identity.filename_stem.contains("-sn"));

    let identity = derive_identity(&record(&base), "cards");
    assert!(!identity.filename_stem.contains("-sn"));

    let mut pairs = base.to_vec();
    pairs.push(("Serial", "12/50"));
    pairs.push(("Grade", "9.5"));
    pairs.push(("Grading Co.", "BGS"));
    let identity = derive_identity(&record(&pairs), "cards");
    assert_eq!(
      identity.filename_stem,
      "Juwan-Howard-Washington-Wizards-1997-98-sn12-50-95"
    );
  }

  #[test]
  fn test_missing_season_uses_sentinels() {
    let identity = derive_identity(&record(&[("Player", "Juwan Howard")]), "cards");
    assert_eq!(identity.team, UNKNOWN_TEAM);
    assert_eq!(identity.season_folder, UNKNOWN_SEASON);
    assert_eq!(identity.filename_stem, "Juwan-Howard-Unknown-Team");
  }

  #[test]
  fn test_empty_stem_is_kept() {
    let identity =
      derive_identity(&record(&[("Season", "0"), ("Team", "!!!")]), "cards");
    assert_eq!(identity.filename_stem, "");
    assert_eq!(identity.filename(), ".html");
    assert_eq!(identity.full_path, "cards/Unknown_Season/.html");
  }

  #[test]
  fn test_card_fills_in_team() {
    let card = Card::new(
      record(&[("Player", "Juwan Howard"), ("Season", "2004-05")]),
      "cards",
    );
    assert_eq!(card.get("Team"), "Houston Rockets");
    assert_eq!(card.identity.team, "Houston Rockets");

    // deriving again from the completed record gives the same identity
    assert_eq!(derive_identity(&card.record, "cards"), card.identity);
  }
}
