//! Id lookups read from a dump of the collection database.
//!
//! Only the four reference tables matter: `card_manufacturer (id, name)`,
//! `card_brand (id, name, manufacturer_id)`, `card_theme (id, name, brand_id)`
//! and `variant (id, name)`. Names are matched as whole words against the
//! normalized card text, longest name first.

use std::{
  collections::HashSet,
  fs,
  iter::Peekable,
  path::Path,
  str::Chars,
  sync::LazyLock,
};

use color_eyre::eyre::{Context, Result, bail};
use log::{debug, error, warn};
use regex::Regex;

/// Variant id used when the dump has no `Base` variant.
pub const DEFAULT_VARIANT_ID: u32 = 1;

static INSERT_HEAD: LazyLock<Regex> = LazyLock::new(|| {
  static_regex(r"(?i)INSERT\s+INTO\s+`?(\w+)`?\s+VALUES\s*")
});

pub(crate) fn static_regex(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| {
    error!("Failed to compile regex {pattern}: {e}");
    #[allow(
      clippy::expect_used,
      reason = "This pattern is guaranteed to be valid"
    )]
    Regex::new(r"[^\s\S]")
      .expect("regex pattern [^\\s\\S] should always compile")
  })
}

/// Lowercase, drop apostrophes and collapse whitespace.
#[must_use]
pub fn normalize(text: &str) -> String {
  text
    .replace('\'', "")
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SqlValue {
  Null,
  Number(i64),
  Text(String),
}

impl SqlValue {
  fn id(&self) -> Option<u32> {
    match self {
      Self::Number(n) => u32::try_from(*n).ok(),
      _ => None,
    }
  }

  /// `Some(None)` for `NULL`.
  fn optional_id(&self) -> Option<Option<u32>> {
    match self {
      Self::Null => Some(None),
      other => other.id().map(Some),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brand {
  pub id:              u32,
  pub manufacturer_id: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
  pub id:       u32,
  pub brand_id: Option<u32>,
}

#[derive(Debug, Clone)]
struct Entry<T> {
  name:    String,
  pattern: Regex,
  value:   T,
}

impl<T> Entry<T> {
  fn new(raw_name: &str, value: T) -> Result<Option<Self>> {
    let name = normalize(raw_name);
    if name.is_empty() {
      return Ok(None);
    }
    let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&name)))
      .wrap_err_with(|| format!("Failed to build matcher for '{name}'"))?;
    Ok(Some(Self {
      name,
      pattern,
      value,
    }))
  }
}

/// Ids resolved for one card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
  pub manufacturer_id: Option<u32>,
  pub brand_id:        Option<u32>,
  pub theme_id:        Option<u32>,
  pub variant_id:      u32,
}

/// Reference tables of the collection database.
#[derive(Debug, Clone)]
pub struct Lookups {
  manufacturers: Vec<Entry<u32>>,
  brands:        Vec<Entry<Brand>>,
  themes:        Vec<Entry<Theme>>,
  variants:      Vec<Entry<u32>>,
  base_variant:  u32,
}

impl Default for Lookups {
  fn default() -> Self {
    Self {
      manufacturers: Vec::new(),
      brands:        Vec::new(),
      themes:        Vec::new(),
      variants:      Vec::new(),
      base_variant:  DEFAULT_VARIANT_ID,
    }
  }
}

impl Lookups {
  /// Read the lookups from a SQL dump.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or an `INSERT` statement of
  /// a lookup table does not parse.
  pub fn from_file(path: &Path) -> Result<Self> {
    let sql = fs::read_to_string(path).wrap_err_with(|| {
      format!("Failed to read lookup dump {}", path.display())
    })?;
    Self::parse(&sql).wrap_err_with(|| {
      format!("Failed to parse lookup dump {}", path.display())
    })
  }

  /// Collect every `INSERT INTO ... VALUES ...;` of the lookup tables in
  /// `sql`. Statements for other tables are skipped. A name listed twice
  /// keeps its last id.
  ///
  /// # Errors
  ///
  /// Returns an error if a `VALUES` list is malformed.
  pub fn parse(sql: &str) -> Result<Self> {
    let mut lookups = Self::default();

    for head in INSERT_HEAD.captures_iter(sql) {
      let (Some(whole), Some(table)) = (head.get(0), head.get(1)) else {
        continue;
      };
      let table = table.as_str();
      if !matches!(
        table,
        "card_manufacturer" | "card_brand" | "card_theme" | "variant"
      ) {
        debug!("Skipping INSERT INTO {table}");
        continue;
      }

      let rows = parse_tuples(&mut sql[whole.end()..].chars().peekable())
        .wrap_err_with(|| format!("Malformed INSERT INTO {table}"))?;
      lookups.add(table, &rows)?;
    }

    longest_first(&mut lookups.manufacturers);
    longest_first(&mut lookups.brands);
    longest_first(&mut lookups.themes);
    longest_first(&mut lookups.variants);
    lookups.base_variant = lookups
      .variants
      .iter()
      .find(|v| v.name == "base")
      .map_or(DEFAULT_VARIANT_ID, |v| v.value);

    debug!(
      "Loaded {} manufacturers, {} brands, {} themes, {} variants",
      lookups.manufacturers.len(),
      lookups.brands.len(),
      lookups.themes.len(),
      lookups.variants.len()
    );
    Ok(lookups)
  }

  fn add(&mut self, table: &str, rows: &[Vec<SqlValue>]) -> Result<()> {
    for row in rows {
      let added = match (table, row.as_slice()) {
        ("card_manufacturer", [id, SqlValue::Text(name), ..]) => {
          id.id().map(|id| Entry::new(name, id)).transpose()?.flatten().map(
            |entry| self.manufacturers.push(entry),
          )
        },
        ("card_brand", [id, SqlValue::Text(name), manufacturer, ..]) => {
          match (id.id(), manufacturer.optional_id()) {
            (Some(id), Some(manufacturer_id)) => {
              Entry::new(name, Brand { id, manufacturer_id })?
                .map(|entry| self.brands.push(entry))
            },
            _ => None,
          }
        },
        ("card_theme", [id, SqlValue::Text(name), brand, ..]) => {
          match (id.id(), brand.optional_id()) {
            (Some(id), Some(brand_id)) => {
              Entry::new(name, Theme { id, brand_id })?
                .map(|entry| self.themes.push(entry))
            },
            _ => None,
          }
        },
        ("variant", [id, SqlValue::Text(name), ..]) => {
          id.id().map(|id| Entry::new(name, id)).transpose()?.flatten().map(
            |entry| self.variants.push(entry),
          )
        },
        _ => None,
      };

      if added.is_none() {
        warn!("Ignoring unusable {table} row {row:?}");
      }
    }
    Ok(())
  }

  /// Variant id of plain base cards.
  #[must_use]
  pub const fn base_variant(&self) -> u32 {
    self.base_variant
  }

  /// Whether no lookup table was found.
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.manufacturers.is_empty()
      && self.brands.is_empty()
      && self.themes.is_empty()
      && self.variants.is_empty()
  }

  /// Resolve the ids of a card described by `text` (brand, theme and variant
  /// words) and `company`.
  ///
  /// The longest brand found in the text wins and is cut out; the longest
  /// non-base variant is searched in what is left and cut out too. Themes
  /// are only searched among the themes of the resolved brand. The
  /// manufacturer comes from the brand, or else from `company` or the text.
  #[must_use]
  pub fn resolve(&self, text: &str, company: &str) -> Resolved {
    let text = normalize(text);
    let mut rest = text.clone();

    let brand = self.brands.iter().find(|b| b.pattern.is_match(&text));
    if let Some(brand) = brand {
      rest = remove_first(&brand.pattern, &rest);
    }

    let variant = self
      .variants
      .iter()
      .filter(|v| v.name != "base")
      .find(|v| v.pattern.is_match(&rest));
    if let Some(variant) = variant {
      rest = remove_first(&variant.pattern, &rest);
    }

    let theme = brand.filter(|_| !rest.is_empty()).and_then(|brand| {
      self.themes.iter().find(|t| {
        t.value.brand_id == Some(brand.value.id) && t.pattern.is_match(&rest)
      })
    });

    let company = normalize(company);
    let manufacturer_id = brand
      .and_then(|b| b.value.manufacturer_id)
      .or_else(|| {
        self
          .manufacturers
          .iter()
          .find(|m| m.pattern.is_match(&company) || m.pattern.is_match(&text))
          .map(|m| m.value)
      });

    Resolved {
      manufacturer_id,
      brand_id: brand.map(|b| b.value.id),
      theme_id: theme.map(|t| t.value.id),
      variant_id: variant.map_or(self.base_variant, |v| v.value),
    }
  }
}

fn longest_first<T>(entries: &mut Vec<Entry<T>>) {
  let mut seen = HashSet::new();
  entries.reverse();
  entries.retain(|entry| seen.insert(entry.name.clone()));
  entries.sort_by(|a, b| {
    b.name.len().cmp(&a.name.len()).then_with(|| a.name.cmp(&b.name))
  });
}

fn remove_first(pattern: &Regex, text: &str) -> String {
  normalize(&pattern.replacen(text, 1, ""))
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
  while chars.next_if(|c| c.is_whitespace()).is_some() {}
}

/// Parse `(..),(..)` up to the `;` that ends the statement.
fn parse_tuples(chars: &mut Peekable<Chars<'_>>) -> Result<Vec<Vec<SqlValue>>> {
  let mut rows = Vec::new();
  loop {
    skip_whitespace(chars);
    match chars.next() {
      Some('(') => rows.push(parse_row(chars)?),
      Some(',') => {},
      Some(';') | None => return Ok(rows),
      Some(c) => bail!("Unexpected '{c}' in VALUES list"),
    }
  }
}

fn parse_row(chars: &mut Peekable<Chars<'_>>) -> Result<Vec<SqlValue>> {
  let mut row = Vec::new();
  loop {
    skip_whitespace(chars);
    let value = if chars.next_if_eq(&'\'').is_some() {
      SqlValue::Text(parse_quoted(chars)?)
    } else {
      let mut raw = String::new();
      while let Some(c) = chars.next_if(|c| *c != ',' && *c != ')') {
        raw.push(c);
      }
      parse_bare(raw.trim())?
    };
    row.push(value);

    skip_whitespace(chars);
    match chars.next() {
      Some(',') => {},
      Some(')') => return Ok(row),
      Some(c) => bail!("Expected ',' or ')' in row, found '{c}'"),
      None => bail!("Unterminated row"),
    }
  }
}

fn parse_quoted(chars: &mut Peekable<Chars<'_>>) -> Result<String> {
  let mut out = String::new();
  while let Some(c) = chars.next() {
    match c {
      '\\' => {
        match chars.next() {
          Some('t') => out.push('\t'),
          Some('n') => out.push('\n'),
          Some('r') => out.push('\r'),
          Some(other) => out.push(other),
          None => break,
        }
      },
      '\'' if chars.next_if_eq(&'\'').is_some() => out.push('\''),
      '\'' => return Ok(out),
      c => out.push(c),
    }
  }
  bail!("Unterminated string literal")
}

fn parse_bare(raw: &str) -> Result<SqlValue> {
  if raw.eq_ignore_ascii_case("null") {
    return Ok(SqlValue::Null);
  }
  raw
    .parse()
    .map(SqlValue::Number)
    .wrap_err_with(|| format!("Unsupported SQL value '{raw}'"))
}
