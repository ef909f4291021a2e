use std::fmt::Write as _;

use cardsite_catalog::CardRecord;
use cardsite_config::{Config, export::ExportConfig};
use jiff::civil::DateTime;
use log::warn;

use crate::{card::ExportCard, lookup::Lookups};

/// A rendered import script.
#[derive(Debug, Clone)]
pub struct ImportScript {
  pub sql:               String,
  pub cards:             Vec<ExportCard>,
  /// Cards whose brand matched nothing in the lookups.
  pub unresolved_brands: usize,
}

/// Turns collection records into an import script for the `card` table.
pub struct SqlExporter<'a> {
  lookups: &'a Lookups,
  export:  ExportConfig,
  subject: String,
}

impl<'a> SqlExporter<'a> {
  #[must_use]
  pub fn new(lookups: &'a Lookups, config: &Config) -> Self {
    Self {
      lookups,
      export: config.export(),
      subject: config.site().subject,
    }
  }

  /// Render one `INSERT` per record, in input order.
  ///
  /// The script selects the configured database and expects the lookup
  /// tables to be filled already. `generated_at` goes into the header.
  #[must_use]
  pub fn export<'r>(
    &self,
    records: impl IntoIterator<Item = &'r CardRecord>,
    generated_at: DateTime,
  ) -> ImportScript {
    let cards: Vec<ExportCard> = records
      .into_iter()
      .map(|record| ExportCard::from_record(record, self.lookups, &self.export))
      .collect();

    let mut unresolved_brands = 0;
    if !self.lookups.is_empty() {
      for card in cards.iter().filter(|card| card.brand_id.is_none()) {
        warn!("No brand resolved for {} #{}", card.season, card.number);
        unresolved_brands += 1;
      }
    }

    let mut sql = format!(
      "USE {};\n\n-- SQL import script for the {} trading card collection\n\
       -- Generated on {}\n\n-- This script assumes that card_manufacturer, \
       card_brand, card_theme,\n-- and variant tables are already populated \
       correctly.\n",
      self.export.database,
      self.subject,
      generated_at.strftime("%Y-%m-%d %H:%M:%S")
    );

    if !cards.is_empty() {
      sql.push_str("\n-- Inserting card data --\n");
      for card in &cards {
        let _ = writeln!(sql, "{}", card.insert_statement());
      }
    }

    let _ = writeln!(
      sql,
      "\n-- End of {} trading card collection import script --",
      self.subject
    );

    ImportScript {
      sql,
      cards,
      unresolved_brands,
    }
  }
}
