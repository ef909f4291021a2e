use std::fs;

use cardsite_catalog::{Card, CollectionDocument, record::fields};
use cardsite_config::Config;
use cardsite_html::{CardPageRenderer, Templates};
use color_eyre::eyre::{Context, Result};
use log::{debug, info};

/// Render a detail page for every card of the generated index.
///
/// Neighbours and related cards are taken from the card's own table. After
/// rendering, the first cell of every row is turned into a link to its page
/// and the index is written back. Returns the number of pages written.
///
/// # Errors
///
/// Returns an error if the index cannot be read or parsed, or if a page
/// cannot be rendered or written.
pub fn write_pages(config: &Config, templates: &Templates) -> Result<usize> {
  let index_path = config.index_path();
  let html = fs::read_to_string(&index_path).wrap_err_with(|| {
    format!("Failed to read index {}", index_path.display())
  })?;

  let document = CollectionDocument::parse(&html);
  let tables = document.tables()?;
  let renderer = CardPageRenderer::new(templates, config);

  let mut written = 0;
  for table in &tables {
    let cards: Vec<Card> = table
      .records
      .iter()
      .map(|record| Card::new(record.clone(), &config.cards_folder))
      .collect();

    for (row, card) in cards.iter().enumerate() {
      let prev = row.checked_sub(1).and_then(|i| cards.get(i));
      let next = cards.get(row + 1);

      let page = renderer
        .render(card, prev, next, &cards)
        .wrap_err_with(|| {
          format!("Failed to render {}", card.identity.full_path)
        })?;

      let path = config.output_dir.join(&card.identity.full_path);
      if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory {}", parent.display())
        })?;
      }
      fs::write(&path, page)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
      info!("Generated: {}", path.display());
      written += 1;

      table.link_first_cell(
        row,
        &card.identity.full_path,
        &link_title(card),
      )?;
    }
    debug!("Linked {} rows", cards.len());
  }

  fs::write(&index_path, document.to_html()?).wrap_err_with(|| {
    format!("Failed to write index {}", index_path.display())
  })?;

  info!("Generated {written} detail pages");
  Ok(written)
}

fn link_title(card: &Card) -> String {
  format!(
    "View details for {} {} #{}",
    card.get(fields::SEASON),
    card.get(fields::BRAND),
    card.get(fields::NUMBER)
  )
}
