use kuchikikiki::{Attribute, ExpandedName, NodeRef, parse_html};
use markup5ever::{QualName, local_name, ns};
use tendril::TendrilSink;

use crate::{error::CatalogError, record::CardRecord};

/// A parsed collection page.
///
/// Keeps the DOM around so the player cells can be turned into links to the
/// generated detail pages and the document written back.
pub struct CollectionDocument {
  document: NodeRef,
}

/// One `<table>` of the collection page.
pub struct CardTable {
  /// Header cell texts, in column order.
  pub headers: Vec<String>,
  /// One record per data row, in table order.
  pub records: Vec<CardRecord>,
  rows:        Vec<NodeRef>,
}

impl CollectionDocument {
  /// Parse an HTML document.
  #[must_use]
  pub fn parse(html: &str) -> Self {
    Self {
      document: parse_html().one(html),
    }
  }

  /// Every table that has a header row.
  ///
  /// The first row's `<th>` cells name the columns. Each later row with at
  /// least one `<td>` becomes a record; cells beyond the last header are
  /// dropped. Tables without header cells are skipped.
  ///
  /// # Errors
  ///
  /// Returns [`CatalogError::NoTables`] if the document has no `<table>` at
  /// all.
  pub fn tables(&self) -> Result<Vec<CardTable>, CatalogError> {
    let tables: Vec<NodeRef> = select(&self.document, "table")?;
    if tables.is_empty() {
      return Err(CatalogError::NoTables);
    }

    log::debug!("Found {} tables", tables.len());

    let mut parsed = Vec::with_capacity(tables.len());
    for (index, table) in tables.iter().enumerate() {
      match CardTable::from_node(table)? {
        Some(card_table) => parsed.push(card_table),
        None => log::debug!("Skipping table #{} without header", index + 1),
      }
    }

    Ok(parsed)
  }

  /// Serialize the (possibly rewritten) document.
  ///
  /// # Errors
  ///
  /// Returns an error if serialization fails or yields invalid UTF-8.
  pub fn to_html(&self) -> Result<String, CatalogError> {
    let mut buf = Vec::new();
    self.document.serialize(&mut buf)?;
    String::from_utf8(buf).map_err(|e| CatalogError::Serialize(e.to_string()))
  }
}

impl CardTable {
  fn from_node(table: &NodeRef) -> Result<Option<Self>, CatalogError> {
    let rows = select(table, "tr")?;
    let Some((header_row, data_rows)) = rows.split_first() else {
      return Ok(None);
    };

    let headers: Vec<String> = select(header_row, "th")?
      .iter()
      .map(cell_text)
      .collect();
    if headers.is_empty() {
      return Ok(None);
    }

    let mut records = Vec::new();
    let mut kept_rows = Vec::new();
    for row in data_rows {
      let cells = select(row, "td")?;
      if cells.is_empty() {
        continue;
      }

      let record: CardRecord = headers
        .iter()
        .zip(cells.iter())
        .map(|(header, cell)| (header.clone(), cell_text(cell)))
        .collect();

      records.push(record);
      kept_rows.push(row.clone());
    }

    Ok(Some(Self {
      headers,
      records,
      rows: kept_rows,
    }))
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.records.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Replace the first cell of a data row with a link carrying the same text.
  ///
  /// # Errors
  ///
  /// Returns an error if the row cannot be queried.
  pub fn link_first_cell(
    &self,
    row: usize,
    href: &str,
    title: &str,
  ) -> Result<(), CatalogError> {
    let Some(row) = self.rows.get(row) else {
      return Ok(());
    };
    let Some(cell) = select(row, "td")?.into_iter().next() else {
      return Ok(());
    };

    let text = cell_text(&cell);
    for child in cell.children().collect::<Vec<_>>() {
      child.detach();
    }

    let link = NodeRef::new_element(
      QualName::new(None, ns!(html), local_name!("a")),
      vec![attribute("href", href), attribute("title", title)],
    );
    link.append(NodeRef::new_text(text));
    cell.append(link);

    Ok(())
  }
}

fn select(node: &NodeRef, selector: &str) -> Result<Vec<NodeRef>, CatalogError> {
  let matches = node
    .select(selector)
    .map_err(|()| CatalogError::Selector(selector.to_string()))?;
  Ok(matches.map(|element| element.as_node().clone()).collect())
}

fn attribute(name: &str, value: &str) -> (ExpandedName, Attribute) {
  (ExpandedName::new("", name), Attribute {
    prefix: None,
    value:  value.to_string(),
  })
}

/// Cell text with whitespace runs collapsed and ends trimmed.
fn cell_text(node: &NodeRef) -> String {
  node
    .text_contents()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join(" ")
}
