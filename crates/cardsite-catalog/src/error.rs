use std::io;

use thiserror::Error;

/// Error type for cardsite-catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
  #[error("No tables found in the collection document")]
  NoTables,

  #[error("Invalid selector: {0}")]
  Selector(String),

  #[error("Failed to serialize the collection document: {0}")]
  Serialize(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),
}
