//! Card catalog for cardsite.
//!
//! The collection HTML table is the only database: [`ingest`] turns its rows
//! into [`CardRecord`]s, and [`identity`] derives the stable names every
//! generated artifact is addressed by. Both the page renderer and the sitemap
//! builder go through [`derive_identity`], so their URLs cannot drift apart.

pub mod error;
pub mod identity;
pub mod ingest;
pub mod record;

pub use error::CatalogError;
pub use identity::{Card, DerivedIdentity, derive_identity, resolve_team, sanitize};
pub use ingest::{CardTable, CollectionDocument};
pub use record::{CardRecord, is_valid};
