//! SQL import scripts for a cardsite collection.
//!
//! The generated index is read back into records, every record becomes one
//! `INSERT INTO card` row, and the reference ids (theme, variant) are looked
//! up in a dump of the target database.

pub mod card;
pub mod lookup;
pub mod script;

pub use card::{ExportCard, Limited, limited_edition, parse_limited};
pub use lookup::{Lookups, Resolved};
pub use script::{ImportScript, SqlExporter};
