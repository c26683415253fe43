//! Slide identity, keep/remove criteria, and the selection/deletion
//! passes used to fork a variant deck from a master presentation.

pub mod criterion;
pub mod delete;
pub mod error;
pub mod select;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use criterion::{Criterion, SlideMapping};
pub use delete::delete_marked;
pub use error::{Error, Result};
pub use select::select_removals;
pub use types::{DeleteRecord, SlideDocument, SlideIdentity, SlidePosition};
