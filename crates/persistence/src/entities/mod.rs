//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod phrase;

pub use phrase::PhraseEntity;
