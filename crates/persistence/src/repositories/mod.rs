//! Repository implementations for database operations.

pub mod phrase;

pub use phrase::PhraseRepository;
