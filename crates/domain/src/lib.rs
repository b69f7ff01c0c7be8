//! Domain layer for Phrasebook.
//!
//! This crate contains:
//! - Domain models (Phrase and its request/response shapes)
//! - The client-side board with filtering and ordering rules

pub mod models;
pub mod services;
