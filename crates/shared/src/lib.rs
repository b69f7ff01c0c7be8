//! Shared utilities for the Phrasebook workspace.
//!
//! This crate provides functionality used across the other crates:
//! - Common validation logic

pub mod validation;
