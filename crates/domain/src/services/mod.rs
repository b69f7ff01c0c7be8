//! Domain services for Phrasebook.
//!
//! Services contain logic that operates on domain models without touching
//! storage or the network.

pub mod board;

pub use board::{
    matches_filter, newest_first, render, sort_newest_first, PhraseBoard, PhraseCard, View,
};
