//! Domain models for Phrasebook.

pub mod phrase;

pub use phrase::{
    CreatePhrasePayload, DeletePhraseQuery, MutationResponse, NewPhrase, Phrase, PhraseIdError,
    UpdatePhraseRequest,
};
