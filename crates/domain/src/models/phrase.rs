//! Phrase domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// A titled text snippet stored for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A phrase that has not been persisted yet.
///
/// Both fields default to empty, and `null` reads as empty, so that a missing
/// field reaches validation instead of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewPhrase {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub content: String,
}

impl NewPhrase {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Returns true when both required fields are present.
    pub fn is_complete(&self) -> bool {
        shared::validation::has_title_and_content(&self.title, &self.content)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of `POST /api/phrases`: one phrase or an ordered batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePhrasePayload {
    Single(NewPhrase),
    Batch(Vec<NewPhrase>),
}

impl CreatePhrasePayload {
    /// Interprets a JSON body. Arrays are batches, anything else must be a
    /// single phrase object.
    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        match value {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(serde_json::from_value)
                .collect::<Result<Vec<NewPhrase>, _>>()
                .map(Self::Batch),
            serde_json::Value::Object(_) => serde_json::from_value(value).map(Self::Single),
            other => Err(serde::de::Error::custom(format!(
                "expected a phrase object or an array of phrases, found {}",
                json_kind(&other)
            ))),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Splits a batch into the items that will be written and the number skipped.
///
/// Order of the accepted items is preserved.
pub fn partition_batch(items: Vec<NewPhrase>) -> (Vec<NewPhrase>, usize) {
    let total = items.len();
    let accepted: Vec<NewPhrase> = items.into_iter().filter(NewPhrase::is_complete).collect();
    let skipped = total - accepted.len();
    (accepted, skipped)
}

/// Request payload for `PUT /api/phrases`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePhraseRequest {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub content: String,
}

/// Query parameters for `DELETE /api/phrases`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeletePhraseQuery {
    pub id: Option<String>,
}

/// Why a delete query was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhraseIdError {
    Missing,
    Invalid(String),
}

impl DeletePhraseQuery {
    /// Parses the `id` parameter. Empty counts as missing.
    pub fn phrase_id(&self) -> Result<i64, PhraseIdError> {
        let raw = match self.id.as_deref().map(str::trim) {
            None | Some("") => return Err(PhraseIdError::Missing),
            Some(raw) => raw,
        };
        raw.parse::<i64>()
            .map_err(|_| PhraseIdError::Invalid(raw.to_string()))
    }
}

/// Acknowledgment returned by every mutating endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl MutationResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            count: None,
        }
    }

    pub fn with_count(count: usize) -> Self {
        Self {
            success: true,
            count: Some(count),
        }
    }
}
