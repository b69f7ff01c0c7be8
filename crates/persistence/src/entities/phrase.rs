//! Phrase entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use domain::models::Phrase;

/// Database row mapping for the phrases table.
#[derive(Debug, Clone, FromRow)]
pub struct PhraseEntity {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<PhraseEntity> for Phrase {
    fn from(entity: PhraseEntity) -> Self {
        Self {
            id: entity.id,
            title: entity.title,
            content: entity.content,
            created_at: entity.created_at,
        }
    }
}
