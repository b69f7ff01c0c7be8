//! Phrase endpoint handlers.
//!
//! All four operations share one path, `/api/phrases`, and are told apart by
//! method. Unknown ids on update and delete are silent no-ops.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use persistence::repositories::PhraseRepository;
use tracing::{debug, info};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::middleware::metrics::{
    record_batch_items_skipped, record_phrases_created, record_phrases_deleted,
};
use domain::models::phrase::partition_batch;
use domain::models::{
    CreatePhrasePayload, DeletePhraseQuery, MutationResponse, NewPhrase, Phrase, PhraseIdError,
    UpdatePhraseRequest,
};

/// List all phrases, newest first.
///
/// GET /api/phrases
pub async fn list_phrases(State(state): State<AppState>) -> Result<Json<Vec<Phrase>>, ApiError> {
    let repo = PhraseRepository::new(state.pool.clone());
    let phrases: Vec<Phrase> = repo
        .list_all()
        .await?
        .into_iter()
        .map(Phrase::from)
        .collect();

    debug!(count = phrases.len(), "Phrases listed");
    Ok(Json(phrases))
}

/// Create one phrase, or append a batch.
///
/// POST /api/phrases
///
/// A JSON object creates a single phrase and must carry both fields. A JSON
/// array is a batch: incomplete items are skipped, the rest are appended in
/// one transaction and `count` reports how many were written.
pub async fn create_phrases(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<serde_json::Value>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    let payload =
        CreatePhrasePayload::from_json(body).map_err(|e| ApiError::Validation(e.to_string()))?;
    let repo = PhraseRepository::new(state.pool.clone());

    match payload {
        CreatePhrasePayload::Single(phrase) => {
            create_single(&repo, phrase).await?;
            Ok((StatusCode::CREATED, Json(MutationResponse::ok())))
        }
        CreatePhrasePayload::Batch(items) => {
            let max = state.config.limits.max_batch_size;
            if items.len() > max {
                return Err(ApiError::Validation(format!(
                    "Batch of {} phrases exceeds the limit of {}",
                    items.len(),
                    max
                )));
            }
            let count = append_batch(&repo, items).await?;
            Ok((StatusCode::CREATED, Json(MutationResponse::with_count(count))))
        }
    }
}

async fn create_single(repo: &PhraseRepository, phrase: NewPhrase) -> Result<(), ApiError> {
    phrase.validate()?;

    let entity = repo.create(&phrase.title, &phrase.content).await?;
    record_phrases_created(1);

    info!(phrase_id = entity.id, title = %entity.title, "Phrase created");
    Ok(())
}

async fn append_batch(repo: &PhraseRepository, items: Vec<NewPhrase>) -> Result<usize, ApiError> {
    let submitted = items.len();
    let (accepted, skipped) = partition_batch(items);

    let inserted = if accepted.is_empty() {
        0
    } else {
        repo.create_batch(&accepted).await? as usize
    };
    record_phrases_created(inserted);
    record_batch_items_skipped(skipped);

    info!(submitted, inserted, skipped, "Phrase batch appended");
    Ok(inserted)
}

/// Replace a phrase's title and content.
///
/// PUT /api/phrases
pub async fn update_phrase(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<UpdatePhraseRequest>,
) -> Result<Json<MutationResponse>, ApiError> {
    let id = request
        .id
        .ok_or_else(|| ApiError::Validation("Missing id".to_string()))?;
    request.validate()?;

    let repo = PhraseRepository::new(state.pool.clone());
    let updated = repo.update(id, &request.title, &request.content).await?;

    if updated == 0 {
        debug!(phrase_id = id, "No phrase matched; nothing updated");
    } else {
        info!(phrase_id = id, "Phrase updated");
    }
    Ok(Json(MutationResponse::ok()))
}

/// Delete a phrase by id.
///
/// DELETE /api/phrases?id=<id>
pub async fn delete_phrase(
    State(state): State<AppState>,
    Query(query): Query<DeletePhraseQuery>,
) -> Result<Json<MutationResponse>, ApiError> {
    let id = query.phrase_id().map_err(|e| match e {
        PhraseIdError::Missing => ApiError::Validation("Missing id".to_string()),
        PhraseIdError::Invalid(raw) => {
            ApiError::Validation(format!("id must be an integer, got '{}'", raw))
        }
    })?;

    let repo = PhraseRepository::new(state.pool.clone());
    let deleted = repo.delete(id).await?;
    record_phrases_deleted(deleted);

    if deleted == 0 {
        debug!(phrase_id = id, "No phrase matched; nothing deleted");
    } else {
        info!(phrase_id = id, "Phrase deleted");
    }
    Ok(Json(MutationResponse::ok()))
}

/// Any other method on `/api/phrases`.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
