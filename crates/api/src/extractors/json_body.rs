//! JSON body extractor with API-shaped rejections.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Like [`axum::Json`], but any rejection (bad syntax, wrong content type,
/// wrong shape) becomes a 400 [`ApiError::Validation`] with the standard body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::Validation(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header};

    fn json_request(body: &str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json() {
        let JsonBody(value) = JsonBody::<serde_json::Value>::from_request(
            json_request(r#"{"title":"A"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(value["title"], "A");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let result =
            JsonBody::<serde_json::Value>::from_request(json_request("{not json"), &()).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_content_type_is_validation_error() {
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(r#"{"title":"A"}"#))
            .unwrap();
        let result = JsonBody::<serde_json::Value>::from_request(request, &()).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
