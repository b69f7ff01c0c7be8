//! Phrase API client.

use std::time::Duration;

use async_trait::async_trait;
use domain::models::{MutationResponse, NewPhrase, Phrase, UpdatePhraseRequest};
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::ClientError;

const PHRASES_PATH: &str = "/api/phrases";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Operations the client session needs from the phrase store.
#[async_trait]
pub trait PhraseApi: Send + Sync {
    /// Every phrase, newest first.
    async fn list(&self) -> Result<Vec<Phrase>, ClientError>;

    async fn create(&self, phrase: &NewPhrase) -> Result<MutationResponse, ClientError>;

    /// Appends a batch. Incomplete items are skipped server-side and
    /// `count` reports how many were written.
    async fn create_batch(&self, phrases: &[NewPhrase]) -> Result<MutationResponse, ClientError>;

    async fn update(
        &self,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<MutationResponse, ClientError>;

    async fn delete(&self, id: i64) -> Result<MutationResponse, ClientError>;
}

/// `PhraseApi` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPhraseApi {
    client: Client,
    endpoint: String,
}

impl HttpPhraseApi {
    /// Creates a client for the server at `base_url`, e.g. `http://localhost:8080`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), PHRASES_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Turns any non-2xx response into `ClientError::Status`.
async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PhraseApi for HttpPhraseApi {
    async fn list(&self) -> Result<Vec<Phrase>, ClientError> {
        let response = self.client.get(&self.endpoint).send().await?;
        let phrases: Vec<Phrase> = check_status(response).await?.json().await?;

        debug!(count = phrases.len(), "Fetched phrases");
        Ok(phrases)
    }

    async fn create(&self, phrase: &NewPhrase) -> Result<MutationResponse, ClientError> {
        let response = self.client.post(&self.endpoint).json(phrase).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn create_batch(&self, phrases: &[NewPhrase]) -> Result<MutationResponse, ClientError> {
        let response = self.client.post(&self.endpoint).json(phrases).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn update(
        &self,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<MutationResponse, ClientError> {
        let request = UpdatePhraseRequest {
            id: Some(id),
            title: title.to_string(),
            content: content.to_string(),
        };
        let response = self.client.put(&self.endpoint).json(&request).send().await?;
        Ok(check_status(response).await?.json().await?)
    }

    async fn delete(&self, id: i64) -> Result<MutationResponse, ClientError> {
        let response = self
            .client
            .delete(&self.endpoint)
            .query(&[("id", id)])
            .send()
            .await?;
        Ok(check_status(response).await?.json().await?)
    }
}
