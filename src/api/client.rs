//! Thin reqwest wrapper around the four service endpoints.

use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{ChatReply, ClearReply, DocumentDetail, SearchReply, SearchResult};

/// Client for the assistant service. Cheap to clone; request tasks
/// take their own copy.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a user message. The reply carries the assistant's text and
    /// the full replacement set of references.
    pub async fn chat(&self, message: &str) -> Result<ChatReply, ApiError> {
        let response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .form(&[("message", message)])
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        decode_payload(response).await
    }

    /// Ask the server to drop the conversation history.
    pub async fn clear_chat(&self) -> Result<ClearReply, ApiError> {
        let response = self
            .http
            .post(format!("{}/clear_chat", self.base_url))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        decode_payload(response).await
    }

    /// Keyword search against the document corpus.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, ApiError> {
        let response = self
            .http
            .post(format!("{}/search", self.base_url))
            .form(&[("query", query)])
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        let reply: SearchReply = decode_payload(response).await?;
        Ok(reply.results)
    }

    /// Fetch one document's full content by id.
    pub async fn document(&self, id: &str) -> Result<DocumentDetail, ApiError> {
        let response = self
            .http
            .get(format!("{}/document/{}", self.base_url, id))
            .send()
            .await
            .map_err(ApiError::from_reqwest)?;
        decode_payload(response).await
    }
}

/// Resolve a response to the tagged result the UI consumes.
///
/// Order matters: a non-2xx status is a transport failure regardless
/// of body content; only a 2xx body is hit-tested for the `error`
/// field before being decoded into the expected payload.
async fn decode_payload<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status(status.as_u16()));
    }

    let body: serde_json::Value = response.json().await.map_err(ApiError::from_reqwest)?;

    if let Some(message) = body.get("error").and_then(|e| e.as_str()) {
        return Err(ApiError::App(message.to_string()));
    }

    serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}
