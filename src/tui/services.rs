//! Request spawning for the event loop.
//!
//! Views never await network calls. Each operation spawns a task that
//! runs the HTTP round-trip and reports back through the event
//! channel; all UI state mutation stays on the event loop.

use tokio::sync::mpsc;

use crate::api::ApiClient;

use super::events::AppEvent;

/// Handle to the API client and the event channel, passed to views
/// that issue requests.
#[derive(Clone)]
pub struct Services {
    pub api: ApiClient,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    pub fn new(api: ApiClient, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { api, event_tx }
    }

    /// `POST /chat`, resolving to `AppEvent::ChatCompleted`.
    pub fn submit_chat(&self, message: String) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.chat(&message).await;
            let _ = tx.send(AppEvent::ChatCompleted(result));
        });
    }

    /// `POST /clear_chat`, resolving to `AppEvent::ClearCompleted`.
    pub fn clear_chat(&self) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.clear_chat().await;
            let _ = tx.send(AppEvent::ClearCompleted(result));
        });
    }

    /// `POST /search`, resolving to `AppEvent::SearchCompleted`.
    pub fn run_search(&self, query: String) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.search(&query).await;
            let _ = tx.send(AppEvent::SearchCompleted(result));
        });
    }

    /// `GET /document/:id`, resolving to `AppEvent::DocumentLoaded`
    /// carrying the issuing load's token.
    pub fn load_document(&self, id: String, token: u64) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.document(&id).await;
            let _ = tx.send(AppEvent::DocumentLoaded { token, result });
        });
    }
}
