//! HTTP client for the FinLex assistant service.
//!
//! The service exposes four endpoints (`POST /chat`, `POST /clear_chat`,
//! `POST /search`, `GET /document/:id`) with form-encoded requests and
//! JSON responses. Everything the UI needs to know about a failed call
//! is decided here, once, as an [`ApiError`]; views pattern-match the
//! result instead of re-inspecting response bodies.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{ChatReply, ClearReply, DocumentDetail, DocumentKind, Reference, SearchResult};
