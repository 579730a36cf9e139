//! Response payload types for the assistant service.

use serde::{Deserialize, Deserializer};

/// Successful `POST /chat` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// Supporting documents for this response. The server may send
    /// `null` or omit the field entirely; both mean "no references".
    #[serde(default, deserialize_with = "null_as_empty")]
    pub references: Vec<Reference>,
}

/// `POST /clear_chat` payload. Anything other than `"success"` means
/// the conversation was not cleared server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct ClearReply {
    pub status: String,
}

/// Successful `POST /search` payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SearchReply {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<SearchResult>,
}

/// A supporting document surfaced alongside an assistant turn,
/// ranked by the server. The set is replaced wholesale on every
/// chat response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reference {
    pub id: String,
    pub title: String,
    pub source: String,
    pub document_type: String,
    pub content_preview: String,
    #[serde(default)]
    pub relevance: Option<u8>,
}

impl Reference {
    /// Relevance percentage in [0, 100]; the server omits it for
    /// exact matches, which count as 100.
    pub fn relevance_pct(&self) -> u8 {
        self.relevance.unwrap_or(100).min(100)
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::classify(&self.document_type)
    }
}

/// One keyword-search hit. Same shape as [`Reference`] minus the
/// relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub source: String,
    pub document_type: String,
    pub content_preview: String,
}

impl SearchResult {
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::classify(&self.document_type)
    }
}

/// Full document payload from `GET /document/:id`. Fetched lazily,
/// one at a time; never cached client-side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentDetail {
    pub id: String,
    pub title: String,
    pub document_type: String,
    pub source: String,
    pub content: String,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

impl DocumentDetail {
    pub fn kind(&self) -> DocumentKind {
        DocumentKind::classify(&self.document_type)
    }
}

/// Known document categories. The wire format carries free-form
/// strings; anything unrecognized renders with the `Standard` badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Statute,
    Directive,
    Regulation,
    Standard,
}

impl DocumentKind {
    pub fn classify(raw: &str) -> Self {
        match raw {
            "statute" => Self::Statute,
            "directive" => Self::Directive,
            "regulation" => Self::Regulation,
            _ => Self::Standard,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Statute => "statute",
            Self::Directive => "directive",
            Self::Regulation => "regulation",
            Self::Standard => "standard",
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
