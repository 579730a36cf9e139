//! Events flowing through the Elm-architecture event loop.

use crate::api::{ApiError, ChatReply, ClearReply, DocumentDetail, SearchResult};

/// Everything the event loop can wake up on: terminal input, the
/// periodic tick, and completions of spawned request tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// Periodic tick for the busy spinner.
    Tick,
    /// Raw terminal input (keyboard/resize).
    Input(crossterm::event::Event),
    /// `POST /chat` finished.
    ChatCompleted(Result<ChatReply, ApiError>),
    /// `POST /clear_chat` finished.
    ClearCompleted(Result<ClearReply, ApiError>),
    /// `POST /search` finished.
    SearchCompleted(Result<Vec<SearchResult>, ApiError>),
    /// `GET /document/:id` finished. `token` identifies which `load`
    /// call issued the request; stale tokens are discarded.
    DocumentLoaded {
        token: u64,
        result: Result<DocumentDetail, ApiError>,
    },
    /// A resolved action to execute.
    Action(Action),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper or by views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusChat,
    FocusSearch,
    FocusDocument,
    TabNext,
    TabPrev,
    ToggleSidebar,
    FocusReferences,

    // Session
    ClearConversation,
    OpenDocument(String),

    // Application
    Quit,
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Chat,
    Search,
    Document,
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::Chat, Focus::Search, Focus::Document];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Chat => "Chat",
            Focus::Search => "Search",
            Focus::Document => "Document",
        }
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Whether the main content or the references sidebar has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaFocus {
    Main,
    Sidebar,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_next_cycles() {
        assert_eq!(Focus::Chat.next(), Focus::Search);
        assert_eq!(Focus::Search.next(), Focus::Document);
        assert_eq!(Focus::Document.next(), Focus::Chat);
    }

    #[test]
    fn test_focus_prev_cycles() {
        assert_eq!(Focus::Chat.prev(), Focus::Document);
        assert_eq!(Focus::Document.prev(), Focus::Search);
    }

    #[test]
    fn test_focus_labels() {
        for focus in Focus::ALL {
            assert!(!focus.label().is_empty());
        }
    }
}
