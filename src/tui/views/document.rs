//! Document viewer: full content of one document, fetched on demand.
//!
//! Documents are never cached; every open re-fetches. Each `begin_load`
//! bumps a request token and completions carrying an older token are
//! discarded, so a slow response can never overwrite a newer request's
//! view.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::api::{ApiError, DocumentDetail};
use crate::tui::theme;

/// What the viewer is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentPhase {
    /// Nothing opened yet, or the viewer was reset by clear.
    Idle,
    Loading {
        id: String,
    },
    /// Transport or application failure, rendered inline. Never
    /// propagated, never retried.
    Failed {
        message: String,
    },
    Loaded {
        doc: DocumentDetail,
        /// Pre-formatted publication date; None when the server sent
        /// no date or an unparseable one (that is not an error).
        date_line: Option<String>,
    },
}

pub struct DocumentState {
    phase: DocumentPhase,
    token: u64,
    scroll: usize,
}

impl DocumentState {
    pub fn new() -> Self {
        Self {
            phase: DocumentPhase::Idle,
            token: 0,
            scroll: 0,
        }
    }

    pub fn phase(&self) -> &DocumentPhase {
        &self.phase
    }

    /// Start a load: switch to the loading indicator synchronously
    /// and return the token the completion event must carry.
    pub fn begin_load(&mut self, id: &str) -> u64 {
        self.token += 1;
        self.scroll = 0;
        self.phase = DocumentPhase::Loading { id: id.to_string() };
        self.token
    }

    /// Apply a completed fetch. Completions from superseded loads are
    /// dropped on the floor.
    pub fn on_loaded(&mut self, token: u64, result: Result<DocumentDetail, ApiError>) {
        if token != self.token {
            log::debug!(
                "Discarding stale document response (token {token}, current {})",
                self.token
            );
            return;
        }

        self.phase = match result {
            Ok(doc) => {
                let date_line = doc
                    .publication_date
                    .as_deref()
                    .and_then(format_publication_date);
                DocumentPhase::Loaded { doc, date_line }
            }
            // Server-reported message is shown literally.
            Err(ApiError::App(message)) => DocumentPhase::Failed { message },
            Err(err) => DocumentPhase::Failed {
                message: format!("Error loading document: {err}"),
            },
        };
    }

    /// Back to the placeholder. Bumps the token so any fetch still in
    /// flight cannot resurrect the old view.
    pub fn reset(&mut self) {
        self.token += 1;
        self.scroll = 0;
        self.phase = DocumentPhase::Idle;
    }

    pub fn handle_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };
        if *modifiers != KeyModifiers::NONE && *modifiers != KeyModifiers::SHIFT {
            return false;
        }

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll_down(1);
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_up(1);
                true
            }
            KeyCode::PageDown => {
                self.scroll_down(10);
                true
            }
            KeyCode::PageUp => {
                self.scroll_up(10);
                true
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.scroll = 0;
                true
            }
            _ => false,
        }
    }

    fn scroll_down(&mut self, lines: usize) {
        let max = match &self.phase {
            DocumentPhase::Loaded { doc, .. } => doc.content.lines().count(),
            _ => 0,
        };
        self.scroll = (self.scroll + lines).min(max);
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = if focused {
            theme::block_focused("Document")
        } else {
            theme::block_default("Document")
        };
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match &self.phase {
            DocumentPhase::Idle => {
                let placeholder = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(
                        "  Select a reference document to view its contents here.",
                        Style::default().fg(theme::INFO),
                    ),
                ]);
                frame.render_widget(placeholder, inner);
            }
            DocumentPhase::Loading { id } => {
                let loading = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(
                        format!("  Loading document {id}..."),
                        Style::default().fg(theme::TEXT_MUTED),
                    ),
                ]);
                frame.render_widget(loading, inner);
            }
            DocumentPhase::Failed { message } => {
                let error = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(format!("  {message}"), theme::error_text()),
                ])
                .wrap(Wrap { trim: false });
                frame.render_widget(error, inner);
            }
            DocumentPhase::Loaded { doc, date_line } => {
                self.render_document(frame, inner, doc, date_line.as_deref());
            }
        }
    }

    fn render_document(
        &self,
        frame: &mut Frame,
        area: Rect,
        doc: &DocumentDetail,
        date_line: Option<&str>,
    ) {
        let mut meta = vec![
            Span::styled(doc.kind().label(), theme::type_badge(doc.kind())),
            Span::raw("  "),
            Span::styled(doc.source.clone(), theme::muted()),
        ];
        if let Some(date) = date_line {
            meta.push(Span::styled(format!("  Published: {date}"), theme::muted()));
        }
        if let Some(jurisdiction) = &doc.jurisdiction {
            meta.push(Span::styled(
                format!("  Jurisdiction: {jurisdiction}"),
                theme::muted(),
            ));
        }

        let mut lines = vec![
            Line::from(Span::styled(
                doc.title.clone(),
                Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(meta),
            Line::raw(""),
        ];
        lines.extend(
            doc.content
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme::TEXT)))),
        );

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll as u16, 0));
        frame.render_widget(paragraph, area);
    }
}

/// Format a raw publication date for display. Accepts RFC 3339 or
/// plain `YYYY-MM-DD`; anything else yields no date line.
fn format_publication_date(raw: &str) -> Option<String> {
    let date = chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .ok()?;
    Some(date.format("%B %-d, %Y").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(id: &str) -> DocumentDetail {
        DocumentDetail {
            id: id.to_string(),
            title: "Basel III Accord".to_string(),
            document_type: "standard".to_string(),
            source: "BIS".to_string(),
            content: "Capital requirements...".to_string(),
            publication_date: None,
            jurisdiction: None,
        }
    }

    #[test]
    fn test_begin_load_shows_loading_synchronously() {
        let mut state = DocumentState::new();
        state.begin_load("d1");
        assert!(matches!(state.phase(), DocumentPhase::Loading { id } if id == "d1"));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = DocumentState::new();
        let first = state.begin_load("d1");
        let second = state.begin_load("d2");

        // First request resolves after the second was issued.
        state.on_loaded(first, Ok(document("d1")));
        assert!(matches!(state.phase(), DocumentPhase::Loading { id } if id == "d2"));

        state.on_loaded(second, Ok(document("d2")));
        assert!(matches!(state.phase(), DocumentPhase::Loaded { doc, .. } if doc.id == "d2"));
    }

    #[test]
    fn test_app_error_renders_literal_message() {
        let mut state = DocumentState::new();
        let token = state.begin_load("d1");
        state.on_loaded(token, Err(ApiError::App("Document not found".into())));
        assert!(
            matches!(state.phase(), DocumentPhase::Failed { message } if message == "Document not found")
        );
    }

    #[test]
    fn test_transport_error_renders_with_prefix() {
        let mut state = DocumentState::new();
        let token = state.begin_load("d1");
        state.on_loaded(token, Err(ApiError::Status(502)));
        assert!(matches!(
            state.phase(),
            DocumentPhase::Failed { message } if message.starts_with("Error loading document:")
        ));
    }

    #[test]
    fn test_reset_invalidates_pending_load() {
        let mut state = DocumentState::new();
        let token = state.begin_load("d1");
        state.reset();
        state.on_loaded(token, Ok(document("d1")));
        assert_eq!(*state.phase(), DocumentPhase::Idle);
    }

    #[test]
    fn test_missing_date_yields_no_date_line() {
        let mut state = DocumentState::new();
        let token = state.begin_load("d1");
        state.on_loaded(token, Ok(document("d1")));
        assert!(matches!(
            state.phase(),
            DocumentPhase::Loaded { date_line: None, .. }
        ));
    }

    #[test]
    fn test_invalid_date_yields_no_date_line() {
        let mut state = DocumentState::new();
        let token = state.begin_load("d1");
        let mut doc = document("d1");
        doc.publication_date = Some("circa 2010".to_string());
        state.on_loaded(token, Ok(doc));
        assert!(matches!(
            state.phase(),
            DocumentPhase::Loaded { date_line: None, .. }
        ));
    }

    #[test]
    fn test_date_formats() {
        assert_eq!(
            format_publication_date("2010-12-16").as_deref(),
            Some("December 16, 2010")
        );
        assert_eq!(
            format_publication_date("2010-12-16T00:00:00Z").as_deref(),
            Some("December 16, 2010")
        );
        assert_eq!(format_publication_date("not a date"), None);
        assert_eq!(format_publication_date(""), None);
    }
}
