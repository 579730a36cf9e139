//! Keyword search view, independent of the chat path.
//!
//! The search input has its own unguarded loading indicator; a search
//! in flight never blocks chat or document requests.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::{ApiError, SearchResult};
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchInputMode {
    Normal,
    Insert,
}

/// What the results area is showing. `NoMatches` is informational,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Loading,
    Failed(String),
    NoMatches,
    Loaded(Vec<SearchResult>),
}

/// Result of search-view input handling.
#[derive(Debug, PartialEq, Eq)]
pub enum SearchAction {
    Consumed,
    /// Open the selected result in the Document Viewer.
    Open(String),
}

pub struct SearchState {
    input: InputBuffer,
    input_mode: SearchInputMode,
    phase: SearchPhase,
    selected: usize,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            input: InputBuffer::new(),
            input_mode: SearchInputMode::Normal,
            phase: SearchPhase::Idle,
            selected: 0,
        }
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn input_mode(&self) -> SearchInputMode {
        self.input_mode
    }

    /// Submit the current query. An empty trimmed query is a silent
    /// no-op: no request, results area untouched.
    pub fn submit(&mut self, services: &Services) {
        if self.input.is_empty() {
            return;
        }
        let query = self.input.text().trim().to_string();
        log::info!("Searching for: {query}");
        self.phase = SearchPhase::Loading;
        self.selected = 0;
        services.run_search(query);
    }

    /// Route a finished search request.
    pub fn on_completed(&mut self, result: Result<Vec<SearchResult>, ApiError>) {
        self.phase = match result {
            Ok(results) if results.is_empty() => SearchPhase::NoMatches,
            Ok(results) => SearchPhase::Loaded(results),
            // Server-reported message is shown literally.
            Err(ApiError::App(message)) => SearchPhase::Failed(message),
            Err(err) => SearchPhase::Failed(format!("Error performing search: {err}")),
        };
        self.selected = 0;
    }

    pub fn results(&self) -> &[SearchResult] {
        match &self.phase {
            SearchPhase::Loaded(results) => results,
            _ => &[],
        }
    }

    /// Returns true if the event was consumed.
    pub fn handle_input(&mut self, event: &Event, services: &Services) -> Option<SearchAction> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match self.input_mode {
            SearchInputMode::Insert => self.handle_insert_input(*code, *modifiers, services),
            SearchInputMode::Normal => self.handle_normal_input(*code, *modifiers),
        }
    }

    fn handle_insert_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> Option<SearchAction> {
        // These always fall through to the global handler
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return None,
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => return None,
            _ => {}
        }

        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.input_mode = SearchInputMode::Normal;
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                self.submit(services);
                self.input_mode = SearchInputMode::Normal;
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => self.input.backspace(),
            (KeyModifiers::NONE, KeyCode::Delete) => self.input.delete(),
            (KeyModifiers::NONE, KeyCode::Left) => self.input.move_left(),
            (KeyModifiers::NONE, KeyCode::Right) => self.input.move_right(),
            (KeyModifiers::NONE, KeyCode::Home) => self.input.move_home(),
            (KeyModifiers::NONE, KeyCode::End) => self.input.move_end(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.input.clear(),
            (_, KeyCode::Char(c)) => self.input.insert_char(c),
            _ => {}
        }
        Some(SearchAction::Consumed)
    }

    fn handle_normal_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
    ) -> Option<SearchAction> {
        if modifiers != KeyModifiers::NONE && modifiers != KeyModifiers::SHIFT {
            return None;
        }

        match code {
            KeyCode::Char('i') | KeyCode::Char('/') => {
                self.input_mode = SearchInputMode::Insert;
                Some(SearchAction::Consumed)
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let len = self.results().len();
                if len > 0 {
                    self.selected = (self.selected + 1) % len;
                }
                Some(SearchAction::Consumed)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let len = self.results().len();
                if len > 0 {
                    self.selected = (self.selected + len - 1) % len;
                }
                Some(SearchAction::Consumed)
            }
            KeyCode::Enter => {
                let id = self.results().get(self.selected).map(|r| r.id.clone());
                match id {
                    Some(id) => Some(SearchAction::Open(id)),
                    // No results to open; drop into the input instead.
                    None => {
                        self.input_mode = SearchInputMode::Insert;
                        Some(SearchAction::Consumed)
                    }
                }
            }
            _ => None,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Query input
            Constraint::Min(1),    // Results
        ])
        .split(area);

        self.render_input(frame, chunks[0], focused);
        self.render_results(frame, chunks[1]);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let (border_color, title) = match self.input_mode {
            SearchInputMode::Insert => (theme::ACCENT, " Search (Esc to exit) "),
            _ if focused => (theme::PRIMARY_LIGHT, " Search (i to type) "),
            _ => (theme::TEXT_DIM, " Search "),
        };

        let display = if self.input.text().is_empty() {
            Line::styled(
                "Search financial laws and regulations...",
                Style::default().fg(theme::TEXT_MUTED),
            )
        } else {
            Line::raw(self.input.text().to_string())
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title);
        frame.render_widget(Paragraph::new(display).block(block), area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        match &self.phase {
            SearchPhase::Idle => {
                let hint = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(
                        "  Results will appear here.",
                        Style::default().fg(theme::TEXT_MUTED),
                    ),
                ]);
                frame.render_widget(hint, area);
            }
            SearchPhase::Loading => {
                let loading = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled("  Searching...", Style::default().fg(theme::TEXT_MUTED)),
                ]);
                frame.render_widget(loading, area);
            }
            SearchPhase::Failed(message) => {
                let error = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(format!("  {message}"), theme::error_text()),
                ]);
                frame.render_widget(error, area);
            }
            SearchPhase::NoMatches => {
                let info = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(
                        "  No results found matching your query.",
                        Style::default().fg(theme::INFO),
                    ),
                ]);
                frame.render_widget(info, area);
            }
            SearchPhase::Loaded(results) => {
                self.render_result_list(frame, area, results);
            }
        }
    }

    fn render_result_list(&self, frame: &mut Frame, area: Rect, results: &[SearchResult]) {
        let width = area.width as usize;
        let mut lines: Vec<Line> = Vec::with_capacity(1 + results.len() * 4);

        lines.push(Line::from(vec![
            Span::styled("  Search Results ", theme::heading()),
            Span::styled(format!("({} found)", results.len()), theme::muted()),
        ]));

        for (idx, result) in results.iter().enumerate() {
            let is_selected = idx == self.selected;
            let prefix = if is_selected { "▸ " } else { "  " };
            let title_style = if is_selected {
                theme::highlight()
            } else {
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
            };

            lines.push(Line::from(vec![
                Span::raw(prefix),
                Span::styled(truncate(&result.title, width.saturating_sub(16)), title_style),
                Span::raw(" "),
                Span::styled(result.kind().label(), theme::type_badge(result.kind())),
            ]));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(truncate(&result.source, width.saturating_sub(4)), theme::muted()),
            ]));
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    truncate(&result.content_preview, width.saturating_sub(4)),
                    Style::default().fg(theme::TEXT),
                ),
            ]));
            lines.push(Line::raw(""));
        }

        // Keep the selected result in view (4 lines per card + header).
        let visible_height = area.height.max(1) as usize;
        let selected_top = 1 + self.selected * 4;
        let scroll = (selected_top + 4).saturating_sub(visible_height);

        let visible: Vec<Line> = lines.into_iter().skip(scroll).take(visible_height).collect();
        frame.render_widget(Paragraph::new(visible), area);
    }
}

fn truncate(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    for (count, c) in text.chars().enumerate() {
        if count + 1 >= max {
            out.push('…');
            return out;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            title: format!("Result {id}"),
            source: "SEC".to_string(),
            document_type: "regulation".to_string(),
            content_preview: "…".to_string(),
        }
    }

    #[test]
    fn test_zero_results_is_informational() {
        let mut state = SearchState::new();
        state.on_completed(Ok(Vec::new()));
        assert_eq!(*state.phase(), SearchPhase::NoMatches);
    }

    #[test]
    fn test_results_replace_wholesale() {
        let mut state = SearchState::new();
        state.on_completed(Ok(vec![result("a"), result("b")]));
        assert_eq!(state.results().len(), 2);
        state.on_completed(Ok(vec![result("c")]));
        assert_eq!(state.results().len(), 1);
        assert_eq!(state.results()[0].id, "c");
    }

    #[test]
    fn test_app_error_shows_server_message() {
        let mut state = SearchState::new();
        state.on_completed(Err(ApiError::App("index unavailable".into())));
        assert_eq!(*state.phase(), SearchPhase::Failed("index unavailable".into()));
    }

    #[test]
    fn test_transport_error_shows_search_prefix() {
        let mut state = SearchState::new();
        state.on_completed(Err(ApiError::Status(500)));
        match state.phase() {
            SearchPhase::Failed(message) => {
                assert!(message.starts_with("Error performing search:"));
            }
            other => panic!("unexpected phase: {other:?}"),
        }
    }

    #[test]
    fn test_selection_wraps_over_results() {
        let mut state = SearchState::new();
        state.on_completed(Ok(vec![result("a"), result("b"), result("c")]));
        state.handle_normal_input(KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(state.selected, 2);
        state.handle_normal_input(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_enter_opens_selected_result() {
        let mut state = SearchState::new();
        state.on_completed(Ok(vec![result("a"), result("b")]));
        state.handle_normal_input(KeyCode::Char('j'), KeyModifiers::NONE);
        let action = state.handle_normal_input(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(action, Some(SearchAction::Open("b".to_string())));
    }
}
