//! References sidebar: ranked supporting documents for the latest
//! assistant turn.
//!
//! The reference set is replaced wholesale on every chat response and
//! belongs entirely to that response; nothing from earlier turns
//! survives. Order is the server's ranking; no client-side sorting.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::api::Reference;
use crate::tui::theme;

/// Relevance buckets for the card gauge. Purely visual; they never
/// filter or reorder anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelevanceTier {
    High,
    Medium,
    Low,
    VeryLow,
}

impl RelevanceTier {
    pub fn for_pct(pct: u8) -> Self {
        if pct > 75 {
            Self::High
        } else if pct > 50 {
            Self::Medium
        } else if pct > 25 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::High => theme::RELEVANCE_HIGH,
            Self::Medium => theme::RELEVANCE_MEDIUM,
            Self::Low => theme::RELEVANCE_LOW,
            Self::VeryLow => theme::RELEVANCE_VERY_LOW,
        }
    }
}

/// What the panel is showing. `Idle` (fresh session or after clear)
/// and `Empty` (a response arrived carrying no references) render
/// different placeholders, mirroring the two server states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferencesPhase {
    Idle,
    Empty,
    Loaded(Vec<Reference>),
}

/// Result of sidebar input handling.
#[derive(Debug, PartialEq, Eq)]
pub enum ReferenceAction {
    Consumed,
    /// Open the selected document in the viewer.
    Open(String),
    /// Hand focus back to the main area.
    Close,
}

pub struct ReferencesState {
    phase: ReferencesPhase,
    /// Cursor for keyboard navigation.
    selected: usize,
    /// Card whose document is open in the viewer. Cosmetic only.
    active: Option<usize>,
}

/// Rendered height of one reference card, blank separator included.
const CARD_HEIGHT: usize = 5;

impl ReferencesState {
    pub fn new() -> Self {
        Self {
            phase: ReferencesPhase::Idle,
            selected: 0,
            active: None,
        }
    }

    pub fn phase(&self) -> &ReferencesPhase {
        &self.phase
    }

    /// Replace the reference set wholesale with a new response's.
    pub fn set_references(&mut self, references: Vec<Reference>) {
        self.phase = if references.is_empty() {
            ReferencesPhase::Empty
        } else {
            ReferencesPhase::Loaded(references)
        };
        self.selected = 0;
        self.active = None;
    }

    /// Back to the fresh-session placeholder (clear operation).
    pub fn reset(&mut self) {
        self.phase = ReferencesPhase::Idle;
        self.selected = 0;
        self.active = None;
    }

    pub fn references(&self) -> &[Reference] {
        match &self.phase {
            ReferencesPhase::Loaded(refs) => refs,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.references().len()
    }

    pub fn is_empty(&self) -> bool {
        self.references().is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn select_next(&mut self) {
        let len = self.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn select_prev(&mut self) {
        let len = self.len();
        if len > 0 {
            self.selected = (self.selected + len - 1) % len;
        }
    }

    /// Mark the selected card active (clearing any other mark) and
    /// return its document id. Selection is purely cosmetic.
    pub fn activate_selected(&mut self) -> Option<String> {
        let id = self.references().get(self.selected)?.id.clone();
        self.active = Some(self.selected);
        Some(id)
    }

    /// j/k navigate, Enter opens the selected document, Esc/h leaves
    /// the sidebar.
    pub fn handle_input(&mut self, event: &Event) -> Option<ReferenceAction> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        if *modifiers != KeyModifiers::NONE && *modifiers != KeyModifiers::SHIFT {
            return None;
        }

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.select_next();
                Some(ReferenceAction::Consumed)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.select_prev();
                Some(ReferenceAction::Consumed)
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                self.activate_selected().map(ReferenceAction::Open)
            }
            KeyCode::Esc | KeyCode::Char('h') => Some(ReferenceAction::Close),
            _ => None,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let block = if focused {
            theme::block_focused("References")
        } else {
            theme::block_default("References")
        };
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new("").style(Style::default().bg(theme::BG_SURFACE)),
            inner,
        );

        match &self.phase {
            ReferencesPhase::Idle => {
                let placeholder = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(
                        " References will appear here",
                        Style::default().fg(theme::TEXT_MUTED),
                    ),
                    Line::styled(
                        " after asking a question.",
                        Style::default().fg(theme::TEXT_MUTED),
                    ),
                ]);
                frame.render_widget(placeholder, inner);
            }
            ReferencesPhase::Empty => {
                let placeholder = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(
                        " No specific references found",
                        Style::default().fg(theme::INFO),
                    ),
                    Line::styled(" for this response.", Style::default().fg(theme::INFO)),
                ]);
                frame.render_widget(placeholder, inner);
            }
            ReferencesPhase::Loaded(references) => {
                self.render_cards(frame, inner, references, focused);
            }
        }
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect, references: &[Reference], focused: bool) {
        let width = area.width as usize;
        let mut lines: Vec<Line> = Vec::with_capacity(1 + references.len() * CARD_HEIGHT);

        lines.push(Line::from(vec![
            Span::styled("Relevant Sources ", theme::heading()),
            Span::styled(format!("({} found)", references.len()), theme::muted()),
        ]));

        for (idx, reference) in references.iter().enumerate() {
            let is_selected = focused && idx == self.selected;
            let is_active = self.active == Some(idx);

            let marker = if is_active { "┃ " } else { "  " };
            let title_style = if is_selected {
                theme::highlight()
            } else {
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
            };

            lines.push(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme::ACCENT)),
                Span::styled(
                    truncate(&reference.title, width.saturating_sub(14)),
                    title_style,
                ),
                Span::raw(" "),
                Span::styled(reference.kind().label(), theme::type_badge(reference.kind())),
            ]));
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(truncate(&reference.source, width.saturating_sub(4)), theme::muted()),
            ]));
            lines.push(Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    truncate(&reference.content_preview, width.saturating_sub(4)),
                    Style::default().fg(theme::TEXT),
                ),
            ]));
            lines.push(relevance_gauge(reference.relevance_pct(), width, marker));
            lines.push(Line::raw(""));
        }

        // Keep the selected card in view.
        let visible_height = area.height.max(1) as usize;
        let selected_top = 1 + self.selected * CARD_HEIGHT;
        let scroll = (selected_top + CARD_HEIGHT).saturating_sub(visible_height);

        let visible: Vec<Line> = lines.into_iter().skip(scroll).take(visible_height).collect();
        frame.render_widget(
            Paragraph::new(visible).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }
}

/// One-line relevance bar plus the numeric percentage.
fn relevance_gauge(pct: u8, width: usize, marker: &str) -> Line<'static> {
    let tier = RelevanceTier::for_pct(pct);
    let bar_width = width.saturating_sub(10).min(20).max(4);
    let filled = bar_width * pct as usize / 100;

    Line::from(vec![
        Span::raw(marker.to_string()),
        Span::styled("█".repeat(filled), Style::default().fg(tier.color())),
        Span::styled("░".repeat(bar_width - filled), Style::default().fg(theme::TEXT_DIM)),
        Span::styled(format!(" {pct}%"), theme::muted()),
    ])
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
    use rstest::rstest;

    fn reference(id: &str, relevance: Option<u8>) -> Reference {
        Reference {
            id: id.to_string(),
            title: format!("Title {id}"),
            source: "BIS".to_string(),
            document_type: "standard".to_string(),
            content_preview: "…".to_string(),
            relevance,
        }
    }

    #[rstest]
    #[case(100, RelevanceTier::High)]
    #[case(82, RelevanceTier::High)]
    #[case(76, RelevanceTier::High)]
    #[case(75, RelevanceTier::Medium)]
    #[case(51, RelevanceTier::Medium)]
    #[case(50, RelevanceTier::Low)]
    #[case(26, RelevanceTier::Low)]
    #[case(25, RelevanceTier::VeryLow)]
    #[case(0, RelevanceTier::VeryLow)]
    fn test_tier_boundaries(#[case] pct: u8, #[case] expected: RelevanceTier) {
        assert_eq!(RelevanceTier::for_pct(pct), expected);
    }

    #[test]
    fn test_set_references_replaces_wholesale() {
        let mut state = ReferencesState::new();
        state.set_references(vec![reference("a", Some(90)), reference("b", Some(40))]);
        assert_eq!(state.len(), 2);

        state.set_references(vec![reference("c", None)]);
        assert_eq!(state.len(), 1);
        assert_eq!(state.references()[0].id, "c");
    }

    #[test]
    fn test_empty_response_is_distinct_from_idle() {
        let mut state = ReferencesState::new();
        assert_eq!(*state.phase(), ReferencesPhase::Idle);
        state.set_references(Vec::new());
        assert_eq!(*state.phase(), ReferencesPhase::Empty);
        state.reset();
        assert_eq!(*state.phase(), ReferencesPhase::Idle);
    }

    #[test]
    fn test_input_order_preserved() {
        // Server ranking is authoritative; relevance must not reorder.
        let mut state = ReferencesState::new();
        state.set_references(vec![
            reference("low", Some(10)),
            reference("high", Some(95)),
        ]);
        assert_eq!(state.references()[0].id, "low");
        assert_eq!(state.references()[1].id, "high");
    }

    #[test]
    fn test_activate_marks_single_card() {
        let mut state = ReferencesState::new();
        state.set_references(vec![reference("a", None), reference("b", None)]);

        assert_eq!(state.activate_selected(), Some("a".to_string()));
        assert_eq!(state.active(), Some(0));

        state.select_next();
        assert_eq!(state.activate_selected(), Some("b".to_string()));
        // Previous mark is cleared; only one card is active.
        assert_eq!(state.active(), Some(1));
    }

    #[test]
    fn test_new_response_clears_active_mark() {
        let mut state = ReferencesState::new();
        state.set_references(vec![reference("a", None)]);
        state.activate_selected();
        state.set_references(vec![reference("b", None)]);
        assert_eq!(state.active(), None);
    }

    #[test]
    fn test_selection_wraps() {
        let mut state = ReferencesState::new();
        state.set_references(vec![reference("a", None), reference("b", None)]);
        state.select_prev();
        assert_eq!(state.selected(), 1);
        state.select_next();
        assert_eq!(state.selected(), 0);
    }

    #[test]
    fn test_activate_on_empty_panel_is_noop() {
        let mut state = ReferencesState::new();
        assert_eq!(state.activate_selected(), None);
        assert_eq!(state.active(), None);
    }
}
