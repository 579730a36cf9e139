//! Chat view: conversation transcript and prompt.
//!
//! Owns the single send path: manual submissions and example-question
//! shortcuts both go through [`ChatState::submit`]. The busy flag
//! covers the chat request only; search and document loads run with
//! their own indicators.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::api::ApiError;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

/// Canned questions offered by the welcome placeholder. Selecting one
/// submits it through the normal path.
pub const EXAMPLE_QUESTIONS: [&str; 3] = [
    "What are the key provisions of the Dodd-Frank Act?",
    "Explain SEC Rule 10b-5 regarding securities fraud",
    "What are Basel III capital requirements for banks?",
];

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatInputMode {
    Normal,
    Insert,
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationTurn {
    pub text: String,
    pub is_user: bool,
}

/// Ordered, append-only conversation transcript. Grows monotonically
/// except for the explicit clear operation, which resets it to the
/// one-time welcome placeholder.
pub struct Transcript {
    turns: Vec<ConversationTurn>,
    welcome: bool,
    scroll_offset: usize,
    auto_scroll: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            welcome: true,
            scroll_offset: 0,
            auto_scroll: true,
        }
    }

    /// Append a turn and scroll the view to show it. Text is taken
    /// as-is; empty input is rejected upstream.
    pub fn append_turn(&mut self, text: &str, is_user: bool) {
        self.turns.push(ConversationTurn {
            text: text.to_string(),
            is_user,
        });
        self.auto_scroll = true;
    }

    /// Remove the one-time welcome placeholder if present.
    pub fn dismiss_welcome(&mut self) {
        self.welcome = false;
    }

    pub fn is_welcome(&self) -> bool {
        self.welcome && self.turns.is_empty()
    }

    /// Bulk reset back to the fixed welcome state.
    pub fn reset_to_welcome(&mut self) {
        self.turns.clear();
        self.welcome = true;
        self.scroll_offset = 0;
        self.auto_scroll = true;
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.auto_scroll = false;
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll_offset += lines;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.auto_scroll = true;
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll_offset = 0;
    }
}

/// Map a transport failure to user-facing guidance appended to the
/// transcript. The kind was decided once at the network boundary;
/// nothing here re-inspects message text.
pub fn failure_guidance(err: &ApiError) -> String {
    let mut message = String::from("Sorry, an error occurred while processing your request. ");
    match err {
        ApiError::Connect(_) | ApiError::Timeout(_) => {
            message.push_str(
                "There appears to be a network connection issue. \
                 Please check that the assistant service is reachable.",
            );
        }
        ApiError::Decode(_) => {
            message.push_str(
                "The server returned an invalid response. \
                 This might be due to API configuration issues.",
            );
        }
        _ => {
            message.push_str(
                "Please check if the server is running properly and try again. \
                 If you are running locally, ensure the GEMINI_API_KEY is set.",
            );
        }
    }
    message
}

pub struct ChatState {
    pub transcript: Transcript,
    input: InputBuffer,
    input_mode: ChatInputMode,
    busy: bool,
    spinner_tick: usize,
}

impl ChatState {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            input: InputBuffer::new(),
            input_mode: ChatInputMode::Normal,
            busy: false,
            spinner_tick: 0,
        }
    }

    pub fn input_mode(&self) -> ChatInputMode {
        self.input_mode
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Advance the busy spinner. Driven by the app tick.
    pub fn on_tick(&mut self) {
        if self.busy {
            self.spinner_tick = self.spinner_tick.wrapping_add(1);
        }
    }

    /// The single send path. Empty trimmed input is a silent no-op:
    /// no transcript change, no request.
    pub fn submit(&mut self, message: &str, services: &Services) {
        let message = message.trim();
        if message.is_empty() {
            return;
        }

        self.transcript.dismiss_welcome();
        // Optimistic: the user turn lands before the server answers.
        self.transcript.append_turn(message, true);
        self.busy = true;
        services.submit_chat(message.to_string());
    }

    /// Clear the busy indicator once the chat request resolves, either
    /// way. The caller routes the payload.
    pub fn finish_request(&mut self) {
        self.busy = false;
        self.spinner_tick = 0;
    }

    /// Returns true if the event was consumed (don't pass to the
    /// global handler).
    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match self.input_mode {
            ChatInputMode::Insert => self.handle_insert_input(*code, *modifiers, services),
            ChatInputMode::Normal => self.handle_normal_input(*code, *modifiers, services),
        }
    }

    fn handle_insert_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> bool {
        // These always fall through to the global handler
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return false,
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => return false,
            _ => {}
        }

        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.input_mode = ChatInputMode::Normal;
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter) => {
                if !self.input.is_empty() {
                    let text = self.input.take();
                    self.submit(&text, services);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => {
                self.input.backspace();
                true
            }
            (KeyModifiers::NONE, KeyCode::Delete) => {
                self.input.delete();
                true
            }
            (KeyModifiers::NONE, KeyCode::Left) => {
                self.input.move_left();
                true
            }
            (KeyModifiers::NONE, KeyCode::Right) => {
                self.input.move_right();
                true
            }
            (KeyModifiers::NONE, KeyCode::Home) => {
                self.input.move_home();
                true
            }
            (KeyModifiers::NONE, KeyCode::End) => {
                self.input.move_end();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                self.input.clear();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                self.input.move_home();
                true
            }
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                self.input.move_end();
                true
            }
            (_, KeyCode::Char(c)) => {
                self.input.insert_char(c);
                true
            }
            _ => true, // Consume but ignore other keys in insert mode
        }
    }

    fn handle_normal_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        services: &Services,
    ) -> bool {
        if modifiers != KeyModifiers::NONE && modifiers != KeyModifiers::SHIFT {
            return false;
        }

        match code {
            // Enter insert mode
            KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Enter => {
                self.input_mode = ChatInputMode::Insert;
                true
            }
            // Example-question shortcut: only while the welcome
            // placeholder is showing, same path as manual submission.
            KeyCode::Char(c @ '1'..='3') if self.transcript.is_welcome() => {
                let idx = (c as usize) - ('1' as usize);
                let question = EXAMPLE_QUESTIONS[idx].to_string();
                self.input.set_text(&question);
                let text = self.input.take();
                self.submit(&text, services);
                true
            }
            // Scroll
            KeyCode::Char('j') | KeyCode::Down => {
                self.transcript.scroll_down(1);
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.transcript.scroll_up(1);
                true
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.transcript.scroll_to_bottom();
                true
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.transcript.scroll_to_top();
                true
            }
            KeyCode::PageDown => {
                self.transcript.scroll_down(10);
                true
            }
            KeyCode::PageUp => {
                self.transcript.scroll_up(10);
                true
            }
            _ => false, // Fall through to global handler
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([
            Constraint::Min(1),    // Transcript
            Constraint::Length(3), // Input
        ])
        .split(area);

        self.render_transcript(frame, chunks[0]);
        self.render_input(frame, chunks[1]);
    }

    fn render_transcript(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::TEXT_MUTED))
            .title(" Conversation ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.transcript.is_welcome() {
            frame.render_widget(welcome_paragraph(), inner);
            return;
        }

        let width = inner.width.max(1) as usize;
        let all_lines: Vec<Line> = self
            .transcript
            .turns()
            .iter()
            .flat_map(|turn| turn_lines(turn, width))
            .collect();

        let visible_height = inner.height as usize;
        let total = all_lines.len();
        let max_scroll = total.saturating_sub(visible_height);
        let effective_scroll = if self.transcript.auto_scroll {
            max_scroll
        } else {
            self.transcript.scroll_offset.min(max_scroll)
        };

        let visible: Vec<Line> = all_lines
            .into_iter()
            .skip(effective_scroll)
            .take(visible_height)
            .collect();
        frame.render_widget(Paragraph::new(visible), inner);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let (border_color, title) = match self.input_mode {
            ChatInputMode::Insert => (theme::ACCENT, " Message (Esc to exit) "),
            ChatInputMode::Normal => (theme::TEXT_MUTED, " Message "),
        };

        let text = self.input.text();
        let cursor = self.input.cursor_position();

        let display = if text.is_empty() {
            Line::styled(
                "Ask about financial laws and regulations... (i to type)",
                Style::default().fg(theme::TEXT_MUTED),
            )
        } else if self.input_mode == ChatInputMode::Insert {
            let before = &text[..cursor];
            let cursor_char = text[cursor..]
                .chars()
                .next()
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after = if cursor < text.len() {
                &text[cursor + cursor_char.len()..]
            } else {
                ""
            };
            Line::from(vec![
                Span::raw(before.to_string()),
                Span::styled(
                    cursor_char,
                    Style::default().bg(theme::TEXT).fg(theme::BG_BASE),
                ),
                Span::raw(after.to_string()),
            ])
        } else {
            Line::raw(text.to_string())
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title);

        if self.busy {
            let frame_idx = self.spinner_tick % SPINNER_FRAMES.len();
            block = block.title_bottom(Line::styled(
                format!(" {} thinking... ", SPINNER_FRAMES[frame_idx]),
                Style::default().fg(theme::PRIMARY_LIGHT),
            ));
        }

        frame.render_widget(Paragraph::new(display).block(block), area);
    }
}

fn welcome_paragraph() -> Paragraph<'static> {
    let mut lines = vec![
        Line::raw(""),
        Line::styled(
            "  Welcome to the Financial Legal Assistant",
            Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
        ),
        Line::raw(""),
        Line::styled(
            "  Ask me any question about financial laws and regulations.",
            Style::default().fg(theme::TEXT)),
        Line::raw(""),
        Line::styled("  Try asking:", Style::default().fg(theme::TEXT_MUTED)),
    ];
    for (idx, question) in EXAMPLE_QUESTIONS.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("   [{}] ", idx + 1),
                Style::default().fg(theme::ACCENT),
            ),
            Span::styled(format!("\"{question}\""), Style::default().fg(theme::TEXT_MUTED)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "  Press i to type, 1-3 for an example question.",
        Style::default().fg(theme::TEXT_DIM),
    ));
    Paragraph::new(lines)
}

/// Header + wrapped body + trailing blank for one turn.
fn turn_lines(turn: &ConversationTurn, width: usize) -> Vec<Line<'static>> {
    let (label, color) = if turn.is_user {
        ("You", theme::SUCCESS)
    } else {
        ("Assistant", theme::PRIMARY_LIGHT)
    };

    let mut lines = vec![Line::from(Span::styled(
        format!("── {label} ──"),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];
    for row in wrap_text(&turn.text, width) {
        lines.push(Line::from(Span::styled(row, Style::default().fg(theme::TEXT))));
    }
    lines.push(Line::raw(""));
    lines
}

/// Greedy word wrap so transcript scroll math matches what is drawn.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(8);
    let mut rows = Vec::new();
    for source_line in text.lines() {
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= width {
                current.push(' ');
                current.push_str(word);
            } else {
                rows.push(current);
                current = word.to_string();
            }
        }
        rows.push(current);
    }
    if rows.is_empty() {
        rows.push(String::new());
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_append_order() {
        let mut transcript = Transcript::new();
        transcript.append_turn("first", true);
        transcript.append_turn("second", false);
        transcript.append_turn("third", true);

        let turns = transcript.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].text, "first");
        assert!(turns[0].is_user);
        assert_eq!(turns[1].text, "second");
        assert!(!turns[1].is_user);
        assert_eq!(turns[2].text, "third");
    }

    #[test]
    fn test_welcome_dismissed_by_first_turn() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_welcome());
        transcript.dismiss_welcome();
        transcript.append_turn("hello", true);
        assert!(!transcript.is_welcome());
    }

    #[test]
    fn test_reset_restores_welcome() {
        let mut transcript = Transcript::new();
        transcript.dismiss_welcome();
        transcript.append_turn("hello", true);
        transcript.append_turn("hi", false);
        transcript.reset_to_welcome();
        assert!(transcript.is_welcome());
        assert!(transcript.turns().is_empty());
    }

    #[test]
    fn test_append_resumes_auto_scroll() {
        let mut transcript = Transcript::new();
        transcript.append_turn("a", true);
        transcript.scroll_up(1);
        assert!(!transcript.auto_scroll);
        transcript.append_turn("b", false);
        assert!(transcript.auto_scroll);
    }

    #[test]
    fn test_guidance_connectivity() {
        let message = failure_guidance(&ApiError::Connect("refused".into()));
        assert!(message.contains("network connection issue"));
    }

    #[test]
    fn test_guidance_invalid_response() {
        let message = failure_guidance(&ApiError::Decode("eof".into()));
        assert!(message.contains("invalid response"));
    }

    #[test]
    fn test_guidance_generic_mentions_environment() {
        let message = failure_guidance(&ApiError::Status(500));
        assert!(message.contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let rows = wrap_text("one two three four five six seven eight", 12);
        assert!(rows.iter().all(|r| r.chars().count() <= 12));
        assert_eq!(rows.join(" "), "one two three four five six seven eight");
    }

    #[test]
    fn test_wrap_text_preserves_blank_lines() {
        let rows = wrap_text("a\n\nb", 20);
        assert_eq!(rows, vec!["a".to_string(), String::new(), "b".to_string()]);
    }
}
