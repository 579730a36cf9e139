//! Central application state and event loop (Elm architecture).
//!
//! `AppState` is the session controller: it owns the busy flag and
//! routing of completed requests, wires the clear operation, and
//! dispatches input to whichever panel has focus. All state mutation
//! happens here, on the single event-processing task.

use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::api::ApiError;

use super::events::{Action, AppEvent, AreaFocus, Focus};
use super::layout::AppLayout;
use super::services::Services;
use super::theme;
use super::views::chat::{self, ChatState};
use super::views::document::DocumentState;
use super::views::references::{ReferenceAction, ReferencesState};
use super::views::search::{SearchAction, SearchState};

pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused main view.
    pub focus: Focus,
    /// Whether the main content or the references sidebar has input
    /// focus.
    pub area_focus: AreaFocus,
    /// Logical sidebar visibility: auto-revealed when a response
    /// carries references, hidden by clear, user-toggleable.
    pub sidebar_shown: bool,
    /// Chat view state (transcript + prompt + busy flag).
    pub chat: ChatState,
    /// References sidebar state.
    pub references: ReferencesState,
    /// Document viewer state.
    pub document: DocumentState,
    /// Search view state.
    pub search: SearchState,
    /// Receiver for request completions and internal events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        Self {
            running: true,
            focus: Focus::Chat,
            area_focus: AreaFocus::Main,
            sidebar_shown: false,
            chat: ChatState::new(),
            references: ReferencesState::new(),
            document: DocumentState::new(),
            search: SearchState::new(),
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.handle_event(AppEvent::Tick);
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: references sidebar when it has focus
                if self.area_focus == AreaFocus::Sidebar && self.sidebar_shown {
                    match self.references.handle_input(&crossterm_event) {
                        Some(ReferenceAction::Consumed) => return,
                        Some(ReferenceAction::Open(id)) => {
                            self.open_document(id);
                            return;
                        }
                        Some(ReferenceAction::Close) => {
                            self.area_focus = AreaFocus::Main;
                            return;
                        }
                        None => {}
                    }
                }

                // Priority 2: focused view
                if self.dispatch_view_input(&crossterm_event) {
                    return;
                }

                // Priority 3: global keybindings
                if let Some(action) = self.map_input_to_action(crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.chat.on_tick(),
            AppEvent::ChatCompleted(result) => self.on_chat_completed(result),
            AppEvent::ClearCompleted(result) => self.on_clear_completed(result),
            AppEvent::SearchCompleted(result) => self.search.on_completed(result),
            AppEvent::DocumentLoaded { token, result } => {
                self.document.on_loaded(token, result);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    /// Route a finished chat request to the transcript and, on
    /// success, the references panel.
    fn on_chat_completed(&mut self, result: Result<crate::api::ChatReply, ApiError>) {
        self.chat.finish_request();

        match result {
            Ok(reply) => {
                self.chat.transcript.append_turn(&reply.response, false);
                // References are replaced wholesale; the sidebar
                // auto-reveals only for a non-empty set.
                if !reply.references.is_empty() {
                    self.sidebar_shown = true;
                }
                self.references.set_references(reply.references);
            }
            Err(ApiError::App(message)) => {
                self.chat
                    .transcript
                    .append_turn(&format!("Error: {message}"), false);
            }
            Err(err) => {
                log::error!("Chat request failed: {err}");
                self.chat
                    .transcript
                    .append_turn(&chat::failure_guidance(&err), false);
            }
        }
    }

    /// Reset all panels together on a confirmed clear. Any failure
    /// leaves every panel untouched, logged only.
    fn on_clear_completed(&mut self, result: Result<crate::api::ClearReply, ApiError>) {
        match result {
            Ok(reply) if reply.status == "success" => {
                self.chat.transcript.reset_to_welcome();
                self.references.reset();
                self.document.reset();
                self.sidebar_shown = false;
                self.area_focus = AreaFocus::Main;
                self.focus = Focus::Chat;
            }
            Ok(reply) => {
                log::warn!("Clear rejected by server: status {:?}", reply.status);
            }
            Err(err) => {
                log::error!("Error clearing chat: {err}");
            }
        }
    }

    /// Dispatch input to the currently focused view. Returns true if
    /// consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match self.focus {
            Focus::Chat => self.chat.handle_input(event, &self.services),
            Focus::Search => match self.search.handle_input(event, &self.services) {
                Some(SearchAction::Consumed) => true,
                Some(SearchAction::Open(id)) => {
                    self.open_document(id);
                    true
                }
                None => false,
            },
            Focus::Document => self.document.handle_input(event),
        }
    }

    /// Start a document load and bring the viewer to the front.
    fn open_document(&mut self, id: String) {
        log::info!("Loading document with id: {id}");
        let token = self.document.begin_load(&id);
        self.services.load_document(id, token);
        self.focus = Focus::Document;
        self.area_focus = AreaFocus::Main;
    }

    fn map_input_to_action(&self, event: Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (modifiers, code) {
            // Ctrl+B → toggle references sidebar
            (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(Action::ToggleSidebar),
            // Ctrl+L → clear conversation
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => Some(Action::ClearConversation),
            // Ctrl+C → quit
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, _) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                KeyCode::Char('c') => Some(Action::FocusChat),
                KeyCode::Char('s') => Some(Action::FocusSearch),
                KeyCode::Char('d') => Some(Action::FocusDocument),
                KeyCode::Char('r') => {
                    if self.sidebar_shown {
                        Some(Action::FocusReferences)
                    } else {
                        None
                    }
                }
                _ => None,
            },
            _ => None,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusChat => {
                self.focus = Focus::Chat;
                self.area_focus = AreaFocus::Main;
            }
            Action::FocusSearch => {
                self.focus = Focus::Search;
                self.area_focus = AreaFocus::Main;
            }
            Action::FocusDocument => {
                self.focus = Focus::Document;
                self.area_focus = AreaFocus::Main;
            }
            Action::TabNext => {
                self.focus = self.focus.next();
                self.area_focus = AreaFocus::Main;
            }
            Action::TabPrev => {
                self.focus = self.focus.prev();
                self.area_focus = AreaFocus::Main;
            }
            Action::ToggleSidebar => {
                self.sidebar_shown = !self.sidebar_shown;
                self.area_focus = if self.sidebar_shown {
                    AreaFocus::Sidebar
                } else {
                    AreaFocus::Main
                };
            }
            Action::FocusReferences => {
                self.sidebar_shown = true;
                self.area_focus = AreaFocus::Sidebar;
            }
            Action::ClearConversation => {
                log::info!("Clearing conversation");
                self.services.clear_chat();
            }
            Action::OpenDocument(id) => self.open_document(id),
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&mut self, frame: &mut Frame) {
        let layout = AppLayout::compute(frame.area(), self.sidebar_shown);

        match self.focus {
            Focus::Chat => self.chat.render(frame, layout.main),
            Focus::Search => self.search.render(frame, layout.main, true),
            Focus::Document => self.document.render(frame, layout.main, true),
        }

        if let Some(sidebar_area) = layout.sidebar {
            self.references
                .render(frame, sidebar_area, self.area_focus == AreaFocus::Sidebar);
        }

        self.render_status_bar(frame, layout.status);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" FinLex ", theme::brand_badge()),
            Span::raw(" "),
        ];

        for focus in Focus::ALL {
            let style = if focus == self.focus {
                theme::highlight()
            } else {
                theme::key_hint()
            };
            spans.push(Span::styled(format!(" {} ", focus.label()), style));
        }

        if self.chat.is_busy() {
            spans.push(Span::styled(" working... ", Style::default().fg(theme::PRIMARY_LIGHT)));
        }

        spans.push(Span::styled(
            "  Tab:views  Ctrl+B:references  Ctrl+L:clear  q:quit",
            theme::key_hint(),
        ));

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }
}
