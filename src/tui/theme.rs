//! Centralized Navy & Brass color theme for the FinLex TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::api::DocumentKind;

// ── Primary palette ─────────────────────────────────────────────────────────

/// Navy — primary accent, active items, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x2C, 0x4F, 0x8A);
/// Steel blue — highlights, hints, secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x5B, 0x84, 0xC4);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Brass — accent, calls to action, important items.
pub const ACCENT: Color = Color::Rgb(0xC9, 0xA2, 0x4B);

// ── Backgrounds ─────────────────────────────────────────────────────────────

/// Ink — base background.
pub const BG_BASE: Color = Color::Rgb(0x10, 0x14, 0x1C);
/// Surface — elevated panels, sidebar.
pub const BG_SURFACE: Color = Color::Rgb(0x18, 0x1E, 0x2A);

// ── Text ────────────────────────────────────────────────────────────────────

/// Primary text.
pub const TEXT: Color = Color::Rgb(0xE4, 0xE4, 0xE0);
/// Muted text — secondary labels, borders.
pub const TEXT_MUTED: Color = Color::Rgb(0x84, 0x88, 0x90);
/// Dim text — disabled items, faint hints.
pub const TEXT_DIM: Color = Color::Rgb(0x4E, 0x52, 0x5A);

// ── Semantic ────────────────────────────────────────────────────────────────

/// Error — failed requests, inline error panels.
pub const ERROR: Color = Color::Rgb(0xE5, 0x53, 0x4B);
/// Success — user turns, confirmations.
pub const SUCCESS: Color = Color::Rgb(0x6F, 0xBF, 0x73);
/// Info — informational placeholders.
pub const INFO: Color = Color::Rgb(0x4F, 0xA3, 0xE0);

// ── Relevance tiers ─────────────────────────────────────────────────────────

/// Relevance gauge fill, > 75%.
pub const RELEVANCE_HIGH: Color = Color::Rgb(0x6F, 0xBF, 0x73);
/// Relevance gauge fill, > 50%.
pub const RELEVANCE_MEDIUM: Color = Color::Rgb(0xC9, 0xA2, 0x4B);
/// Relevance gauge fill, > 25%.
pub const RELEVANCE_LOW: Color = Color::Rgb(0xE0, 0x8A, 0x3C);
/// Relevance gauge fill, bottom tier.
pub const RELEVANCE_VERY_LOW: Color = Color::Rgb(0xE5, 0x53, 0x4B);

// ── Style helpers ───────────────────────────────────────────────────────────

/// Accent-colored bold text (titles, active items).
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY_LIGHT).add_modifier(Modifier::BOLD)
}

/// Focused border style.
pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY_LIGHT)
}

/// Unfocused border style.
pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Muted label text.
pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

/// Inline error text.
pub fn error_text() -> Style {
    Style::default().fg(ERROR)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

/// Document-type badge. Each known category gets its own color;
/// unrecognized types fall back to the standard badge.
pub fn type_badge(kind: DocumentKind) -> Style {
    let fg = match kind {
        DocumentKind::Statute => Color::Rgb(0x9C, 0x6A, 0xD4),
        DocumentKind::Directive => Color::Rgb(0x4F, 0xA3, 0xE0),
        DocumentKind::Regulation => Color::Rgb(0xE0, 0x8A, 0x3C),
        DocumentKind::Standard => TEXT_MUTED,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block with focused styling.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

/// A bordered block with default (unfocused) styling.
pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}
