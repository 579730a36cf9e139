//! Root layout computation for main content + references sidebar +
//! status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the references sidebar.
pub const SIDEBAR_WIDTH: u16 = 42;
/// Suppress the sidebar below this terminal width even when it is
/// logically shown.
pub const SIDEBAR_MIN_TERMINAL_WIDTH: u16 = 70;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Main content area (transcript, search, or document view).
    pub main: Rect,
    /// References sidebar (None while hidden).
    pub sidebar: Option<Rect>,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    /// Compute layout regions from the terminal area.
    ///
    /// `sidebar_shown` is the logical visibility (auto-revealed on
    /// references, hidden on clear, user-toggleable); on narrow
    /// terminals the sidebar is suppressed regardless.
    pub fn compute(area: Rect, sidebar_shown: bool) -> Self {
        let rows = Layout::vertical([
            Constraint::Min(1),    // Content (main + sidebar)
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        let content_area = rows[0];
        let status = rows[1];

        if sidebar_shown && area.width >= SIDEBAR_MIN_TERMINAL_WIDTH {
            let cols = Layout::horizontal([
                Constraint::Min(1),
                Constraint::Length(SIDEBAR_WIDTH),
            ])
            .split(content_area);
            AppLayout {
                main: cols[0],
                sidebar: Some(cols[1]),
                status,
            }
        } else {
            AppLayout {
                main: content_area,
                sidebar: None,
                status,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidebar_hidden() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = AppLayout::compute(area, false);
        assert!(layout.sidebar.is_none());
        assert_eq!(layout.main.width, 120);
        assert_eq!(layout.status.height, 1);
    }

    #[test]
    fn test_sidebar_shown() {
        let area = Rect::new(0, 0, 120, 40);
        let layout = AppLayout::compute(area, true);
        assert_eq!(layout.sidebar.unwrap().width, SIDEBAR_WIDTH);
    }

    #[test]
    fn test_sidebar_suppressed_on_narrow_terminal() {
        let area = Rect::new(0, 0, 60, 40);
        let layout = AppLayout::compute(area, true);
        assert!(layout.sidebar.is_none());
        assert_eq!(layout.main.width, 60);
    }

    #[test]
    fn test_main_plus_sidebar_fills_width() {
        let area = Rect::new(0, 0, 100, 30);
        let layout = AppLayout::compute(area, true);
        let sidebar_w = layout.sidebar.map(|s| s.width).unwrap_or(0);
        assert_eq!(sidebar_w + layout.main.width, area.width);
    }
}
