//! Single-line text input with cursor management, shared by the chat
//! prompt and the search bar.

/// A text input buffer. The cursor is a byte offset that always sits
/// on a char boundary.
#[derive(Default)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole buffer (used by the example-question
    /// shortcut) and put the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.content = text.to_string();
        self.cursor = self.content.len();
    }

    pub fn insert_char(&mut self, c: char) {
        self.content.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.content.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.content.len() {
            let next = self.next_boundary();
            self.content.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.content.len() {
            self.cursor = self.next_boundary();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.content.len();
    }

    /// Take the content out, resetting the buffer.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Whitespace-only input counts as empty; submission handlers
    /// treat it as a no-op.
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }

    pub fn text(&self) -> &str {
        &self.content
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.content[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.content[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.content.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor() {
        let mut buf = InputBuffer::new();
        buf.insert_char('o');
        buf.insert_char('k');
        assert_eq!(buf.text(), "ok");
        assert_eq!(buf.cursor_position(), 2);
    }

    #[test]
    fn test_backspace_multibyte() {
        let mut buf = InputBuffer::new();
        buf.insert_char('§');
        buf.insert_char('5');
        buf.backspace();
        assert_eq!(buf.text(), "§");
        buf.backspace();
        assert!(buf.text().is_empty());
        buf.backspace(); // at start of buffer, no-op
        assert_eq!(buf.cursor_position(), 0);
    }

    #[test]
    fn test_movement_stays_on_boundaries() {
        let mut buf = InputBuffer::new();
        buf.set_text("a§b");
        buf.move_home();
        buf.move_right();
        assert_eq!(buf.cursor_position(), 1);
        buf.move_right();
        assert_eq!(buf.cursor_position(), 3);
        buf.move_left();
        assert_eq!(buf.cursor_position(), 1);
    }

    #[test]
    fn test_set_text_places_cursor_at_end() {
        let mut buf = InputBuffer::new();
        buf.set_text("What is Basel III?");
        assert_eq!(buf.cursor_position(), buf.text().len());
    }

    #[test]
    fn test_take_resets() {
        let mut buf = InputBuffer::new();
        buf.set_text("q");
        let text = buf.take();
        assert_eq!(text, "q");
        assert!(buf.text().is_empty());
        assert_eq!(buf.cursor_position(), 0);
    }

    #[test]
    fn test_is_empty_trims() {
        let mut buf = InputBuffer::new();
        assert!(buf.is_empty());
        buf.insert_char(' ');
        assert!(buf.is_empty()); // whitespace-only is "empty"
        buf.insert_char('a');
        assert!(!buf.is_empty());
    }
}
