//! Feed screen: post list, composer, pagination triggers.

mod render;
mod update;

pub use render::render_feed;
pub(crate) use render::post_heading;
pub use update::{feed_task_kind, handle_feed_event, handle_feed_key, start_fetch};

/// Single-line post composer.
#[derive(Debug, Default)]
pub struct Composer {
    pub text: String,
    /// Byte offset of the cursor (always on a char boundary).
    pub cursor: usize,
    /// Visible publish failure, cleared on the next edit.
    pub error: Option<String>,
}

impl Composer {
    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.error = None;
    }

    pub fn backspace(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.text.remove(idx);
            self.cursor = idx;
        }
    }

    pub fn move_left(&mut self) {
        if let Some((idx, _)) = self.text[..self.cursor].char_indices().next_back() {
            self.cursor = idx;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(c) = self.text[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.error = None;
    }
}

/// Feed screen presentation state.
#[derive(Debug, Default)]
pub struct FeedView {
    /// Index of the first visible post.
    pub scroll: usize,
    /// Posts that fit the list area; set during render, read by the
    /// reducer to decide when scroll reached the end.
    pub list_rows: std::cell::Cell<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: composer editing keeps the cursor on char boundaries.
    #[test]
    fn test_composer_multibyte_editing() {
        let mut composer = Composer::default();
        for c in "olá".chars() {
            composer.insert(c);
        }
        assert_eq!(composer.text, "olá");

        composer.move_left();
        composer.backspace();
        assert_eq!(composer.text, "oá");

        composer.move_right();
        composer.insert('!');
        assert_eq!(composer.text, "oá!");

        composer.clear();
        assert_eq!(composer.cursor, 0);
        assert!(composer.text.is_empty());
    }
}
