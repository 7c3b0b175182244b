//! Append-only text storage for one document.

/// Byte span into a [`TextArena`].
///
/// Invariant: `start <= end`, both on char boundaries of the arena that
/// produced the span, and `end <= arena.len()` for as long as the span is live.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }
}

/// Decoded text of a document.
///
/// Grows monotonically except for [`TextArena::truncate`], which shrinks the
/// logical length (for entity repair) but keeps the allocation.
#[derive(Clone, Debug, Default)]
pub struct TextArena {
    text: String,
}

impl TextArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            text: String::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Shrink to `len` bytes. `len` must be a char boundary not past the end.
    pub fn truncate(&mut self, len: usize) {
        debug_assert!(len <= self.text.len(), "arena can only shrink");
        self.text.truncate(len);
    }

    /// Span from `start` to the current end.
    pub fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.text.len())
    }

    /// Text for `span`; empty when the span is stale or out of range.
    pub fn slice(&self, span: Span) -> &str {
        self.text.get(span.start..span.end).unwrap_or("")
    }

    /// Everything from `start` to the end.
    pub fn tail(&self, start: usize) -> &str {
        self.text.get(start..).unwrap_or("")
    }

    pub fn last_char(&self) -> Option<char> {
        self.text.chars().next_back()
    }

    /// Overwrite an ASCII byte in place with another ASCII byte.
    pub fn set_ascii(&mut self, pos: usize, byte: u8) {
        debug_assert!(byte.is_ascii());
        if !byte.is_ascii() || !self.text.is_char_boundary(pos) {
            return;
        }
        let Some(current) = self.text[pos..].chars().next() else {
            return;
        };
        if current.is_ascii() {
            self.text
                .replace_range(pos..pos + 1, char::from(byte).encode_utf8(&mut [0u8; 4]));
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
