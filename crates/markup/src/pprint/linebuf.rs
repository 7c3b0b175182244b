//! The output line being assembled.

/// Chars of the current output line plus the bookkeeping needed to break it.
#[derive(Debug, Default)]
pub(crate) struct LineBuffer {
    chars: Vec<char>,
    /// Indent the line is written with, fixed by its first char.
    indent: usize,
    /// Last safe break; `0` means none.
    wraphere: usize,
    /// Inside a string literal of a script attribute value.
    in_string: bool,
    /// `in_string` as it was at `wraphere`.
    wrap_in_string: bool,
    /// `wraphere` lies inside an attribute value.
    wrap_in_value: bool,
}

impl LineBuffer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn len(&self) -> usize {
        self.chars.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub(crate) fn indent(&self) -> usize {
        self.indent
    }

    pub(crate) fn push(&mut self, c: char, indent: usize) {
        if self.chars.is_empty() {
            self.indent = indent;
        }
        self.chars.push(c);
    }

    #[cfg(test)]
    pub(crate) fn push_str(&mut self, s: &str, indent: usize) {
        for c in s.chars() {
            self.push(c, indent);
        }
    }

    /// Mark the current end of the line as a place to break it.
    pub(crate) fn set_wraphere(&mut self, in_value: bool) {
        self.wraphere = self.chars.len();
        self.wrap_in_string = self.in_string;
        self.wrap_in_value = in_value;
    }

    pub(crate) fn can_wrap(&self) -> bool {
        self.wraphere > 0
    }

    pub(crate) fn set_in_string(&mut self, in_string: bool) {
        self.in_string = in_string;
    }

    /// Cut the line at its wrap point. Returns the indent and text to write;
    /// the rest stays buffered as a new line at `next_indent`.
    ///
    /// Leading spaces of the rest are dropped unless the break is inside an
    /// attribute value. A break inside a string literal ends with `\` and
    /// continues at column 1 so the literal's content is unchanged.
    pub(crate) fn split_at_wraphere(&mut self, next_indent: usize) -> (usize, String) {
        let mut head: String = self.chars[..self.wraphere].iter().collect();
        let mut rest = self.chars.split_off(self.wraphere);
        let indent = self.indent;

        if self.wrap_in_string {
            head.push('\\');
            self.indent = 0;
        } else {
            trim_trailing_spaces(&mut head);
            self.indent = next_indent;
            if !self.wrap_in_value {
                let skip = rest.iter().take_while(|&&c| c == ' ').count();
                rest.drain(..skip);
            }
        }
        self.chars = rest;
        self.wraphere = 0;
        self.wrap_in_string = false;
        self.wrap_in_value = false;
        (indent, head)
    }

    /// Take the whole line, leaving the buffer empty.
    pub(crate) fn take(&mut self, trim: bool) -> (usize, String) {
        let mut text: String = self.chars.drain(..).collect();
        if trim {
            trim_trailing_spaces(&mut text);
        }
        self.wraphere = 0;
        self.wrap_in_string = false;
        self.wrap_in_value = false;
        (self.indent, text)
    }
}

fn trim_trailing_spaces(text: &mut String) {
    let kept = text.trim_end_matches(' ').len();
    text.truncate(kept);
}
