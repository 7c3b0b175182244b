//! Character stream over encoded bytes.
//!
//! Sits between the codec and the lexer: normalizes line breaks, expands
//! tabs, strips control characters, sniffs a byte order mark and keeps the
//! source position. A small pushback stack lets the lexer look ahead.

use charcodec::{Bom, CodecError, Decoder, Encoding, REPLACEMENT, ReplacementPolicy, remap_vendor};

use crate::config::Config;
use crate::diag::{DiagnosticKind, DiagnosticSink};

/// Characters that can be pushed back at once.
pub const PUSHBACK_CAPACITY: usize = 8;

const ESC: char = '\u{1b}';
const FORM_FEED: char = '\u{0c}';

/// 1-based source position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const START: Position = Position { line: 1, column: 1 };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

pub struct InputStream {
    bytes: Vec<u8>,
    offset: usize,
    decoder: Decoder,
    configured: Encoding,
    tab_size: usize,
    xml: bool,
    replacement: ReplacementPolicy,
    position: Position,
    tabs: usize,
    /// Pushed-back chars with the position to restore when re-read.
    pushback: Vec<(char, Position)>,
    /// Positions before the most recently returned chars.
    history: Vec<Position>,
    bom_checked: bool,
}

impl InputStream {
    pub fn new(bytes: Vec<u8>, config: &Config) -> Self {
        Self {
            bytes,
            offset: 0,
            decoder: Decoder::new(config.input_encoding),
            configured: config.input_encoding,
            tab_size: config.tab_size.max(1),
            xml: config.xml_tags,
            replacement: config.replacement,
            position: Position::START,
            tabs: 0,
            pushback: Vec::with_capacity(PUSHBACK_CAPACITY),
            history: Vec::with_capacity(PUSHBACK_CAPACITY),
            bom_checked: false,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Encoding in effect, which a byte order mark may have changed.
    pub fn encoding(&self) -> Encoding {
        self.decoder.encoding()
    }

    /// Next character, or `None` at end of input.
    pub fn next(&mut self, diag: &mut dyn DiagnosticSink) -> Option<char> {
        let before = self.position;
        let ch = self.read(diag)?;
        if self.history.len() == PUSHBACK_CAPACITY {
            self.history.remove(0);
        }
        self.history.push(before);
        Some(ch)
    }

    /// Push `ch` back so the next [`InputStream::next`] returns it again.
    pub fn unget(&mut self, ch: char) {
        if self.pushback.len() >= PUSHBACK_CAPACITY {
            log::error!(target: "markup.stream", "pushback overflow, dropping {ch:?}");
            debug_assert!(false, "pushback overflow");
            return;
        }
        let after = self.position;
        if let Some(before) = self.history.pop() {
            self.position = before;
        }
        self.pushback.push((ch, after));
    }

    fn read(&mut self, diag: &mut dyn DiagnosticSink) -> Option<char> {
        if let Some((ch, after)) = self.pushback.pop() {
            self.position = after;
            return Some(ch);
        }
        if self.tabs > 0 {
            self.tabs -= 1;
            self.position.column += 1;
            return Some(' ');
        }
        if !self.bom_checked {
            self.bom_checked = true;
            if let Some(ch) = self.check_bom(diag) {
                return Some(ch);
            }
        }

        loop {
            let ch = self.decode_next(diag)?;
            match ch {
                '\n' => return Some(self.line_break()),
                '\r' => {
                    self.skip_following_lf();
                    return Some(self.line_break());
                }
                '\t' => {
                    let col = self.position.column as usize;
                    self.tabs = self.tab_size - ((col - 1) % self.tab_size) - 1;
                    self.position.column += 1;
                    return Some(' ');
                }
                ESC => {}
                FORM_FEED if !self.xml => {}
                c if (c as u32) < 0x20 => continue,
                c if (0x80..=0x9F).contains(&(c as u32)) && !self.encoding().decodes_c1_range() => {
                    match self.remap_c1(c, diag) {
                        Some(c) => {
                            self.position.column += 1;
                            return Some(c);
                        }
                        None => continue,
                    }
                }
                _ => {}
            }
            self.position.column += 1;
            return Some(ch);
        }
    }

    fn line_break(&mut self) -> char {
        self.position.line += 1;
        self.position.column = 1;
        '\n'
    }

    fn skip_following_lf(&mut self) {
        let Some(rest) = self.bytes.get(self.offset..).filter(|r| !r.is_empty()) else {
            return;
        };
        let mut probe = self.decoder.clone();
        let d = probe.decode(rest);
        if d.ch == '\n' && d.error.is_none() {
            self.offset += d.consumed;
            self.decoder = probe;
        }
    }

    fn decode_next(&mut self, diag: &mut dyn DiagnosticSink) -> Option<char> {
        loop {
            let rest = self.bytes.get(self.offset..).filter(|r| !r.is_empty())?;
            let d = self.decoder.decode(rest);
            self.offset += d.consumed.max(1);
            let Some(err) = d.error else {
                return Some(d.ch);
            };
            self.report_codec_error(&err, diag);
            if self.replacement == ReplacementPolicy::Discard {
                continue;
            }
            return Some(d.ch);
        }
    }

    fn report_codec_error(&self, err: &CodecError, diag: &mut dyn DiagnosticSink) {
        let kind = match err {
            CodecError::InvalidUtf8 { .. } => DiagnosticKind::InvalidUtf8,
            CodecError::InvalidUtf16(_) => DiagnosticKind::InvalidUtf16,
            CodecError::UnmappedByte(_) | CodecError::Unencodable { .. } => {
                DiagnosticKind::UnmappedChar
            }
        };
        let Position { line, column } = self.position;
        diag.push(kind, line, column, &err.to_string());
    }

    fn remap_c1(&mut self, c: char, diag: &mut dyn DiagnosticSink) -> Option<char> {
        let Position { line, column } = self.position;
        let code = format!("U+{:04X}", c as u32);
        if let Some(mapped) = remap_vendor(c as u32, self.encoding()) {
            diag.push(DiagnosticKind::VendorSpecificChar, line, column, &code);
            return Some(mapped);
        }
        diag.push(DiagnosticKind::InvalidSgmlChar, line, column, &code);
        match self.replacement {
            ReplacementPolicy::Discard => None,
            ReplacementPolicy::Substitute => Some(REPLACEMENT),
        }
    }

    fn check_bom(&mut self, diag: &mut dyn DiagnosticSink) -> Option<char> {
        if !self.configured.is_unicode() {
            return None;
        }
        let bom = Bom::sniff(&self.bytes[self.offset..])?;
        self.offset += bom.len();
        if !self.configured.accepts_bom(bom) {
            let Position { line, column } = self.position;
            let context = format!("configured {}, found {}", self.configured, bom.encoding());
            diag.push(DiagnosticKind::EncodingMismatch, line, column, &context);
        }
        self.decoder.apply_bom(bom);
        Some(charcodec::BYTE_ORDER_MARK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Diagnostics;

    fn stream(bytes: &[u8]) -> InputStream {
        InputStream::new(bytes.to_vec(), &Config::default())
    }

    fn read_all(s: &mut InputStream, diag: &mut Diagnostics) -> String {
        let mut out = String::new();
        while let Some(ch) = s.next(diag) {
            out.push(ch);
        }
        out
    }

    #[test]
    fn normalizes_every_line_break_style() {
        let mut diag = Diagnostics::default();
        let mut s = stream(b"a\r\nb\rc\nd");
        assert_eq!(read_all(&mut s, &mut diag), "a\nb\nc\nd");
        assert_eq!(s.position(), Position { line: 4, column: 2 });
        assert!(diag.is_empty());
    }

    #[test]
    fn crlf_counts_one_line() {
        let mut diag = Diagnostics::default();
        let mut s = stream(b"\r\n\r\n");
        assert_eq!(read_all(&mut s, &mut diag), "\n\n");
        assert_eq!(s.position().line, 3);
    }

    #[test]
    fn tab_expands_to_next_stop() {
        let mut diag = Diagnostics::default();
        let mut s = stream(b"ab\tc");
        assert_eq!(read_all(&mut s, &mut diag), "ab      c");
        // `c` sits at column 9, the next stop after 1.
        assert_eq!(s.position().column, 10);
    }

    #[test]
    fn tab_width_is_configurable() {
        let mut diag = Diagnostics::default();
        let config = Config {
            tab_size: 4,
            ..Config::default()
        };
        let mut s = InputStream::new(b"\tx".to_vec(), &config);
        assert_eq!(read_all(&mut s, &mut diag), "    x");

        // A tab at column 3 fills two columns; `x` lands on column 5.
        let mut s = InputStream::new(b"ab\tx".to_vec(), &config);
        assert_eq!(s.position(), Position::START);
        let mut columns = Vec::new();
        let mut text = String::new();
        while let Some(c) = s.next(&mut diag) {
            text.push(c);
            columns.push(s.position().column);
        }
        assert_eq!(text, "ab  x");
        assert_eq!(columns, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn newline_resets_column_to_one() {
        let mut diag = Diagnostics::default();
        let mut s = stream(b"abc
d");
        for _ in 0..4 {
            s.next(&mut diag);
        }
        assert_eq!(s.position(), Position { line: 2, column: 1 });
        assert_eq!(s.next(&mut diag), Some('d'));
        assert_eq!(s.position(), Position { line: 2, column: 2 });
    }

    #[test]
    fn strips_controls_but_keeps_esc_and_form_feed() {
        let mut diag = Diagnostics::default();
        let mut s = stream(b"a\x01\x1b\x0cb");
        assert_eq!(read_all(&mut s, &mut diag), "a\u{1b}\u{0c}b");

        let config = Config {
            xml_tags: true,
            ..Config::default()
        };
        let mut s = InputStream::new(b"a\x0cb".to_vec(), &config);
        assert_eq!(read_all(&mut s, &mut diag), "ab");
    }

    #[test]
    fn c1_chars_are_vendor_remapped() {
        let mut diag = Diagnostics::default();
        // U+0093 encoded as UTF-8.
        let mut s = stream(&[0xC2, 0x93, b'x', 0xC2, 0x81]);
        assert_eq!(read_all(&mut s, &mut diag), "\u{201C}x\u{FFFD}");
        assert!(diag.contains(DiagnosticKind::VendorSpecificChar));
        assert!(diag.contains(DiagnosticKind::InvalidSgmlChar));
    }

    #[test]
    fn c1_chars_discarded_under_discard_policy() {
        let mut diag = Diagnostics::default();
        let config = Config {
            replacement: ReplacementPolicy::Discard,
            ..Config::default()
        };
        let mut s = InputStream::new(vec![b'a', 0xC2, 0x81, b'b'], &config);
        assert_eq!(read_all(&mut s, &mut diag), "ab");
    }

    #[test]
    fn win1252_input_is_not_remapped_twice() {
        let mut diag = Diagnostics::default();
        let config = Config {
            input_encoding: Encoding::Win1252,
            ..Config::default()
        };
        let mut s = InputStream::new(vec![0x93], &config);
        assert_eq!(read_all(&mut s, &mut diag), "\u{201C}");
        assert!(diag.is_empty());
    }

    #[test]
    fn invalid_utf8_is_reported_with_position() {
        let mut diag = Diagnostics::default();
        let mut s = stream(b"ab\xFFc");
        assert_eq!(read_all(&mut s, &mut diag), "ab\u{FFFD}c");
        let d = &diag.items()[0];
        assert_eq!(d.kind, DiagnosticKind::InvalidUtf8);
        assert_eq!((d.line, d.column), (1, 3));
    }

    #[test]
    fn utf8_bom_is_returned_once() {
        let mut diag = Diagnostics::default();
        let mut s = stream(b"\xEF\xBB\xBFhi");
        assert_eq!(read_all(&mut s, &mut diag), "\u{FEFF}hi");
        assert!(diag.is_empty());
    }

    #[test]
    fn utf16_bom_overrides_configured_utf8() {
        let mut diag = Diagnostics::default();
        let mut s = stream(&[0xFF, 0xFE, b'h', 0, b'\r', 0, b'\n', 0]);
        assert_eq!(read_all(&mut s, &mut diag), "\u{FEFF}h\n");
        assert_eq!(s.encoding(), Encoding::Utf16Le);
        assert!(diag.contains(DiagnosticKind::EncodingMismatch));
    }

    #[test]
    fn unget_restores_char_and_position() {
        let mut diag = Diagnostics::default();
        let mut s = stream(b"ab\ncd");
        assert_eq!(s.next(&mut diag), Some('a'));
        let b = s.next(&mut diag).unwrap();
        let nl = s.next(&mut diag).unwrap();
        assert_eq!(s.position(), Position { line: 2, column: 1 });
        s.unget(nl);
        s.unget(b);
        assert_eq!(s.position(), Position { line: 1, column: 2 });
        assert_eq!(s.next(&mut diag), Some('b'));
        assert_eq!(s.next(&mut diag), Some('\n'));
        assert_eq!(s.position(), Position { line: 2, column: 1 });
        assert_eq!(read_all(&mut s, &mut diag), "cd");
    }

    #[test]
    fn end_of_stream_is_none_not_error() {
        let mut diag = Diagnostics::default();
        let mut s = stream(b"");
        assert_eq!(s.next(&mut diag), None);
        assert_eq!(s.next(&mut diag), None);
    }
}
