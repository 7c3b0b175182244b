//! Attribute sub-grammar for start tags.

use crate::arena::Span;
use crate::diag::{DiagnosticKind, DiagnosticSink};
use crate::lexer::chars::is_white;
use crate::lexer::{LexMode, Lexer};
use crate::token::{Attribute, EmbeddedCode, EmbeddedKind, Token};

/// Attributes whose unquoted values may legitimately end in `/`.
const URL_ATTRS: &[&str] = &[
    "action",
    "background",
    "cite",
    "classid",
    "codebase",
    "data",
    "href",
    "longdesc",
    "profile",
    "src",
    "usemap",
];

fn is_url_attr(name: &str) -> bool {
    URL_ATTRS.iter().any(|a| a.eq_ignore_ascii_case(name))
}

/// Whether whitespace in the value collapses. Text-bearing and script
/// attributes keep theirs.
fn munges_whitespace(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    !(matches!(lower.as_str(), "alt" | "title" | "value" | "prompt") || lower.starts_with("on"))
}

impl Lexer<'_> {
    /// Parse attributes up to the end of the tag, prepending each to
    /// `token.attrs`. Returns `true` when the tag ended with `/>`.
    pub(super) fn parse_attrs(&mut self, token: &mut Token, diag: &mut dyn DiagnosticSink) -> bool {
        loop {
            let Some(c) = self.read(diag) else {
                self.report(diag, DiagnosticKind::UnexpectedEof, "attributes");
                return false;
            };
            match c {
                '>' => return false,
                '/' => match self.read(diag) {
                    Some('>') => return true,
                    Some(n) => self.unread(n),
                    None => {}
                },
                '<' => match self.read(diag) {
                    Some('%') => self.parse_embedded(token, EmbeddedKind::Asp, "%>", diag),
                    Some('?') => self.parse_embedded(token, EmbeddedKind::Php, "?>", diag),
                    other => {
                        if let Some(n) = other {
                            self.unread(n);
                        }
                        self.unread('<');
                        self.report(diag, DiagnosticKind::MissingTagClose, "<");
                        return false;
                    }
                },
                '=' => self.report(diag, DiagnosticKind::UnexpectedEqualsSign, "="),
                '"' | '\'' => {
                    self.report(diag, DiagnosticKind::UnexpectedQuoteMark, &c.to_string());
                }
                c if is_white(c) => {}
                c => {
                    self.unread(c);
                    if let Some(attr) = self.parse_attribute(diag) {
                        token.attrs.insert(0, attr);
                    }
                }
            }
        }
    }

    fn parse_embedded(
        &mut self,
        token: &mut Token,
        kind: EmbeddedKind,
        term: &str,
        diag: &mut dyn DiagnosticSink,
    ) {
        let start = self.text.len();
        loop {
            if self.text.tail(start).ends_with(term) {
                let end = self.text.len() - term.len();
                self.text.truncate(end);
                break;
            }
            let Some(c) = self.read(diag) else {
                self.report(diag, DiagnosticKind::UnexpectedEof, term);
                break;
            };
            self.text.push(c);
        }
        token.attrs.insert(
            0,
            Attribute {
                name: None,
                value: None,
                delimiter: None,
                code: Some(EmbeddedCode {
                    kind,
                    span: self.text.span_from(start),
                }),
            },
        );
    }

    fn parse_attribute(&mut self, diag: &mut dyn DiagnosticSink) -> Option<Attribute> {
        let mut name = String::new();
        while let Some(c) = self.read(diag) {
            if c == '/' {
                match self.read(diag) {
                    Some('>') => {
                        self.unread('>');
                        self.unread('/');
                        break;
                    }
                    Some(n) => self.unread(n),
                    None => {}
                }
                name.push(c);
                continue;
            }
            if is_white(c) || matches!(c, '=' | '>' | '<' | '"' | '\'') {
                self.unread(c);
                break;
            }
            name.push(c);
        }
        if name.is_empty() {
            // Only reachable on a lone `/` the caller already skipped.
            return None;
        }
        if !self.xml() {
            name.make_ascii_lowercase();
        }
        let atom = self.intern(&name)?;
        let (value, delimiter) = match self.parse_value(&name, diag) {
            Some((span, delimiter)) => (Some(span), delimiter),
            None => (None, None),
        };
        Some(Attribute {
            name: Some(atom),
            value,
            delimiter,
            code: None,
        })
    }

    fn skip_white(&mut self, diag: &mut dyn DiagnosticSink) -> Option<char> {
        loop {
            let c = self.read(diag)?;
            if !is_white(c) {
                return Some(c);
            }
        }
    }

    fn parse_value(
        &mut self,
        name: &str,
        diag: &mut dyn DiagnosticSink,
    ) -> Option<(Span, Option<char>)> {
        let c = self.skip_white(diag)?;
        if c != '=' {
            self.unread(c);
            return None;
        }
        let start = self.text.len();
        let Some(c) = self.skip_white(diag) else {
            self.report(diag, DiagnosticKind::UnexpectedEof, name);
            return Some((self.text.span_from(start), None));
        };
        let is_id = name.eq_ignore_ascii_case("id");

        if c == '"' || c == '\'' {
            self.parse_quoted_value(name, c, is_id, diag);
            return Some((self.text.span_from(start), Some(c)));
        }

        if c == '>' {
            self.unread(c);
            return Some((self.text.span_from(start), None));
        }

        let url = is_url_attr(name);
        let mut next = Some(c);
        while let Some(c) = next {
            match c {
                c if is_white(c) => break,
                '>' | '<' => {
                    self.unread(c);
                    break;
                }
                '/' if !url => match self.read(diag) {
                    Some('>') => {
                        self.unread('>');
                        self.unread('/');
                        break;
                    }
                    other => {
                        if let Some(n) = other {
                            self.unread(n);
                        }
                        self.text.push('/');
                    }
                },
                '&' if is_id => self.report(diag, DiagnosticKind::AmpersandInId, name),
                '&' => self.parse_entity(LexMode::MixedContent, diag),
                c => self.text.push(c),
            }
            next = self.read(diag);
        }
        Some((self.text.span_from(start), None))
    }

    fn parse_quoted_value(
        &mut self,
        name: &str,
        delimiter: char,
        is_id: bool,
        diag: &mut dyn DiagnosticSink,
    ) {
        let start = self.text.len();
        let munge = munges_whitespace(name);
        let mut suspicious = 0usize;
        let mut waswhite = false;

        loop {
            let Some(c) = self.read(diag) else {
                self.report(diag, DiagnosticKind::UnexpectedEof, name);
                break;
            };
            if c == delimiter {
                break;
            }
            if matches!(c, '<' | '>' | '\n') {
                suspicious += 1;
            }
            if c == '&' {
                waswhite = false;
                if is_id {
                    self.report(diag, DiagnosticKind::AmpersandInId, name);
                } else {
                    self.parse_entity(LexMode::MixedContent, diag);
                }
                continue;
            }
            if munge && is_white(c) {
                if waswhite || self.text.len() == start {
                    continue;
                }
                waswhite = true;
                self.text.push(' ');
                continue;
            }
            waswhite = false;
            self.text.push(c);
        }

        if munge && waswhite {
            let end = self.text.len() - 1;
            self.text.truncate(end);
        }
        if suspicious > self.config.tunables.missing_quote_threshold {
            self.report(diag, DiagnosticKind::SuspectedMissingQuote, name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_and_munge_classes() {
        assert!(is_url_attr("HREF"));
        assert!(!is_url_attr("class"));
        assert!(!munges_whitespace("alt"));
        assert!(!munges_whitespace("onclick"));
        assert!(munges_whitespace("class"));
    }
}
