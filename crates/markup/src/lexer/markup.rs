//! Comments, declarations, processing instructions and server code.
//!
//! Each handler runs with the arena truncated to the construct's `<` and
//! collects the construct's text from there.

use crate::arena::Span;
use crate::diag::{DiagnosticKind, DiagnosticSink};
use crate::lexer::chars::is_white;
use crate::lexer::doctype;
use crate::lexer::states::{LexState, Step};
use crate::lexer::{DoctypeVersion, Lexer};
use crate::token::{Attribute, NodeFlags, NodeKind, Token};

const CDATA_OPEN: &str = "CDATA[";
const DOCTYPE_KEYWORD: &str = "DOCTYPE";

impl Lexer<'_> {
    /// Push chars until the construct's text ends with `term`, which is then
    /// dropped. Returns `false` if the input ran out first.
    fn scan_to(&mut self, term: &str, diag: &mut dyn DiagnosticSink) -> bool {
        let start = self.lt_start;
        loop {
            if self.text.tail(start).ends_with(term) {
                let end = self.text.len() - term.len();
                self.text.truncate(end);
                return true;
            }
            let Some(c) = self.read(diag) else {
                self.report(diag, DiagnosticKind::UnexpectedEof, term);
                return false;
            };
            self.text.push(c);
        }
    }

    fn markup_token(&mut self, kind: NodeKind) -> Token {
        self.set_state(LexState::Content);
        let token = Token::new(kind, self.text.span_from(self.lt_start), self.tag_pos);
        self.emit_token(token)
    }

    pub(super) fn lex_comment(&mut self, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        let mut reported = false;
        let mut linebreak = false;

        'scan: loop {
            let Some(c) = self.read(diag) else {
                self.report(diag, DiagnosticKind::UnexpectedEof, "<!--");
                break;
            };
            self.text.push(c);
            if c != '-' {
                continue;
            }
            let Some(c) = self.read(diag) else {
                self.report(diag, DiagnosticKind::UnexpectedEof, "<!--");
                break;
            };
            self.text.push(c);
            if c != '-' {
                continue;
            }

            // Seen `--`: only `>` ends the comment.
            loop {
                let Some(c) = self.read(diag) else {
                    self.report(diag, DiagnosticKind::UnexpectedEof, "<!--");
                    break 'scan;
                };
                match c {
                    '>' => {
                        let end = self.text.len() - 2;
                        self.text.truncate(end);
                        match self.read(diag) {
                            Some('\n') => linebreak = true,
                            Some(c) => self.unread(c),
                            None => {}
                        }
                        break 'scan;
                    }
                    '-' => self.text.push(c),
                    _ => {
                        if !reported {
                            self.report(diag, DiagnosticKind::MalformedComment, "--");
                            reported = true;
                        }
                        if self.config.fix_comments {
                            self.text.set_ascii(self.text.len() - 2, b'=');
                        }
                        self.text.push(c);
                        continue 'scan;
                    }
                }
            }
        }

        let mut token = self.markup_token(NodeKind::Comment);
        if linebreak {
            token.flags |= NodeFlags::LINEBREAK_AFTER;
        }
        Step::Emit(token)
    }

    pub(super) fn lex_doctype(&mut self, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        let start = self.lt_start;
        let mut waswhite = false;
        let mut in_subset = false;

        loop {
            let Some(mut c) = self.read(diag) else {
                self.report(diag, DiagnosticKind::UnexpectedEof, "<!DOCTYPE");
                break;
            };
            match c {
                '>' if !in_subset => break,
                '[' => in_subset = true,
                ']' => in_subset = false,
                _ => {}
            }
            if is_white(c) {
                if waswhite {
                    continue;
                }
                waswhite = true;
                c = ' ';
            } else {
                waswhite = false;
            }
            self.text.push(c);
        }
        if self.text.len() > start && self.text.last_char() == Some(' ') {
            let end = self.text.len() - 1;
            self.text.truncate(end);
        }

        let mut span = self.text.span_from(start);
        let has_keyword = self
            .text
            .slice(span)
            .get(..DOCTYPE_KEYWORD.len())
            .is_some_and(|k| k.eq_ignore_ascii_case(DOCTYPE_KEYWORD));
        if !has_keyword {
            // `<!d...>` that is not a doctype: dropped like any other
            // unknown declaration.
            self.report(diag, DiagnosticKind::MalformedComment, self.text.slice(span));
            self.text.truncate(start);
            self.set_state(LexState::Content);
            return Step::Continue;
        }
        span.start += DOCTYPE_KEYWORD.len();
        if self.text.slice(span).starts_with(' ') {
            span.start += 1;
        }

        let body = self.text.slice(span);
        if !doctype::has_html_root(body) {
            self.report(diag, DiagnosticKind::MalformedDoctype, body);
        }
        let version = doctype::classify(body);
        if version == DoctypeVersion::Unknown {
            if let Some(fpi) = doctype::public_id(body) {
                self.report(diag, DiagnosticKind::AmbiguousDoctype, fpi);
            }
        }
        self.doctype = Some(version);

        self.set_state(LexState::Content);
        let token = Token::new(NodeKind::DocType, span, self.tag_pos);
        Step::Emit(self.emit_token(token))
    }

    pub(super) fn lex_proc_ins(&mut self, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        let start = self.lt_start;
        // Four chars tell `<?xml ` and `<?php` apart from other instructions.
        while self.text.tail(start).chars().count() < 4 {
            let Some(c) = self.read(diag) else {
                break;
            };
            self.text.push(c);
            if c == '>' {
                break;
            }
        }

        let head = self.text.tail(start);
        let is_xml_decl = head.starts_with("xml") && head[3..].starts_with(is_white);
        let is_php = head.get(..3).is_some_and(|h| h.eq_ignore_ascii_case("php"));
        if is_xml_decl {
            self.set_state(LexState::XmlDecl);
            return Step::Continue;
        }
        if is_php {
            self.set_state(LexState::Php);
            return Step::Continue;
        }
        self.scan_to("?>", diag);
        Step::Emit(self.markup_token(NodeKind::ProcIns))
    }

    pub(super) fn lex_xml_decl(&mut self, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        self.scan_to("?>", diag);
        let mut token = self.markup_token(NodeKind::XmlDecl);
        self.parse_pseudo_attrs(&mut token);
        Step::Emit(token)
    }

    /// `version="1.0" encoding="..."` pairs following `xml`.
    fn parse_pseudo_attrs(&mut self, token: &mut Token) {
        let base = token.span.start;
        let content = self.text.slice(token.span).to_owned();
        let bytes = content.as_bytes();
        let mut i = "xml".len();

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let name_start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || b"-_:.".contains(&bytes[i])) {
                i += 1;
            }
            if i == name_start {
                break;
            }
            let name = &content[name_start..i];
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if bytes.get(i) != Some(&b'=') {
                break;
            }
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            let Some(&quote) = bytes.get(i).filter(|b| **b == b'"' || **b == b'\'') else {
                break;
            };
            i += 1;
            let Some(len) = memchr::memchr(quote, &bytes[i..]) else {
                break;
            };
            let value = Span::new(base + i, base + i + len);
            i += len + 1;

            let Ok(atom) = self.atoms.intern_exact(name) else {
                break;
            };
            token.attrs.insert(
                0,
                Attribute {
                    name: Some(atom),
                    value: Some(value),
                    delimiter: Some(char::from(quote)),
                    code: None,
                },
            );
        }
    }

    pub(super) fn lex_server_code(
        &mut self,
        kind: NodeKind,
        term: &str,
        diag: &mut dyn DiagnosticSink,
    ) -> Step<Token> {
        self.scan_to(term, diag);
        Step::Emit(self.markup_token(kind))
    }

    pub(super) fn lex_section(&mut self, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        let start = self.lt_start;
        while self.text.len() - start < CDATA_OPEN.len() {
            let Some(c) = self.read(diag) else {
                break;
            };
            self.text.push(c);
            if !CDATA_OPEN.starts_with(self.text.tail(start)) {
                break;
            }
        }
        if self.text.tail(start) == CDATA_OPEN {
            self.text.truncate(start);
            self.set_state(LexState::CData);
            return Step::Continue;
        }
        self.scan_to("]>", diag);
        Step::Emit(self.markup_token(NodeKind::Section))
    }

    pub(super) fn lex_cdata(&mut self, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        self.scan_to("]]>", diag);
        Step::Emit(self.markup_token(NodeKind::CData))
    }
}
