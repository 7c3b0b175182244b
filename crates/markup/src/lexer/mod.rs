//! Markup lexer.
//!
//! A pull lexer: each [`Lexer::next_token`] call returns one token. The
//! caller (a tree builder) chooses the whitespace mode per call, and can
//! push a single token back with [`Lexer::unget_token`].
//!
//! Invariants:
//! - Text before a markup construct is returned first; the construct's state
//!   is kept and resumed on the next call.
//! - Consecutive text coalesces into one `Text` token; empty text is never
//!   returned.
//! - All spans point into the lexer's [`TextArena`], which outlives the
//!   tokens once moved into a [`Document`].

use crate::arena::{Span, TextArena};
use crate::atom::{AtomId, AtomTable};
use crate::config::Config;
use crate::diag::{DiagnosticKind, DiagnosticSink};
use crate::stream::{InputStream, Position};
use crate::tags::TagDictionary;
use crate::token::{NodeKind, Token};
use crate::tree::{Document, Tree};

use chars::{is_letter, is_namechar, is_white};
use states::{LexState, Step};

mod attrs;
mod chars;
mod doctype;
mod emit;
mod entity;
mod markup;
mod states;
mod token_fmt;


pub use doctype::DoctypeVersion;
pub use states::LexMode;
pub use token_fmt::{TokenFmt, TokenFmtError};

pub struct Lexer<'c> {
    config: &'c Config,
    tags: &'c dyn TagDictionary,
    input: InputStream,
    text: TextArena,
    atoms: AtomTable,
    state: LexState,
    pending: Option<Token>,
    waswhite: bool,
    /// Arena offset where the current token's text starts.
    txtstart: usize,
    text_pos: Position,
    /// Arena offset of the `<` that opened the construct being lexed.
    lt_start: usize,
    tag_pos: Position,
    /// End tag name already consumed by raw-text scanning.
    preset_end_tag: Option<AtomId>,
    doctype: Option<DoctypeVersion>,
    started: bool,
}

impl<'c> Lexer<'c> {
    pub fn new(bytes: Vec<u8>, config: &'c Config, tags: &'c dyn TagDictionary) -> Self {
        let capacity = bytes.len();
        Self {
            config,
            tags,
            input: InputStream::new(bytes, config),
            text: TextArena::with_capacity(capacity),
            atoms: AtomTable::new(),
            state: LexState::Content,
            pending: None,
            waswhite: false,
            txtstart: 0,
            text_pos: Position::START,
            lt_start: 0,
            tag_pos: Position::START,
            preset_end_tag: None,
            doctype: None,
            started: false,
        }
    }

    pub fn text(&self) -> &TextArena {
        &self.text
    }

    pub fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    pub fn tags(&self) -> &'c dyn TagDictionary {
        self.tags
    }

    pub fn config(&self) -> &'c Config {
        self.config
    }

    /// Version suggested by the document's DOCTYPE, once one has been lexed.
    pub fn doctype(&self) -> Option<DoctypeVersion> {
        self.doctype
    }

    pub fn position(&self) -> Position {
        self.input.position()
    }

    /// Return `token` from the next [`Lexer::next_token`] call.
    pub fn unget_token(&mut self, token: Token) {
        debug_assert!(self.pending.is_none(), "only one token can be pushed back");
        self.pending = Some(token);
    }

    /// Hand the lexed storage over to a document built around `tree`.
    pub fn into_document(self, tree: Tree) -> Document {
        Document {
            tree,
            text: self.text,
            atoms: self.atoms,
            doctype: self.doctype,
        }
    }

    /// Next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self, mode: LexMode, diag: &mut dyn DiagnosticSink) -> Option<Token> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        self.txtstart = self.text.len();
        self.waswhite = false;

        loop {
            let step = match self.state {
                LexState::Content => self.lex_content(mode, diag),
                LexState::TagOpen => self.lex_tag_open(diag),
                LexState::StartTagName => self.lex_start_tag(mode, diag),
                LexState::EndTagName => self.lex_end_tag(diag),
                LexState::Comment => self.lex_comment(diag),
                LexState::DocType => self.lex_doctype(diag),
                LexState::ProcIns => self.lex_proc_ins(diag),
                LexState::XmlDecl => self.lex_xml_decl(diag),
                LexState::Php => self.lex_server_code(NodeKind::Php, "?>", diag),
                LexState::Asp => self.lex_server_code(NodeKind::Asp, "%>", diag),
                LexState::Jste => self.lex_server_code(NodeKind::Jste, "#>", diag),
                LexState::ConditionalSection => self.lex_section(diag),
                LexState::CData => self.lex_cdata(diag),
            };
            match step {
                Step::Continue => continue,
                Step::Emit(token) => return Some(token),
                Step::Eof => return None,
            }
        }
    }

    /// Content of a raw-text element (`script`, `style`) up to `</container`.
    ///
    /// The end tag itself is left for the next [`Lexer::next_token`] call.
    /// Returns `None` for empty content.
    pub fn next_raw_text(
        &mut self,
        container: AtomId,
        diag: &mut dyn DiagnosticSink,
    ) -> Option<Token> {
        debug_assert!(self.pending.is_none() && self.state == LexState::Content);
        let name = self.atoms.resolve(container)?.to_owned();
        let start = self.text.len();
        let pos = self.input.position();
        let mut lt_pos = pos;

        loop {
            let before = self.input.position();
            let c = self.read(diag);
            if c.is_none_or(|c| !is_namechar(c)) {
                if let Some(lt) = self.find_end_tag(start, &name) {
                    if let Some(c) = c {
                        self.unread(c);
                    }
                    self.text.truncate(lt);
                    self.lt_start = lt;
                    self.tag_pos = lt_pos;
                    self.preset_end_tag = Some(container);
                    self.set_state(LexState::EndTagName);
                    break;
                }
            }
            let Some(c) = c else {
                self.report(diag, DiagnosticKind::UnexpectedEof, &name);
                break;
            };
            if c == '<' {
                lt_pos = before;
            }
            self.text.push(c);
        }

        let span = self.text.span_from(start);
        self.txtstart = self.text.len();
        if span.is_empty() {
            return None;
        }
        let token = Token::new(NodeKind::Text, span, pos);
        Some(self.emit_token(token))
    }

    /// Arena offset of a trailing `</name` (ASCII case-insensitive) after `start`.
    ///
    /// Only the fixed-size suffix is inspected, so the check is constant time
    /// however long the raw text grows.
    fn find_end_tag(&self, start: usize, name: &str) -> Option<usize> {
        let tail = self.text.tail(start).as_bytes();
        let lt = tail.len().checked_sub(name.len() + 2)?;
        let suffix = &tail[lt..];
        let matched = suffix.starts_with(b"</") && suffix[2..].eq_ignore_ascii_case(name.as_bytes());
        matched.then_some(start + lt)
    }

    fn read(&mut self, diag: &mut dyn DiagnosticSink) -> Option<char> {
        self.input.next(diag)
    }

    fn unread(&mut self, c: char) {
        self.input.unget(c);
    }

    fn report(&self, diag: &mut dyn DiagnosticSink, kind: DiagnosticKind, context: &str) {
        let Position { line, column } = self.input.position();
        diag.push(kind, line, column, context);
    }

    fn set_state(&mut self, state: LexState) {
        if self.state != state {
            log::trace!(target: "markup.lexer", "{:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    fn xml(&self) -> bool {
        self.config.xml_tags
    }

    fn push_text(&mut self, c: char, pos: Position) {
        if self.text.len() == self.txtstart {
            self.text_pos = pos;
        }
        self.text.push(c);
    }

    fn text_token(&mut self, end: usize) -> Option<Token> {
        (end > self.txtstart).then(|| {
            let token = Token::new(NodeKind::Text, Span::new(self.txtstart, end), self.text_pos);
            self.emit_token(token)
        })
    }

    fn lex_content(&mut self, mode: LexMode, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        loop {
            let pos = self.input.position();
            let Some(c) = self.read(diag) else {
                return match self.text_token(self.text.len()) {
                    Some(token) => Step::Emit(token),
                    None => Step::Eof,
                };
            };
            if !self.started {
                self.started = true;
                if c == charcodec::BYTE_ORDER_MARK {
                    continue;
                }
            }

            if c == '<' {
                self.lt_start = self.text.len();
                self.tag_pos = pos;
                self.text.push('<');
                self.set_state(LexState::TagOpen);
                return Step::Continue;
            }

            if is_white(c) && mode != LexMode::Preformatted {
                if mode == LexMode::IgnoreWhitespace && self.text.len() == self.txtstart {
                    continue;
                }
                if self.waswhite {
                    continue;
                }
                self.waswhite = true;
                self.push_text(' ', pos);
                continue;
            }
            self.waswhite = false;

            if c == '&' {
                if self.text.len() == self.txtstart {
                    self.text_pos = pos;
                }
                self.parse_entity(mode, diag);
                continue;
            }
            self.push_text(c, pos);
        }
    }

    /// Leave markup recognition: the `<` (and anything pushed after it)
    /// stays as literal text.
    fn revert_to_content(&mut self) -> Step<Token> {
        if self.lt_start == self.txtstart {
            self.text_pos = self.tag_pos;
        }
        self.waswhite = false;
        self.set_state(LexState::Content);
        Step::Continue
    }

    /// Enter `state` for a recognised construct, returning pending text first.
    fn begin_markup(&mut self, state: LexState) -> Step<Token> {
        self.text.truncate(self.lt_start);
        self.set_state(state);
        match self.text_token(self.lt_start) {
            Some(token) => Step::Emit(token),
            None => Step::Continue,
        }
    }

    fn lex_tag_open(&mut self, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        let xml = self.xml();
        let Some(c) = self.read(diag) else {
            return self.revert_to_content();
        };
        match c {
            '/' => match self.read(diag) {
                Some(n) if is_letter(n, xml) => {
                    self.unread(n);
                    self.begin_markup(LexState::EndTagName)
                }
                other => {
                    if let Some(n) = other {
                        self.unread(n);
                    }
                    self.text.push('/');
                    self.revert_to_content()
                }
            },
            '!' => match self.read(diag) {
                Some('-') => match self.read(diag) {
                    Some('-') => self.begin_markup(LexState::Comment),
                    other => {
                        if let Some(n) = other {
                            self.unread(n);
                        }
                        self.swallow_declaration(diag)
                    }
                },
                Some(n @ ('d' | 'D')) => {
                    self.unread(n);
                    self.begin_markup(LexState::DocType)
                }
                Some('[') => self.begin_markup(LexState::ConditionalSection),
                other => {
                    if let Some(n) = other {
                        self.unread(n);
                    }
                    self.swallow_declaration(diag)
                }
            },
            '?' => self.begin_markup(LexState::ProcIns),
            '%' => self.begin_markup(LexState::Asp),
            '#' => self.begin_markup(LexState::Jste),
            c if is_letter(c, xml) => {
                self.unread(c);
                self.begin_markup(LexState::StartTagName)
            }
            c => {
                self.unread(c);
                self.revert_to_content()
            }
        }
    }

    /// `<!` followed by something unrecognised: drop everything up to `>`.
    fn swallow_declaration(&mut self, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        self.report(diag, DiagnosticKind::MalformedComment, "<!");
        loop {
            match self.read(diag) {
                Some('>') => break,
                Some(_) => {}
                None => {
                    self.report(diag, DiagnosticKind::UnexpectedEof, "<!");
                    break;
                }
            }
        }
        self.text.truncate(self.lt_start);
        self.set_state(LexState::Content);
        Step::Continue
    }

    /// Read a run of name chars, folding case unless lexing XML.
    fn read_name(&mut self, diag: &mut dyn DiagnosticSink) -> String {
        let mut name = String::new();
        while let Some(c) = self.read(diag) {
            if !is_namechar(c) {
                self.unread(c);
                break;
            }
            name.push(c);
        }
        if !self.xml() {
            name.make_ascii_lowercase();
        }
        name
    }

    fn intern(&mut self, name: &str) -> Option<AtomId> {
        let interned = if self.xml() {
            self.atoms.intern_exact(name)
        } else {
            self.atoms.intern_ascii_folded(name)
        };
        match interned {
            Ok(id) => Some(id),
            Err(err) => {
                log::error!(target: "markup.lexer", "cannot intern {name:?}: {err}");
                None
            }
        }
    }

    fn lex_start_tag(&mut self, mode: LexMode, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        let name = self.read_name(diag);
        let info = self.tags.lookup(&name).copied();
        let mut token = Token::new(
            NodeKind::StartTag,
            Span::new(self.lt_start, self.lt_start),
            self.tag_pos,
        );
        token.name = self.intern(&name);
        token.tag = info.map(|info| info.id);

        let self_closed = self.parse_attrs(&mut token, diag);
        if self_closed {
            token.kind = NodeKind::StartEndTag;
            token.flags |= crate::token::NodeFlags::CLOSED;
        }
        self.set_state(LexState::Content);

        // A newline right after a start tag belongs to the markup.
        let expects_content = info.is_none_or(|info| !info.is_empty());
        let line_breaker = name == "br" || name == "hr";
        if (mode != LexMode::Preformatted && expects_content && !self_closed) || line_breaker {
            match self.read(diag) {
                Some('\n' | '\u{0c}') | None => {}
                Some(c) => self.unread(c),
            }
        }
        self.txtstart = self.text.len();
        Step::Emit(self.emit_token(token))
    }

    fn lex_end_tag(&mut self, diag: &mut dyn DiagnosticSink) -> Step<Token> {
        let (atom, name) = match self.preset_end_tag.take() {
            Some(atom) => (Some(atom), self.atoms.resolve(atom).unwrap_or("").to_owned()),
            None => {
                let name = self.read_name(diag);
                (self.intern(&name), name)
            }
        };

        let mut junk = false;
        loop {
            match self.read(diag) {
                Some('>') => break,
                Some(c) if is_white(c) => {}
                Some(_) => junk = true,
                None => {
                    self.report(diag, DiagnosticKind::UnexpectedEof, &name);
                    break;
                }
            }
        }
        if junk {
            self.report(diag, DiagnosticKind::MalformedEndTag, &name);
        }

        let mut token = Token::new(
            NodeKind::EndTag,
            Span::new(self.lt_start, self.lt_start),
            self.tag_pos,
        );
        token.name = atom;
        token.tag = self.tags.lookup(&name).map(|info| info.id);
        self.set_state(LexState::Content);
        Step::Emit(self.emit_token(token))
    }
}
