pub mod arena;
pub mod atom;
pub mod config;
pub mod diag;
pub mod entities;
pub mod lexer;
pub mod pprint;
pub mod stream;
pub mod tags;
pub mod token;
pub mod tree;

mod assemble;

pub use crate::arena::{Span, TextArena};
pub use crate::assemble::assemble;
pub use crate::atom::{AtomError, AtomId, AtomTable};
pub use crate::config::{Config, IndentContent, Newline, WrapTunables};
pub use crate::diag::{Diagnostic, DiagnosticKind, DiagnosticSink, Diagnostics, Severity};
pub use crate::lexer::{DoctypeVersion, LexMode, Lexer, TokenFmt, TokenFmtError};
pub use crate::pprint::{LanguageWrapWidth, PrettyPrinter, WrapWidth};
pub use crate::stream::{InputStream, Position};
pub use crate::tags::{ContentModel, HtmlTagTable, TagDictionary, TagId, TagInfo};
pub use crate::token::{Attribute, EmbeddedCode, EmbeddedKind, NodeFlags, NodeKind, Token};
pub use crate::tree::{Document, Node, NodeId, Tree};

pub use charcodec::{Encoding, ReplacementPolicy};

/// Lex `bytes` and nest the tokens with [`assemble`].
pub fn parse(
    bytes: Vec<u8>,
    config: &Config,
    tags: &dyn TagDictionary,
    diag: &mut dyn DiagnosticSink,
) -> Document {
    assemble(Lexer::new(bytes, config, tags), diag)
}

/// Parse and pretty-print in one go.
pub fn tidy(
    bytes: Vec<u8>,
    config: &Config,
    tags: &dyn TagDictionary,
    diag: &mut dyn DiagnosticSink,
) -> Vec<u8> {
    let doc = parse(bytes, config, tags, diag);
    PrettyPrinter::new(config, tags).print(&doc)
}
