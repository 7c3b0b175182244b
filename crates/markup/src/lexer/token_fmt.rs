//! Deterministic token formatting for golden tests.
//!
//! Attributes are printed in source order.

use crate::arena::{Span, TextArena};
use crate::atom::{AtomId, AtomTable};
use crate::token::{Attribute, EmbeddedKind, NodeKind, Token};

#[derive(Debug)]
pub enum TokenFmtError {
    UnknownAtomId { id: AtomId },
    InvalidSpan { span: Span },
}

impl std::fmt::Display for TokenFmtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenFmtError::UnknownAtomId { id } => write!(f, "unknown atom id: {id:?}"),
            TokenFmtError::InvalidSpan { span } => {
                write!(f, "invalid span: {}..{}", span.start, span.end)
            }
        }
    }
}

impl std::error::Error for TokenFmtError {}

/// Formatter context used to derive test strings from tokens.
pub struct TokenFmt<'a> {
    atoms: &'a AtomTable,
    text: &'a TextArena,
}

impl<'a> TokenFmt<'a> {
    pub fn new(atoms: &'a AtomTable, text: &'a TextArena) -> Self {
        Self { atoms, text }
    }

    pub fn resolve_atom(&self, id: AtomId) -> Result<&'a str, TokenFmtError> {
        self.atoms
            .resolve(id)
            .ok_or(TokenFmtError::UnknownAtomId { id })
    }

    pub fn resolve_span(&self, span: Span) -> Result<&'a str, TokenFmtError> {
        self.text
            .as_str()
            .get(span.start..span.end)
            .ok_or(TokenFmtError::InvalidSpan { span })
    }

    pub fn format_token(&self, token: &Token) -> Result<String, TokenFmtError> {
        let text = |label: &str| -> Result<String, TokenFmtError> {
            Ok(format!(
                "{label} text=\"{}\"",
                escape_text(self.resolve_span(token.span)?)
            ))
        };
        match token.kind {
            NodeKind::StartTag | NodeKind::StartEndTag => {
                let name = match token.name {
                    Some(id) => self.resolve_atom(id)?,
                    None => "null",
                };
                let mut out = String::new();
                out.push_str("START name=");
                out.push_str(name);
                out.push_str(" attrs=[");
                for (i, attr) in token.attrs_in_order().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&self.format_attr(attr)?);
                }
                out.push_str("] self_closing=");
                out.push_str(if token.kind == NodeKind::StartEndTag {
                    "true"
                } else {
                    "false"
                });
                Ok(out)
            }
            NodeKind::EndTag => {
                let name = match token.name {
                    Some(id) => self.resolve_atom(id)?,
                    None => "null",
                };
                Ok(format!("END name={name}"))
            }
            NodeKind::Text => text("TEXT"),
            NodeKind::Comment => text("COMMENT"),
            NodeKind::DocType => text("DOCTYPE"),
            NodeKind::ProcIns => text("PI"),
            NodeKind::CData => text("CDATA"),
            NodeKind::Section => text("SECTION"),
            NodeKind::Asp => text("ASP"),
            NodeKind::Jste => text("JSTE"),
            NodeKind::Php => text("PHP"),
            NodeKind::XmlDecl => {
                let mut out = String::from("XMLDECL attrs=[");
                for (i, attr) in token.attrs_in_order().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    out.push_str(&self.format_attr(attr)?);
                }
                out.push(']');
                Ok(out)
            }
            NodeKind::Root => Ok("ROOT".to_string()),
        }
    }

    fn format_attr(&self, attr: &Attribute) -> Result<String, TokenFmtError> {
        if let Some(code) = attr.code {
            let label = match code.kind {
                EmbeddedKind::Asp => "<%",
                EmbeddedKind::Php => "<?",
            };
            return Ok(format!("{label}\"{}\"", escape_text(self.resolve_span(code.span)?)));
        }
        let name = match attr.name {
            Some(id) => self.resolve_atom(id)?,
            None => "null",
        };
        match attr.value {
            None => Ok(name.to_string()),
            Some(span) => Ok(format!(
                "{name}=\"{}\"",
                escape_text(self.resolve_span(span)?)
            )),
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if ch < ' ' || ch == '\u{7f}' => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\u{{{:02X}}}", ch as u32);
            }
            _ => out.push(ch),
        }
    }
    out
}
