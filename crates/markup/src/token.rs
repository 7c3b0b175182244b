//! Tokens produced by the lexer; tree nodes carry the same payload.

use bitflags::bitflags;

use crate::arena::Span;
use crate::atom::AtomId;
use crate::stream::Position;
use crate::tags::TagId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Text,
    StartTag,
    EndTag,
    /// `<br/>`-style self-closed tag.
    StartEndTag,
    Comment,
    DocType,
    ProcIns,
    CData,
    /// `<![ ... ]>` marked section.
    Section,
    Asp,
    Jste,
    Php,
    XmlDecl,
}

impl NodeKind {
    pub fn is_element(self) -> bool {
        matches!(self, NodeKind::StartTag | NodeKind::StartEndTag)
    }
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// The element was explicitly closed (end tag or `/>`).
        const CLOSED = 1 << 0;
        /// The element's end tag was inferred.
        const IMPLICIT = 1 << 1;
        /// A line break directly followed the construct in the source.
        const LINEBREAK_AFTER = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddedKind {
    Asp,
    Php,
}

/// Server code standing in for an attribute (`<a <%= attrs %>>`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmbeddedCode {
    pub kind: EmbeddedKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    /// `None` only for embedded code.
    pub name: Option<AtomId>,
    pub value: Option<Span>,
    /// Quote character the value was written with.
    pub delimiter: Option<char>,
    pub code: Option<EmbeddedCode>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: NodeKind,
    pub name: Option<AtomId>,
    pub tag: Option<TagId>,
    /// Most recently parsed attribute first.
    pub attrs: Vec<Attribute>,
    /// Text for text-like kinds; empty for tags.
    pub span: Span,
    pub flags: NodeFlags,
    pub position: Position,
}

impl Token {
    pub fn new(kind: NodeKind, span: Span, position: Position) -> Self {
        Self {
            kind,
            name: None,
            tag: None,
            attrs: Vec::new(),
            span,
            flags: NodeFlags::empty(),
            position,
        }
    }

    /// Attributes in source order.
    pub fn attrs_in_order(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter().rev()
    }
}
