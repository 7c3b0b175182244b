//! Lexer state machine definitions.

/// Where the lexer is between calls. Anything but `Content` means a markup
/// construct was recognised and is resumed on the next call, after any text
/// that preceded it has been returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LexState {
    Content,
    TagOpen,
    StartTagName,
    EndTagName,
    Comment,
    DocType,
    ProcIns,
    Asp,
    Jste,
    Php,
    XmlDecl,
    ConditionalSection,
    CData,
}

/// Whitespace handling requested by the caller for the next token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LexMode {
    /// Block context: leading whitespace is dropped, runs collapse.
    IgnoreWhitespace,
    /// Inline context: runs collapse to a single space.
    #[default]
    MixedContent,
    /// Whitespace is kept verbatim.
    Preformatted,
}

/// Outcome of one state handler.
pub(crate) enum Step<T> {
    Continue,
    Emit(T),
    Eof,
}
