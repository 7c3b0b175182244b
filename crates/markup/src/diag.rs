//! Diagnostics for recoverable problems found while reading or writing markup.
//!
//! Nothing in the pipeline aborts on bad input. Each problem is recovered
//! locally and handed to a [`DiagnosticSink`].

use std::fmt;

use crate::config::Config;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // Encoding.
    EncodingMismatch,
    InvalidUtf8,
    InvalidUtf16,
    VendorSpecificChar,
    InvalidSgmlChar,
    UnmappedChar,
    // Entities.
    MissingSemicolon,
    MissingSemicolonNcr,
    UnknownEntity,
    UnescapedAmpersand,
    AposUndefined,
    InvalidNcr,
    VendorSpecificNcr,
    AmpersandInId,
    // Markup.
    MalformedComment,
    MalformedDoctype,
    AmbiguousDoctype,
    UnexpectedEof,
    UnexpectedEqualsSign,
    UnexpectedQuoteMark,
    SuspectedMissingQuote,
    MissingTagClose,
    MalformedEndTag,
    // Tree.
    UnexpectedEndTag,
    MissingEndTag,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        use DiagnosticKind::*;
        match self {
            InvalidUtf8 | InvalidUtf16 | InvalidSgmlChar | InvalidNcr => Severity::Error,
            _ => Severity::Warning,
        }
    }

    fn describe(self) -> &'static str {
        use DiagnosticKind::*;
        match self {
            EncodingMismatch => "byte order mark disagrees with the configured encoding",
            InvalidUtf8 => "invalid UTF-8 bytes",
            InvalidUtf16 => "invalid UTF-16 surrogate pair",
            VendorSpecificChar => "vendor-specific character",
            InvalidSgmlChar => "invalid character code",
            UnmappedChar => "character not representable in the input encoding",
            MissingSemicolon => "entity missing ';'",
            MissingSemicolonNcr => "numeric character reference missing ';'",
            UnknownEntity => "unknown entity",
            UnescapedAmpersand => "unescaped '&' which should be written as &amp;",
            AposUndefined => "named entity &apos; only defined in XML/XHTML",
            InvalidNcr => "numeric character reference refers to an invalid character",
            VendorSpecificNcr => "numeric character reference refers to a vendor-specific character",
            AmpersandInId => "'&' is not allowed in an id value",
            MalformedComment => "adjacent hyphens within comment",
            MalformedDoctype => "expected \"html PUBLIC\" or \"html SYSTEM\"",
            AmbiguousDoctype => "unrecognised public identifier in DOCTYPE",
            UnexpectedEof => "end of file while parsing",
            UnexpectedEqualsSign => "unexpected '=' where an attribute name was expected",
            UnexpectedQuoteMark => "unexpected quote mark where an attribute name was expected",
            SuspectedMissingQuote => "attribute value may be missing its closing quote",
            MissingTagClose => "'<' found before '>' closed the tag",
            MalformedEndTag => "junk characters in end tag",
            UnexpectedEndTag => "discarding unexpected end tag",
            MissingEndTag => "missing end tag",
        }
    }
}

/// One reported problem, positioned at the source line/column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub line: u32,
    pub column: u32,
    /// Offending text (entity name, tag name, bytes in hex), possibly empty.
    pub context: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        };
        write!(
            f,
            "line {} column {} - {level}: {}",
            self.line,
            self.column,
            self.kind.describe()
        )?;
        if !self.context.is_empty() {
            write!(f, " ({})", self.context)?;
        }
        Ok(())
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);

    /// Build and report a diagnostic with the kind's default severity.
    fn push(&mut self, kind: DiagnosticKind, line: u32, column: u32, context: &str) {
        self.report(Diagnostic {
            severity: kind.severity(),
            kind,
            line,
            column,
            context: context.to_string(),
        });
    }
}

/// Collecting sink with per-severity counters.
///
/// Once `max_reported` diagnostics are stored, further ones are counted
/// but not kept.
#[derive(Debug)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
    warnings: usize,
    errors: usize,
    max_reported: usize,
}

impl Diagnostics {
    pub fn new(max_reported: usize) -> Self {
        Self {
            items: Vec::new(),
            warnings: 0,
            errors: 0,
            max_reported,
        }
    }

    /// Sink capped at [`Config::max_reported`].
    pub fn for_config(config: &Config) -> Self {
        Self::new(config.max_reported)
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.warnings == 0 && self.errors == 0
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn contains(&self, kind: DiagnosticKind) -> bool {
        self.items.iter().any(|d| d.kind == kind)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::debug!(target: "markup.diag", "{diagnostic}");
        match diagnostic.severity {
            Severity::Warning => self.warnings += 1,
            Severity::Error => self.errors += 1,
        }
        if self.items.len() < self.max_reported {
            self.items.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cap_stops_storing_but_keeps_counting() {
        let mut diags = Diagnostics::new(2);
        for _ in 0..5 {
            diags.push(DiagnosticKind::UnknownEntity, 1, 1, "&foo");
        }
        diags.push(DiagnosticKind::InvalidUtf8, 2, 3, "");
        assert_eq!(diags.items().len(), 2);
        assert_eq!(diags.warnings(), 5);
        assert_eq!(diags.errors(), 1);
    }

    #[test]
    fn config_sets_the_cap() {
        let config = Config {
            max_reported: 1,
            ..Config::default()
        };
        let mut diags = Diagnostics::for_config(&config);
        diags.push(DiagnosticKind::UnknownEntity, 1, 1, "&a");
        diags.push(DiagnosticKind::UnknownEntity, 1, 4, "&b");
        assert_eq!(diags.items().len(), 1);
        assert_eq!(diags.warnings(), 2);
    }

    #[test]
    fn display_includes_position_and_context() {
        let d = Diagnostic {
            severity: Severity::Warning,
            kind: DiagnosticKind::UnknownEntity,
            line: 3,
            column: 7,
            context: "&foo".to_string(),
        };
        assert_eq!(d.to_string(), "line 3 column 7 - Warning: unknown entity (&foo)");
    }
}
