//! Per-job configuration shared (by reference) by the stream, lexer and printer.

use charcodec::{Encoding, ReplacementPolicy};

/// Whether block content gets an extra indentation level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndentContent {
    #[default]
    No,
    Yes,
    /// Indent only where it doesn't change rendering (treated like `Yes` for
    /// block containers, never for mixed content).
    Auto,
}

/// Line terminator written by the printer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Newline {
    #[default]
    Lf,
    CrLf,
    Cr,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
            Newline::Cr => "\r",
        }
    }
}

/// Heuristic thresholds that have no single right value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WrapTunables {
    /// A quoted attribute value holding more `<`, `>` or newlines than this
    /// is reported as a probable missing closing quote.
    pub missing_quote_threshold: usize,
    /// Fraction of the wrap width used for Chinese text, as (num, den).
    pub zh_fraction: (usize, usize),
    /// Fraction of the wrap width used for Japanese text, as (num, den).
    pub ja_fraction: (usize, usize),
}

impl Default for WrapTunables {
    fn default() -> Self {
        Self {
            missing_quote_threshold: 10,
            zh_fraction: (1, 2),
            ja_fraction: (7, 10),
        }
    }
}

/// Configuration for one lex/print job.
#[derive(Clone, Debug)]
pub struct Config {
    // Input.
    pub input_encoding: Encoding,
    pub tab_size: usize,
    pub replacement: ReplacementPolicy,

    // Lexer.
    /// Treat input as XML: names keep their case and Form Feed is stripped.
    pub xml_tags: bool,
    /// Rewrite embedded `--` inside comments to `=-`.
    pub fix_comments: bool,
    /// Stop storing diagnostics after this many (counting continues).
    ///
    /// The pipeline reports into whatever sink it is given; this cap takes
    /// effect through [`Diagnostics::for_config`](crate::Diagnostics::for_config).
    pub max_reported: usize,

    // Output.
    pub output_encoding: Encoding,
    pub xml_out: bool,
    pub xhtml_out: bool,
    pub output_bom: bool,
    pub newline: Newline,
    /// Column to wrap at; `0` disables wrapping.
    pub wrap_column: usize,
    pub wrap_attributes: bool,
    pub wrap_asp: bool,
    pub wrap_jste: bool,
    pub wrap_php: bool,
    pub wrap_sections: bool,
    pub indent_spaces: usize,
    pub indent_content: IndentContent,
    pub indent_attributes: bool,
    pub quote_marks: bool,
    pub quote_ampersand: bool,
    pub quote_nbsp: bool,
    pub escape_lt_gt: bool,
    pub numeric_entities: bool,
    pub uppercase_tags: bool,
    pub break_before_br: bool,
    /// Document language (`zh`, `ja`, ...), used to narrow the wrap width.
    pub language: Option<String>,

    pub tunables: WrapTunables,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_encoding: Encoding::Utf8,
            tab_size: 8,
            replacement: ReplacementPolicy::Substitute,
            xml_tags: false,
            fix_comments: true,
            max_reported: 1000,
            output_encoding: Encoding::Utf8,
            xml_out: false,
            xhtml_out: false,
            output_bom: false,
            newline: Newline::Lf,
            wrap_column: 68,
            wrap_attributes: false,
            wrap_asp: true,
            wrap_jste: true,
            wrap_php: true,
            wrap_sections: true,
            indent_spaces: 2,
            indent_content: IndentContent::No,
            indent_attributes: false,
            quote_marks: false,
            quote_ampersand: true,
            quote_nbsp: true,
            escape_lt_gt: true,
            numeric_entities: false,
            uppercase_tags: false,
            break_before_br: false,
            language: None,
            tunables: WrapTunables::default(),
        }
    }
}

impl Config {
    /// XML-flavoured output (XHTML counts).
    pub fn xml_output(&self) -> bool {
        self.xml_out || self.xhtml_out
    }
}
