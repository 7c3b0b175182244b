//! Entity escaping for printed text and attribute values.

use charcodec::{Encoder, Encoding};

use crate::config::Config;
use crate::entities;

const NBSP: char = '\u{a0}';

pub(crate) struct Escaper {
    encoder: Encoder,
    named: bool,
    quote_marks: bool,
    quote_ampersand: bool,
    quote_nbsp: bool,
    escape_lt_gt: bool,
}

impl Escaper {
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            encoder: Encoder::new(config.output_encoding),
            named: !config.numeric_entities && !config.xml_output(),
            quote_marks: config.quote_marks,
            quote_ampersand: config.quote_ampersand,
            quote_nbsp: config.quote_nbsp,
            escape_lt_gt: config.escape_lt_gt,
        }
    }

    /// Replacement text for `c`, or `None` to print it as is. `delimiter`
    /// is the quote around the attribute value being printed, if any.
    pub(crate) fn escape(&self, c: char, delimiter: Option<char>) -> Option<String> {
        match c {
            '<' if self.escape_lt_gt => Some("&lt;".to_string()),
            '>' if self.escape_lt_gt => Some("&gt;".to_string()),
            '&' if self.quote_ampersand => Some("&amp;".to_string()),
            '"' if self.quote_marks || delimiter == Some('"') => Some("&quot;".to_string()),
            '\'' if self.quote_marks || delimiter == Some('\'') => Some("&#39;".to_string()),
            NBSP if self.quote_nbsp => Some(self.entity(c)),
            c if self.needs_entity(c) => Some(self.entity(c)),
            _ => None,
        }
    }

    /// Whether the output encoding forces `c` to be written as a reference.
    fn needs_entity(&self, c: char) -> bool {
        let code = c as u32;
        match self.encoder.encoding() {
            Encoding::Ascii => code > 126 || (code < 0x20 && c != '\t'),
            Encoding::Latin1 => code > 255 || (127..=159).contains(&code),
            Encoding::Latin0 | Encoding::MacRoman | Encoding::Win1252 => {
                !self.encoder.can_encode(c)
            }
            _ => false,
        }
    }

    fn entity(&self, c: char) -> String {
        let code = c as u32;
        match entities::name_for(code).filter(|_| self.named) {
            Some(name) => format!("&{name};"),
            None => format!("&#{code};"),
        }
    }
}
