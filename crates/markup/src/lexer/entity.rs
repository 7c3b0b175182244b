//! Entity and numeric character reference resolution.
//!
//! Called after `&` has been read. The reference text is pushed into the
//! arena as it is scanned so it can stay literal; on success the arena is
//! truncated back to the `&` and the decoded char pushed instead.

use charcodec::{REPLACEMENT, ReplacementPolicy, remap_vendor};

use crate::diag::{DiagnosticKind, DiagnosticSink};
use crate::entities::{self, MAX_ENTITY_NAME};
use crate::lexer::{LexMode, Lexer};

const NBSP: u32 = 0xA0;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Reference {
    Named,
    Decimal,
    Hex,
}

/// Digits are already validated, so the only failure left is overflow, which
/// maps to a value that is never a scalar.
fn parse_code(digits: &str, radix: u32) -> Option<u32> {
    if digits.is_empty() {
        return None;
    }
    Some(u32::from_str_radix(digits, radix).unwrap_or(u32::MAX))
}

impl Lexer<'_> {
    pub(super) fn parse_entity(&mut self, mode: LexMode, diag: &mut dyn DiagnosticSink) {
        let start = self.text.len();
        self.text.push('&');

        let mut kind = Reference::Named;
        let mut terminated = false;
        let mut scanned = 0usize;
        while let Some(c) = self.read(diag) {
            if c == ';' {
                terminated = true;
                break;
            }
            let accept = match kind {
                Reference::Named if scanned == 0 && c == '#' => {
                    kind = Reference::Decimal;
                    self.text.push(c);
                    continue;
                }
                Reference::Decimal if scanned == 0 && (c == 'x' || c == 'X') => {
                    kind = Reference::Hex;
                    self.text.push(c);
                    continue;
                }
                Reference::Named => c.is_ascii_alphanumeric(),
                Reference::Decimal => c.is_ascii_digit(),
                Reference::Hex => c.is_ascii_hexdigit(),
            };
            if !accept || scanned >= MAX_ENTITY_NAME {
                self.unread(c);
                break;
            }
            self.text.push(c);
            scanned += 1;
        }

        let reference = self.text.tail(start).to_owned();
        let digits = reference.trim_start_matches('&').trim_start_matches('#');
        let code = match kind {
            Reference::Named => entities::lookup(digits),
            Reference::Decimal => parse_code(digits, 10),
            Reference::Hex => parse_code(&digits[1..], 16),
        };

        let Some(mut code) = code.filter(|_| scanned > 0) else {
            // Unknown: stays literal.
            if terminated {
                self.text.push(';');
            }
            if scanned == 0 && kind == Reference::Named {
                self.report(diag, DiagnosticKind::UnescapedAmpersand, &reference);
            } else {
                self.report(diag, DiagnosticKind::UnknownEntity, &reference);
            }
            return;
        };

        let numeric = kind != Reference::Named;
        if !terminated {
            if !numeric && code >= 256 {
                // Likely a query parameter such as `&lang=`, not a reference.
                return;
            }
            let kind = if numeric {
                DiagnosticKind::MissingSemicolonNcr
            } else {
                DiagnosticKind::MissingSemicolon
            };
            self.report(diag, kind, &reference);
        }

        if numeric && (0x80..=0x9F).contains(&code) {
            match remap_vendor(code, self.input.encoding()) {
                Some(mapped) => {
                    self.report(diag, DiagnosticKind::VendorSpecificNcr, &reference);
                    code = mapped as u32;
                }
                None => {
                    self.report(diag, DiagnosticKind::InvalidNcr, &reference);
                    if self.config.replacement == ReplacementPolicy::Discard {
                        self.text.truncate(start);
                        return;
                    }
                    code = REPLACEMENT as u32;
                }
            }
        }

        if !numeric && digits == "apos" && !self.apos_defined() {
            self.report(diag, DiagnosticKind::AposUndefined, &reference);
        }

        let ch = match char::from_u32(code).filter(|&c| c != '\0') {
            Some(ch) => ch,
            None => {
                self.report(diag, DiagnosticKind::InvalidNcr, &reference);
                REPLACEMENT
            }
        };

        self.text.truncate(start);
        if code == NBSP && mode == LexMode::Preformatted {
            self.text.push(' ');
        } else {
            self.text.push(ch);
        }
    }

    fn apos_defined(&self) -> bool {
        self.config.xml_tags
            || self.config.xhtml_out
            || self.doctype.is_some_and(|v| v.is_xhtml())
    }
}
