//! ISO-2022 escape-sequence tracking.
//!
//! Only the shift state matters here: bytes are passed through and the state
//! machine decides whether they belong to the ASCII or the non-ASCII plane.

const ESC: u32 = 0x1B;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Iso2022State {
    #[default]
    Ascii,
    Esc,
    EscD,
    EscDP,
    EscP,
    NonAscii,
}

impl Iso2022State {
    /// Advance the state for one value. Returns `true` when the value is a
    /// text character in the non-ASCII plane (and so must be shifted).
    pub(crate) fn step(&mut self, c: u32) -> bool {
        if c == ESC {
            *self = Iso2022State::Esc;
            return false;
        }
        match *self {
            Iso2022State::Esc => {
                *self = match c {
                    0x24 => Iso2022State::EscD,  // '$'
                    0x28 => Iso2022State::EscP,  // '('
                    _ => Iso2022State::Ascii,
                };
                false
            }
            Iso2022State::EscD => {
                *self = if c == 0x28 {
                    Iso2022State::EscDP
                } else {
                    Iso2022State::NonAscii
                };
                false
            }
            Iso2022State::EscDP => {
                *self = Iso2022State::NonAscii;
                false
            }
            Iso2022State::EscP => {
                *self = Iso2022State::Ascii;
                false
            }
            Iso2022State::NonAscii => true,
            Iso2022State::Ascii => false,
        }
    }
}

pub(crate) fn decode_byte(state: &mut Iso2022State, byte: u8) -> char {
    let mut c = u32::from(byte);
    if state.step(c) {
        c |= 0x80;
    }
    char::from_u32(c).unwrap_or(crate::REPLACEMENT)
}

/// Encode one char. Returns `None` for values outside the byte range.
pub(crate) fn encode_char(state: &mut Iso2022State, ch: char) -> Option<u8> {
    let mut c = u8::try_from(ch as u32).ok()?;
    if state.step(u32::from(c)) {
        c &= 0x7F;
    }
    Some(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8]) -> Vec<u32> {
        let mut state = Iso2022State::default();
        bytes
            .iter()
            .map(|&b| decode_byte(&mut state, b) as u32)
            .collect()
    }

    #[test]
    fn ascii_passes_through() {
        assert_eq!(decode(b"ab"), vec![0x61, 0x62]);
    }

    #[test]
    fn esc_dollar_b_shifts_to_non_ascii() {
        let out = decode(b"\x1b$B\x30\x21\x1b(Bz");
        assert_eq!(out, vec![0x1B, 0x24, 0x42, 0xB0, 0xA1, 0x1B, 0x28, 0x42, 0x7A]);
    }

    #[test]
    fn esc_dollar_paren_takes_one_more_designator() {
        let out = decode(b"\x1b$(D\x21");
        assert_eq!(out.last(), Some(&0xA1));
    }

    #[test]
    fn unknown_escape_returns_to_ascii() {
        let out = decode(b"\x1bNa");
        assert_eq!(out, vec![0x1B, 0x4E, 0x61]);
    }

    #[test]
    fn encode_inverts_decode() {
        let bytes = b"x\x1b$B\x30\x21\x1b(By";
        let chars: Vec<char> = {
            let mut state = Iso2022State::default();
            bytes.iter().map(|&b| decode_byte(&mut state, b)).collect()
        };
        let mut state = Iso2022State::default();
        let back: Vec<u8> = chars
            .iter()
            .filter_map(|&ch| encode_char(&mut state, ch))
            .collect();
        assert_eq!(back, bytes);
    }
}
