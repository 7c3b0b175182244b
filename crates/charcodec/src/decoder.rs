use crate::iso2022::{self, Iso2022State};
use crate::utf16::{ByteOrder, decode_utf16};
use crate::{Bom, CodecError, Encoding, REPLACEMENT, tables, utf8};

/// One decoded character and how many bytes it took.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub ch: char,
    /// Always at least one for non-empty input.
    pub consumed: usize,
    /// Set when `ch` is a substitute for malformed input.
    pub error: Option<CodecError>,
}

impl Decoded {
    pub fn ok(ch: char, consumed: usize) -> Self {
        Self {
            ch,
            consumed,
            error: None,
        }
    }
}

/// Stateful byte-to-char decoder for a single stream.
#[derive(Clone, Debug)]
pub struct Decoder {
    encoding: Encoding,
    iso2022: Iso2022State,
}

impl Decoder {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            iso2022: Iso2022State::default(),
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Lock the decoder to the encoding a byte order mark announced.
    pub fn apply_bom(&mut self, bom: Bom) {
        log::debug!(target: "charcodec", "byte order mark selects {}", bom.encoding());
        self.encoding = bom.encoding();
    }

    /// Decode one character from the front of `bytes`.
    ///
    /// Never fails: malformed input yields U+FFFD plus a [`CodecError`] and
    /// at least one byte is always consumed. `bytes` must be non-empty.
    pub fn decode(&mut self, bytes: &[u8]) -> Decoded {
        debug_assert!(!bytes.is_empty(), "decode needs at least one byte");
        let Some(&first) = bytes.first() else {
            return Decoded {
                ch: REPLACEMENT,
                consumed: 0,
                error: None,
            };
        };
        match self.encoding {
            Encoding::Raw | Encoding::Ascii | Encoding::Latin1 => {
                Decoded::ok(char::from(first), 1)
            }
            Encoding::Latin0 => Decoded::ok(tables::latin0_to_unicode(first), 1),
            Encoding::Win1252 => match tables::win1252_to_unicode(first) {
                Some(ch) => Decoded::ok(ch, 1),
                None => Decoded {
                    ch: REPLACEMENT,
                    consumed: 1,
                    error: Some(CodecError::UnmappedByte(first)),
                },
            },
            Encoding::MacRoman => Decoded::ok(tables::mac_roman_to_unicode(first), 1),
            Encoding::Iso2022 => Decoded::ok(iso2022::decode_byte(&mut self.iso2022, first), 1),
            Encoding::Utf8 => utf8::decode_utf8(bytes),
            Encoding::Utf16Le => decode_utf16(bytes, ByteOrder::Little),
            Encoding::Utf16Be | Encoding::Utf16 => decode_utf16(bytes, ByteOrder::Big),
            #[cfg(feature = "big5")]
            Encoding::Big5 => crate::cjk::decode_double_byte(self.encoding, bytes),
            #[cfg(feature = "shiftjis")]
            Encoding::ShiftJis => crate::cjk::decode_double_byte(self.encoding, bytes),
        }
    }
}
