use crate::iso2022::{self, Iso2022State};
use crate::utf16::{ByteOrder, encode_utf16};
use crate::{CodecError, Encoding, REPLACEMENT, tables};

/// Stateful char-to-byte encoder for a single output stream.
#[derive(Clone, Debug)]
pub struct Encoder {
    encoding: Encoding,
    iso2022: Iso2022State,
}

impl Encoder {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            iso2022: Iso2022State::default(),
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Whether `ch` has a representation in the output encoding.
    pub fn can_encode(&self, ch: char) -> bool {
        let code = ch as u32;
        match self.encoding {
            Encoding::Ascii => code < 0x80,
            Encoding::Raw | Encoding::Latin1 | Encoding::Iso2022 => code < 0x100,
            Encoding::Latin0 => tables::unicode_to_latin0(ch).is_some(),
            Encoding::Win1252 => tables::unicode_to_win1252(ch).is_some(),
            Encoding::MacRoman => tables::unicode_to_mac_roman(ch).is_some(),
            Encoding::Utf8 | Encoding::Utf16 | Encoding::Utf16Le | Encoding::Utf16Be => true,
            #[cfg(feature = "big5")]
            Encoding::Big5 => code < 0x100 || crate::cjk::from_raw_double_byte(ch).is_some(),
            #[cfg(feature = "shiftjis")]
            Encoding::ShiftJis => code < 0x100 || crate::cjk::from_raw_double_byte(ch).is_some(),
        }
    }

    /// Write the byte order mark for Unicode outputs; other encodings have none.
    pub fn write_bom(&mut self, out: &mut Vec<u8>) {
        if self.encoding.is_unicode() {
            self.encode_known(crate::BYTE_ORDER_MARK, out);
        }
    }

    /// Encode one character onto `out`.
    ///
    /// When `ch` has no representation a substitute is written instead
    /// (U+FFFD if the encoding can carry it, `?` otherwise) and the failure
    /// is returned so the caller can report it.
    pub fn encode(&mut self, ch: char, out: &mut Vec<u8>) -> Result<(), CodecError> {
        if self.encode_known(ch, out) {
            return Ok(());
        }
        let substitute = if self.can_encode(REPLACEMENT) {
            REPLACEMENT
        } else {
            '?'
        };
        self.encode_known(substitute, out);
        Err(CodecError::Unencodable {
            ch,
            encoding: self.encoding,
        })
    }

    fn encode_known(&mut self, ch: char, out: &mut Vec<u8>) -> bool {
        let byte = match self.encoding {
            Encoding::Utf8 => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                return true;
            }
            Encoding::Utf16 | Encoding::Utf16Be => {
                encode_utf16(ch, ByteOrder::Big, out);
                return true;
            }
            Encoding::Utf16Le => {
                encode_utf16(ch, ByteOrder::Little, out);
                return true;
            }
            Encoding::Ascii => u8::try_from(ch as u32).ok().filter(u8::is_ascii),
            Encoding::Raw | Encoding::Latin1 => u8::try_from(ch as u32).ok(),
            Encoding::Latin0 => tables::unicode_to_latin0(ch),
            Encoding::Win1252 => tables::unicode_to_win1252(ch),
            Encoding::MacRoman => tables::unicode_to_mac_roman(ch),
            Encoding::Iso2022 => iso2022::encode_char(&mut self.iso2022, ch),
            #[cfg(feature = "big5")]
            Encoding::Big5 => return crate::cjk::encode_double_byte(ch, out),
            #[cfg(feature = "shiftjis")]
            Encoding::ShiftJis => return crate::cjk::encode_double_byte(ch, out),
        };
        match byte {
            Some(b) => {
                out.push(b);
                true
            }
            None => false,
        }
    }
}
