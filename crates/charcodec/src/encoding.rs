use std::fmt;
use std::str::FromStr;

/// Character encodings understood by the codec layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Bytes pass through unchanged as U+0000..=U+00FF.
    Raw,
    Ascii,
    /// ISO-8859-15.
    Latin0,
    /// ISO-8859-1.
    Latin1,
    Utf8,
    Utf16Le,
    Utf16Be,
    /// UTF-16 with the byte order taken from a BOM (big-endian otherwise).
    Utf16,
    Iso2022,
    MacRoman,
    Win1252,
    #[cfg(feature = "big5")]
    Big5,
    #[cfg(feature = "shiftjis")]
    ShiftJis,
}

/// Byte order marks recognised on input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bom {
    Utf8,
    Utf16Le,
    Utf16Be,
}

impl Bom {
    /// Sniff a BOM from the first bytes of a stream.
    pub fn sniff(bytes: &[u8]) -> Option<Bom> {
        match bytes {
            [0xEF, 0xBB, 0xBF, ..] => Some(Bom::Utf8),
            [0xFF, 0xFE, ..] => Some(Bom::Utf16Le),
            [0xFE, 0xFF, ..] => Some(Bom::Utf16Be),
            _ => None,
        }
    }

    pub fn len(self) -> usize {
        match self {
            Bom::Utf8 => 3,
            Bom::Utf16Le | Bom::Utf16Be => 2,
        }
    }

    pub fn encoding(self) -> Encoding {
        match self {
            Bom::Utf8 => Encoding::Utf8,
            Bom::Utf16Le => Encoding::Utf16Le,
            Bom::Utf16Be => Encoding::Utf16Be,
        }
    }
}

impl Encoding {
    /// Unicode family encodings are the ones that get BOM sniffing.
    pub fn is_unicode(self) -> bool {
        matches!(
            self,
            Encoding::Utf8 | Encoding::Utf16 | Encoding::Utf16Le | Encoding::Utf16Be
        )
    }

    pub fn is_utf16(self) -> bool {
        matches!(
            self,
            Encoding::Utf16 | Encoding::Utf16Le | Encoding::Utf16Be
        )
    }

    /// Whether a BOM-detected encoding agrees with this configured one.
    pub fn accepts_bom(self, bom: Bom) -> bool {
        match (self, bom) {
            (Encoding::Utf8, Bom::Utf8) => true,
            (Encoding::Utf16, Bom::Utf16Le | Bom::Utf16Be) => true,
            (Encoding::Utf16Le, Bom::Utf16Le) => true,
            (Encoding::Utf16Be, Bom::Utf16Be) => true,
            _ => false,
        }
    }

    /// Double-byte legacy encodings whose raw values travel as private-use chars.
    pub fn is_double_byte(self) -> bool {
        match self {
            #[cfg(feature = "big5")]
            Encoding::Big5 => true,
            #[cfg(feature = "shiftjis")]
            Encoding::ShiftJis => true,
            _ => false,
        }
    }

    /// Encodings whose decoder already accounts for the 0x80..=0x9F range,
    /// so the input stream must not vendor-remap those values again.
    pub fn decodes_c1_range(self) -> bool {
        matches!(
            self,
            Encoding::Raw | Encoding::Win1252 | Encoding::MacRoman | Encoding::Iso2022
        ) || self.is_double_byte()
    }

    pub fn label(self) -> &'static str {
        match self {
            Encoding::Raw => "raw",
            Encoding::Ascii => "ascii",
            Encoding::Latin0 => "latin0",
            Encoding::Latin1 => "latin1",
            Encoding::Utf8 => "utf8",
            Encoding::Utf16Le => "utf16le",
            Encoding::Utf16Be => "utf16be",
            Encoding::Utf16 => "utf16",
            Encoding::Iso2022 => "iso2022",
            Encoding::MacRoman => "mac",
            Encoding::Win1252 => "win1252",
            #[cfg(feature = "big5")]
            Encoding::Big5 => "big5",
            #[cfg(feature = "shiftjis")]
            Encoding::ShiftJis => "shiftjis",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown character encoding label '{0}'")]
pub struct EncodingLabelError(pub String);

impl FromStr for Encoding {
    type Err = EncodingLabelError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let folded = label.trim().to_ascii_lowercase();
        let enc = match folded.as_str() {
            "raw" => Encoding::Raw,
            "ascii" | "us-ascii" => Encoding::Ascii,
            "latin0" | "iso-8859-15" | "iso8859-15" => Encoding::Latin0,
            "latin1" | "iso-8859-1" | "iso8859-1" => Encoding::Latin1,
            "utf8" | "utf-8" => Encoding::Utf8,
            "utf16le" | "utf-16le" => Encoding::Utf16Le,
            "utf16be" | "utf-16be" => Encoding::Utf16Be,
            "utf16" | "utf-16" => Encoding::Utf16,
            "iso2022" | "iso-2022" => Encoding::Iso2022,
            "mac" | "macroman" | "macintosh" => Encoding::MacRoman,
            "win1252" | "windows-1252" | "cp1252" => Encoding::Win1252,
            #[cfg(feature = "big5")]
            "big5" => Encoding::Big5,
            #[cfg(feature = "shiftjis")]
            "shiftjis" | "shift_jis" | "sjis" => Encoding::ShiftJis,
            _ => return Err(EncodingLabelError(label.to_string())),
        };
        Ok(enc)
    }
}
