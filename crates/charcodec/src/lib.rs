//! Character codecs for the markup pipeline.
//!
//! A [`Decoder`] turns bytes into Unicode scalar values one character at a
//! time and an [`Encoder`] turns scalars back into bytes. Both are stateful
//! (ISO-2022 shift state, UTF-16 byte order) and both recover locally from
//! malformed data: a decode never fails, it substitutes U+FFFD and reports a
//! [`CodecError`] alongside the substitute.

mod decoder;
mod encoder;
mod encoding;
mod error;
mod iso2022;
mod tables;
mod utf16;
mod utf8;

#[cfg(any(feature = "big5", feature = "shiftjis"))]
mod cjk;

pub use decoder::{Decoded, Decoder};
pub use encoder::Encoder;
pub use encoding::{Bom, Encoding, EncodingLabelError};
pub use error::CodecError;
pub use tables::{ReplacementPolicy, remap_vendor};
pub use utf16::combine_surrogates;
pub use utf8::decode_utf8;

/// Replacement character substituted for undecodable input.
pub const REPLACEMENT: char = '\u{FFFD}';

/// U+FEFF, written at the start of Unicode output when requested.
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

#[cfg(any(feature = "big5", feature = "shiftjis"))]
pub use cjk::{RAW_DOUBLE_BYTE_BASE, from_raw_double_byte, to_raw_double_byte};
