//! UTF-16 decoding and encoding with surrogate-pair validation.

use crate::{CodecError, Decoded, REPLACEMENT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ByteOrder {
    Little,
    Big,
}

const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

/// Combine a surrogate pair into a scalar value.
///
/// Returns `None` when `hi`/`lo` are not a high/low pair or when the result is
/// a noncharacter ending in `FFFE`/`FFFF`.
pub fn combine_surrogates(hi: u32, lo: u32) -> Option<char> {
    if !HIGH_SURROGATES.contains(&hi) || !LOW_SURROGATES.contains(&lo) {
        return None;
    }
    let value = 0x10000 + (hi - 0xD800) * 0x400 + (lo - 0xDC00);
    if value & 0xFFFE == 0xFFFE {
        return None;
    }
    char::from_u32(value)
}

fn unit(bytes: &[u8], order: ByteOrder) -> Option<u32> {
    let pair = [*bytes.first()?, *bytes.get(1)?];
    Some(u32::from(match order {
        ByteOrder::Little => u16::from_le_bytes(pair),
        ByteOrder::Big => u16::from_be_bytes(pair),
    }))
}

pub(crate) fn decode_utf16(bytes: &[u8], order: ByteOrder) -> Decoded {
    let Some(first) = unit(bytes, order) else {
        // Odd trailing byte.
        return Decoded {
            ch: REPLACEMENT,
            consumed: bytes.len().max(1),
            error: Some(CodecError::InvalidUtf16(bytes.first().copied().map_or(0, u32::from))),
        };
    };

    if LOW_SURROGATES.contains(&first) {
        return invalid(first, 2);
    }
    if !HIGH_SURROGATES.contains(&first) {
        if first & 0xFFFE == 0xFFFE {
            return invalid(first, 2);
        }
        return match char::from_u32(first) {
            Some(ch) => Decoded::ok(ch, 2),
            None => invalid(first, 2),
        };
    }

    match unit(&bytes[2..], order) {
        Some(second) if LOW_SURROGATES.contains(&second) => {
            match combine_surrogates(first, second) {
                Some(ch) => Decoded::ok(ch, 4),
                None => invalid(0x10000 + (first - 0xD800) * 0x400 + (second - 0xDC00), 4),
            }
        }
        // Unpaired high surrogate: leave the following unit for the next call.
        _ => invalid(first, 2),
    }
}

fn invalid(value: u32, consumed: usize) -> Decoded {
    Decoded {
        ch: REPLACEMENT,
        consumed,
        error: Some(CodecError::InvalidUtf16(value)),
    }
}

pub(crate) fn encode_utf16(ch: char, order: ByteOrder, out: &mut Vec<u8>) {
    let mut units = [0u16; 2];
    for unit in ch.encode_utf16(&mut units) {
        match order {
            ByteOrder::Little => out.extend_from_slice(&unit.to_le_bytes()),
            ByteOrder::Big => out.extend_from_slice(&unit.to_be_bytes()),
        }
    }
}
