//! Big5 and Shift_JIS pass-through.
//!
//! No conversion tables are carried. A double-byte sequence is kept as its
//! raw 16-bit value, parked in plane 15 private use so it survives the
//! pipeline as a `char` and encodes back to the same two bytes.

use crate::{Decoded, Encoding};

/// First code point of the private-use block carrying raw double-byte values.
pub const RAW_DOUBLE_BYTE_BASE: u32 = 0xF_0000;

pub fn to_raw_double_byte(value: u16) -> char {
    // Plane 15 is entirely valid scalar space.
    char::from_u32(RAW_DOUBLE_BYTE_BASE + u32::from(value)).unwrap_or(crate::REPLACEMENT)
}

pub fn from_raw_double_byte(ch: char) -> Option<u16> {
    let code = ch as u32;
    code.checked_sub(RAW_DOUBLE_BYTE_BASE)
        .and_then(|v| u16::try_from(v).ok())
}

fn is_single_byte(encoding: Encoding, lead: u8) -> bool {
    if lead < 0x80 {
        return true;
    }
    match encoding {
        #[cfg(feature = "shiftjis")]
        Encoding::ShiftJis => (0xA1..=0xDF).contains(&lead),
        _ => false,
    }
}

pub(crate) fn decode_double_byte(encoding: Encoding, bytes: &[u8]) -> Decoded {
    let lead = bytes[0];
    if is_single_byte(encoding, lead) {
        return Decoded::ok(char::from(lead), 1);
    }
    match bytes.get(1) {
        Some(&trail) => Decoded::ok(to_raw_double_byte(u16::from_be_bytes([lead, trail])), 2),
        None => Decoded {
            ch: crate::REPLACEMENT,
            consumed: 1,
            error: Some(crate::CodecError::UnmappedByte(lead)),
        },
    }
}

pub(crate) fn encode_double_byte(ch: char, out: &mut Vec<u8>) -> bool {
    if let Ok(byte) = u8::try_from(ch as u32) {
        out.push(byte);
        return true;
    }
    match from_raw_double_byte(ch) {
        Some(value) => {
            out.extend_from_slice(&value.to_be_bytes());
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "big5")]
    #[test]
    fn big5_pair_round_trips() {
        let d = decode_double_byte(Encoding::Big5, &[0xA4, 0x40, b'a']);
        assert_eq!(d.consumed, 2);
        assert_eq!(from_raw_double_byte(d.ch), Some(0xA440));
        let mut out = Vec::new();
        assert!(encode_double_byte(d.ch, &mut out));
        assert_eq!(out, [0xA4, 0x40]);
    }

    #[cfg(feature = "shiftjis")]
    #[test]
    fn shiftjis_half_width_katakana_is_single_byte() {
        let d = decode_double_byte(Encoding::ShiftJis, &[0xB1, 0x82]);
        assert_eq!((d.ch, d.consumed), ('\u{B1}', 1));
        let d = decode_double_byte(Encoding::ShiftJis, &[0x82, 0xA0]);
        assert_eq!(from_raw_double_byte(d.ch), Some(0x82A0));
    }

    #[test]
    fn raw_values_outside_the_block_are_rejected() {
        assert_eq!(from_raw_double_byte('a'), None);
        assert_eq!(from_raw_double_byte('\u{10FFFD}'), None);
    }
}
