//! Strict UTF-8 decoding.
//!
//! Decoding is driven by a table of the legal (length, first byte,
//! continuation byte) combinations from RFC 3629. Anything outside the table
//! (overlong forms, surrogates, values above U+10FFFF, the retired 5/6-byte
//! forms, stray continuation bytes) decodes to U+FFFD and makes progress.

use crate::{CodecError, Decoded, REPLACEMENT};

#[derive(Clone, Copy)]
struct Utf8Row {
    lead: (u8, u8),
    cont: [(u8, u8); 3],
    len: usize,
}

const ANY: (u8, u8) = (0x80, 0xBF);
const NONE: (u8, u8) = (0, 0);

const LEGAL_SEQUENCES: [Utf8Row; 8] = [
    Utf8Row { lead: (0x00, 0x7F), cont: [NONE, NONE, NONE], len: 1 },
    Utf8Row { lead: (0xC2, 0xDF), cont: [ANY, NONE, NONE], len: 2 },
    Utf8Row { lead: (0xE0, 0xE0), cont: [(0xA0, 0xBF), ANY, NONE], len: 3 },
    Utf8Row { lead: (0xE1, 0xEC), cont: [ANY, ANY, NONE], len: 3 },
    Utf8Row { lead: (0xED, 0xED), cont: [(0x80, 0x9F), ANY, NONE], len: 3 },
    Utf8Row { lead: (0xEE, 0xEF), cont: [ANY, ANY, NONE], len: 3 },
    Utf8Row { lead: (0xF0, 0xF0), cont: [(0x90, 0xBF), ANY, ANY], len: 4 },
    Utf8Row { lead: (0xF1, 0xF4), cont: [ANY, ANY, ANY], len: 4 },
];

// U+100000..=U+10FFFF: F4 only takes 80..8F as its first continuation.
const F4_FIRST_CONT: (u8, u8) = (0x80, 0x8F);

fn row_for(lead: u8) -> Option<Utf8Row> {
    let mut row = *LEGAL_SEQUENCES
        .iter()
        .find(|row| row.lead.0 <= lead && lead <= row.lead.1)?;
    if lead == 0xF4 {
        row.cont[0] = F4_FIRST_CONT;
    }
    Some(row)
}

/// Decode one scalar from the front of `bytes`.
///
/// `bytes` must be non-empty. On a malformed sequence the maximal invalid
/// prefix (at least one byte) is consumed and U+FFFD is returned together
/// with [`CodecError::InvalidUtf8`].
pub fn decode_utf8(bytes: &[u8]) -> Decoded {
    debug_assert!(!bytes.is_empty(), "decode_utf8 needs at least one byte");
    let lead = bytes[0];
    let Some(row) = row_for(lead) else {
        return invalid(&bytes[..1]);
    };
    if row.len == 1 {
        return Decoded::ok(char::from(lead), 1);
    }

    let mut value = u32::from(lead) & (0x7F >> row.len);
    for i in 1..row.len {
        let Some(&b) = bytes.get(i) else {
            // Truncated at end of input.
            return invalid(&bytes[..i]);
        };
        let (lo, hi) = row.cont[i - 1];
        if b < lo || b > hi {
            return invalid(&bytes[..i]);
        }
        value = (value << 6) | (u32::from(b) & 0x3F);
    }

    match char::from_u32(value) {
        Some(ch) => Decoded::ok(ch, row.len),
        // Unreachable given the table, but stay total.
        None => invalid(&bytes[..row.len]),
    }
}

fn invalid(consumed: &[u8]) -> Decoded {
    Decoded {
        ch: REPLACEMENT,
        consumed: consumed.len(),
        error: Some(CodecError::InvalidUtf8 {
            bytes: consumed.to_vec(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck::QuickCheck;

    fn decode_all(mut bytes: &[u8]) -> (String, usize) {
        let mut out = String::new();
        let mut errors = 0;
        while !bytes.is_empty() {
            let d = decode_utf8(bytes);
            assert!(d.consumed > 0, "decoder must make progress");
            if d.error.is_some() {
                errors += 1;
            }
            out.push(d.ch);
            bytes = &bytes[d.consumed..];
        }
        (out, errors)
    }

    #[test]
    fn decodes_valid_sequences() {
        let text = "a×€😀\u{10FFFF}";
        let (out, errors) = decode_all(text.as_bytes());
        assert_eq!(out, text);
        assert_eq!(errors, 0);
    }

    #[test]
    fn rejects_overlong_forms() {
        assert_eq!(decode_utf8(&[0xC0, 0xAF]).ch, REPLACEMENT);
        assert_eq!(decode_utf8(&[0xC1, 0xBF]).ch, REPLACEMENT);
        assert_eq!(decode_utf8(&[0xE0, 0x80, 0xAF]).ch, REPLACEMENT);
        assert_eq!(decode_utf8(&[0xF0, 0x80, 0x80, 0xAF]).ch, REPLACEMENT);
    }

    #[test]
    fn rejects_surrogates_and_out_of_range() {
        let d = decode_utf8(&[0xED, 0xA0, 0x80]);
        assert_eq!(d.ch, REPLACEMENT);
        assert_eq!(d.consumed, 1);
        assert_eq!(decode_utf8(&[0xF4, 0x90, 0x80, 0x80]).ch, REPLACEMENT);
        assert_eq!(decode_utf8(&[0xF5, 0x80, 0x80, 0x80]).ch, REPLACEMENT);
    }

    #[test]
    fn rejects_five_and_six_byte_forms() {
        let (out, errors) = decode_all(&[0xF8, 0x88, 0x80, 0x80, 0x80]);
        assert!(out.chars().all(|c| c == REPLACEMENT));
        assert_eq!(errors, 5);
        assert_eq!(decode_utf8(&[0xFC, 0x84, 0x80, 0x80, 0x80, 0x80]).consumed, 1);
    }

    #[test]
    fn truncated_sequence_consumes_valid_prefix() {
        let d = decode_utf8(&[0xE2, 0x82]);
        assert_eq!(d.ch, REPLACEMENT);
        assert_eq!(d.consumed, 2);
        assert_eq!(
            d.error,
            Some(CodecError::InvalidUtf8 {
                bytes: vec![0xE2, 0x82]
            })
        );
    }

    #[test]
    fn invalid_continuation_does_not_swallow_next_char() {
        let (out, errors) = decode_all(&[0xE2, 0x82, b'a']);
        assert_eq!(out, "\u{FFFD}a");
        assert_eq!(errors, 1);
    }

    #[test]
    fn decode_is_total_quickcheck() {
        fn prop(bytes: Vec<u8>) -> bool {
            let mut rest = bytes.as_slice();
            while !rest.is_empty() {
                let d = decode_utf8(rest);
                if d.consumed == 0 || d.consumed > rest.len() {
                    return false;
                }
                let c = d.ch as u32;
                if c > 0x10FFFF || (0xD800..=0xDFFF).contains(&c) {
                    return false;
                }
                if d.error.is_some() && d.ch != REPLACEMENT {
                    return false;
                }
                rest = &rest[d.consumed..];
            }
            true
        }
        QuickCheck::new()
            .tests(2_000)
            .quickcheck(prop as fn(Vec<u8>) -> bool);
    }

    #[test]
    fn agrees_with_std_on_valid_input_quickcheck() {
        fn prop(text: String) -> bool {
            decode_all(text.as_bytes()) == (text.clone(), 0)
        }
        QuickCheck::new()
            .tests(1_000)
            .quickcheck(prop as fn(String) -> bool);
    }
}
