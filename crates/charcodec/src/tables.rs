//! Single-byte legacy tables and vendor remapping.

use crate::Encoding;

/// What to do with a character that has no valid meaning in the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplacementPolicy {
    /// Drop the character.
    Discard,
    /// Replace it with U+FFFD (or `?` when the output cannot carry U+FFFD).
    #[default]
    Substitute,
}

/// Windows-1252 code points for 0x80..=0x9F; zero marks an unassigned slot.
pub(crate) const WIN1252_C1: [u16; 32] = [
    0x20AC, 0x0000, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, //
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0x0000, 0x017D, 0x0000, //
    0x0000, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, //
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x0000, 0x017E, 0x0178, //
];

/// MacRoman code points for 0x80..=0xFF.
pub(crate) const MAC_ROMAN_HIGH: [u16; 128] = [
    0x00C4, 0x00C5, 0x00C7, 0x00C9, 0x00D1, 0x00D6, 0x00DC, 0x00E1, //
    0x00E0, 0x00E2, 0x00E4, 0x00E3, 0x00E5, 0x00E7, 0x00E9, 0x00E8, //
    0x00EA, 0x00EB, 0x00ED, 0x00EC, 0x00EE, 0x00EF, 0x00F1, 0x00F3, //
    0x00F2, 0x00F4, 0x00F6, 0x00F5, 0x00FA, 0x00F9, 0x00FB, 0x00FC, //
    0x2020, 0x00B0, 0x00A2, 0x00A3, 0x00A7, 0x2022, 0x00B6, 0x00DF, //
    0x00AE, 0x00A9, 0x2122, 0x00B4, 0x00A8, 0x2260, 0x00C6, 0x00D8, //
    0x221E, 0x00B1, 0x2264, 0x2265, 0x00A5, 0x00B5, 0x2202, 0x2211, //
    0x220F, 0x03C0, 0x222B, 0x00AA, 0x00BA, 0x03A9, 0x00E6, 0x00F8, //
    0x00BF, 0x00A1, 0x00AC, 0x221A, 0x0192, 0x2248, 0x2206, 0x00AB, //
    0x00BB, 0x2026, 0x00A0, 0x00C0, 0x00C3, 0x00D5, 0x0152, 0x0153, //
    0x2013, 0x2014, 0x201C, 0x201D, 0x2018, 0x2019, 0x00F7, 0x25CA, //
    0x00FF, 0x0178, 0x2044, 0x20AC, 0x2039, 0x203A, 0xFB01, 0xFB02, //
    0x2021, 0x00B7, 0x201A, 0x201E, 0x2030, 0x00C2, 0x00CA, 0x00C1, //
    0x00CB, 0x00C8, 0x00CD, 0x00CE, 0x00CF, 0x00CC, 0x00D3, 0x00D4, //
    0xF8FF, 0x00D2, 0x00DA, 0x00DB, 0x00D9, 0x0131, 0x02C6, 0x02DC, //
    0x00AF, 0x02D8, 0x02D9, 0x02DA, 0x00B8, 0x02DD, 0x02DB, 0x02C7, //
];

/// ISO-8859-15 positions that differ from ISO-8859-1.
pub(crate) const LATIN0_DIFFS: [(u8, u16); 8] = [
    (0xA4, 0x20AC),
    (0xA6, 0x0160),
    (0xA8, 0x0161),
    (0xB4, 0x017D),
    (0xB8, 0x017E),
    (0xBC, 0x0152),
    (0xBD, 0x0153),
    (0xBE, 0x0178),
];

fn to_char(code: u16) -> Option<char> {
    if code == 0 {
        None
    } else {
        char::from_u32(u32::from(code))
    }
}

pub(crate) fn win1252_to_unicode(byte: u8) -> Option<char> {
    match byte {
        0x80..=0x9F => to_char(WIN1252_C1[usize::from(byte - 0x80)]),
        _ => Some(char::from(byte)),
    }
}

pub(crate) fn mac_roman_to_unicode(byte: u8) -> char {
    if byte < 0x80 {
        return char::from(byte);
    }
    // Every slot in the high half is assigned.
    to_char(MAC_ROMAN_HIGH[usize::from(byte - 0x80)]).unwrap_or(crate::REPLACEMENT)
}

pub(crate) fn latin0_to_unicode(byte: u8) -> char {
    LATIN0_DIFFS
        .iter()
        .find(|(b, _)| *b == byte)
        .and_then(|(_, code)| to_char(*code))
        .unwrap_or(char::from(byte))
}

pub(crate) fn unicode_to_win1252(ch: char) -> Option<u8> {
    let code = ch as u32;
    if code < 0x80 || (0xA0..=0xFF).contains(&code) {
        return u8::try_from(code).ok();
    }
    let pos = WIN1252_C1
        .iter()
        .position(|&c| c != 0 && u32::from(c) == code)?;
    u8::try_from(0x80 + pos).ok()
}

pub(crate) fn unicode_to_mac_roman(ch: char) -> Option<u8> {
    let code = ch as u32;
    if code < 0x80 {
        return u8::try_from(code).ok();
    }
    let pos = MAC_ROMAN_HIGH.iter().position(|&c| u32::from(c) == code)?;
    u8::try_from(0x80 + pos).ok()
}

pub(crate) fn unicode_to_latin0(ch: char) -> Option<u8> {
    let code = ch as u32;
    if let Some((byte, _)) = LATIN0_DIFFS.iter().find(|(_, c)| u32::from(*c) == code) {
        return Some(*byte);
    }
    if LATIN0_DIFFS.iter().any(|(b, _)| u32::from(*b) == code) {
        // Displaced Latin-1 characters (e.g. U+00A4) have no slot.
        return None;
    }
    u8::try_from(code).ok()
}

/// Remap a vendor-specific value in 0x80..=0x9F to its Unicode meaning.
///
/// Uses the MacRoman table when the document was read as MacRoman and the
/// Windows-1252 table otherwise. Returns `None` for values that are outside
/// the range or unassigned in the table.
pub fn remap_vendor(c: u32, input: Encoding) -> Option<char> {
    let byte = u8::try_from(c).ok().filter(|b| (0x80..=0x9F).contains(b))?;
    if input == Encoding::MacRoman {
        Some(mac_roman_to_unicode(byte))
    } else {
        win1252_to_unicode(byte)
    }
}
