/// Recoverable codec failures.
///
/// A decoder or encoder that returns one of these has already produced a
/// substitute (or dropped the offending unit); the error only describes what
/// happened so the caller can report it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid UTF-8 sequence {bytes:02X?}")]
    InvalidUtf8 { bytes: Vec<u8> },
    #[error("invalid UTF-16 value U+{0:04X}")]
    InvalidUtf16(u32),
    #[error("byte 0x{0:02X} has no mapping in this encoding")]
    UnmappedByte(u8),
    #[error("{ch:?} cannot be encoded in {encoding}")]
    Unencodable {
        ch: char,
        encoding: crate::Encoding,
    },
}
