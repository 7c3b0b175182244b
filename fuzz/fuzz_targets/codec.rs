#![no_main]

use charcodec::{Decoder, Encoder, Encoding};
use libfuzzer_sys::fuzz_target;

const ENCODINGS: [Encoding; 10] = [
    Encoding::Raw,
    Encoding::Ascii,
    Encoding::Latin0,
    Encoding::Latin1,
    Encoding::Utf8,
    Encoding::Utf16Le,
    Encoding::Utf16Be,
    Encoding::Iso2022,
    Encoding::MacRoman,
    Encoding::Win1252,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, mut bytes)) = data.split_first() else {
        return;
    };
    let encoding = ENCODINGS[usize::from(selector) % ENCODINGS.len()];
    let mut decoder = Decoder::new(encoding);
    let mut encoder = Encoder::new(encoding);
    let mut out = Vec::new();
    while !bytes.is_empty() {
        let decoded = decoder.decode(bytes);
        assert!(decoded.consumed > 0 && decoded.consumed <= bytes.len());
        bytes = &bytes[decoded.consumed..];
        let _ = encoder.encode(decoded.ch, &mut out);
    }
});
