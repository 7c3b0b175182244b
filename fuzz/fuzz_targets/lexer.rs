#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{Config, Diagnostics, Encoding, HtmlTagTable, LexMode, Lexer};

const MODES: [LexMode; 3] = [
    LexMode::IgnoreWhitespace,
    LexMode::MixedContent,
    LexMode::Preformatted,
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, input)) = data.split_first() else {
        return;
    };
    let config = Config {
        input_encoding: if selector & 0x80 != 0 {
            Encoding::Win1252
        } else {
            Encoding::Utf8
        },
        xml_tags: selector & 0x40 != 0,
        ..Config::default()
    };
    let tags = HtmlTagTable::new();
    let mut diag = Diagnostics::new(16);
    let mut lexer = Lexer::new(input.to_vec(), &config, &tags);
    let mut step = usize::from(selector);
    while let Some(token) = lexer.next_token(MODES[step % MODES.len()], &mut diag) {
        assert!(token.span.end <= lexer.text().len());
        step = step.wrapping_add(1);
    }
});
