#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{Config, Diagnostics, HtmlTagTable, IndentContent, tidy};

fuzz_target!(|data: &[u8]| {
    let Some((&selector, input)) = data.split_first() else {
        return;
    };
    let config = Config {
        wrap_column: usize::from(selector & 0x3f),
        indent_content: if selector & 0x40 != 0 {
            IndentContent::Auto
        } else {
            IndentContent::No
        },
        xhtml_out: selector & 0x80 != 0,
        ..Config::default()
    };
    let tags = HtmlTagTable::new();
    let mut diag = Diagnostics::new(16);
    let out = tidy(input.to_vec(), &config, &tags, &mut diag);
    assert!(std::str::from_utf8(&out).is_ok());
});
