//! Printing a document and lexing the result again yields the same tokens,
//! up to whitespace in text and how element ends were written.

use markup::{Config, Diagnostics, HtmlTagTable, IndentContent, parse, tidy};
use markup_test_support::{diff_lines, document_lines};

const INPUTS: &[&str] = &[
    "<div><p>Hello <b>world</b></p></div>",
    "<ul><li>one<li>two</ul>",
    "<pre>  a\n   b</pre>",
    "<p>x &lt; y &amp; z&nbsp;!</p>",
    "<html><head><title>T</title></head><body><p>a<br>b</p></body></html>",
    "<p class=\"a b\" id=x>t</p>",
    "<div><!-- note --><p>x</p></div>",
    "<p><?php echo 1; ?></p>",
    "<div><?php\n\n  echo 1;\n\n?><!--\n  keep\n\n  this  \n--></div>",
    "<script>if (a < b) x();</script>",
    "<p>the quick brown fox jumps over the lazy dog and keeps running far away</p>",
];

fn tokens(bytes: Vec<u8>, config: &Config) -> Vec<String> {
    let tags = HtmlTagTable::new();
    let mut diag = Diagnostics::default();
    let doc = parse(bytes, config, &tags, &mut diag);
    let lines = document_lines(&doc).expect("formatting a parsed document");
    normalize(lines, config.wrap_column == 0)
}

/// Whitespace in text is free to change. Comments, code and other opaque
/// regions must come back exactly unless wrapping may break them.
fn normalize(lines: Vec<String>, exact_markup: bool) -> Vec<String> {
    lines
        .into_iter()
        .filter_map(|line| {
            let Some((label, text)) = line
                .split_once(" text=\"")
                .and_then(|(label, rest)| Some((label, rest.strip_suffix('"')?)))
            else {
                return Some(line.trim_end_matches(" implicit").to_string());
            };
            if exact_markup && label != "TEXT" {
                return Some(line.clone());
            }
            let text = text.replace("\\n", " ");
            let words: Vec<&str> = text.split_whitespace().collect();
            if label == "TEXT" && words.is_empty() {
                return None;
            }
            Some(format!("{label} text=\"{}\"", words.join(" ")))
        })
        .collect()
}

fn check(config: &Config) {
    let tags = HtmlTagTable::new();
    for input in INPUTS {
        let before = tokens(input.as_bytes().to_vec(), config);
        let mut diag = Diagnostics::default();
        let printed = tidy(input.as_bytes().to_vec(), config, &tags, &mut diag);
        let after = tokens(printed.clone(), config);
        assert!(
            before == after,
            "round trip changed tokens for {input:?}\nprinted:\n{}\n{}",
            String::from_utf8_lossy(&printed),
            diff_lines(&before, &after)
        );
    }
}

#[test]
fn round_trip_default_layout() {
    check(&Config::default());
}

#[test]
fn round_trip_indented_and_wrapped() {
    check(&Config {
        indent_content: IndentContent::Auto,
        wrap_column: 20,
        ..Config::default()
    });
}

#[test]
fn round_trip_without_wrapping() {
    check(&Config {
        wrap_column: 0,
        indent_content: IndentContent::Yes,
        ..Config::default()
    });
}
