use quickcheck::QuickCheck;

use super::*;
use crate::config::Newline;
use crate::diag::Diagnostics;
use crate::tags::HtmlTagTable;
use charcodec::Encoding;

fn print_with(input: &str, config: &Config) -> (String, Diagnostics) {
    let tags = HtmlTagTable::new();
    let mut diag = Diagnostics::default();
    let out = crate::tidy(input.as_bytes().to_vec(), config, &tags, &mut diag);
    let text = String::from_utf8(out).expect("utf-8 output");
    (text, diag)
}

fn print(input: &str) -> String {
    print_with(input, &Config::default()).0
}

#[test]
fn paragraph_with_entity() {
    let config = Config {
        output_encoding: Encoding::Ascii,
        ..Config::default()
    };
    let (out, diag) = print_with("<p>a &amp; b</p>", &config);
    assert_eq!(out, "<p>a &amp; b</p>\n");
    assert_eq!(diag.warnings(), 0);
}

#[test]
fn long_text_wraps_at_last_space() {
    let config = Config {
        wrap_column: 20,
        ..Config::default()
    };
    let (out, _) = print_with("<p>one two three four five six</p>", &config);
    assert_eq!(out, "<p>one two three\nfour five six</p>\n");
}

#[test]
fn zero_wrap_column_never_wraps() {
    let config = Config {
        wrap_column: 0,
        ..Config::default()
    };
    let input = format!("<p>{}</p>", ["word"; 40].join(" "));
    let (out, _) = print_with(&input, &config);
    assert_eq!(out.lines().count(), 1);
}

#[test]
fn block_children_start_their_own_lines() {
    assert_eq!(
        print("<div><p>a</p><p>b</p></div>"),
        "<div>\n<p>a</p>\n<p>b</p>\n</div>\n"
    );
}

#[test]
fn auto_indent_nests_block_content() {
    let config = Config {
        indent_content: IndentContent::Auto,
        ..Config::default()
    };
    let (out, _) = print_with("<div><p>a</p><p>b</p></div>", &config);
    assert_eq!(out, "<div>\n  <p>a</p>\n  <p>b</p>\n</div>\n");
}

#[test]
fn inline_content_stays_on_the_line() {
    assert_eq!(print("<p>a <b>bold</b> c</p>"), "<p>a <b>bold</b> c</p>\n");
}

#[test]
fn preformatted_text_is_verbatim() {
    let config = Config {
        indent_content: IndentContent::Auto,
        ..Config::default()
    };
    let (out, _) = print_with("<div><pre>  a\n   b</pre></div>", &config);
    assert_eq!(out, "<div>\n  <pre>  a\n   b</pre>\n</div>\n");
}

#[test]
fn raw_text_is_not_escaped() {
    assert_eq!(
        print("<script>if (a < b) x();</script>"),
        "<script>if (a < b) x();</script>\n"
    );
}

#[test]
fn xhtml_script_and_style_are_wrapped_in_cdata() {
    let config = Config {
        xhtml_out: true,
        ..Config::default()
    };
    let (out, _) = print_with("<script>var a = 1 < 2;</script>", &config);
    assert_eq!(
        out,
        "<script>\n//<![CDATA[\nvar a = 1 < 2;\n//]]>\n</script>\n"
    );

    let (out, _) = print_with("<style>p { color: red }</style>", &config);
    assert_eq!(
        out,
        "<style>\n/*<![CDATA[*/\np { color: red }\n/*]]>*/\n</style>\n"
    );
}

#[test]
fn xhtml_void_elements_self_close() {
    let config = Config {
        xhtml_out: true,
        ..Config::default()
    };
    let (out, _) = print_with("<p>a<br>b</p>", &config);
    assert_eq!(out, "<p>a<br />\nb</p>\n");
}

#[test]
fn ascii_output_uses_references() {
    let config = Config {
        output_encoding: Encoding::Ascii,
        ..Config::default()
    };
    let (out, _) = print_with("<p>caf\u{e9} \u{2603}</p>", &config);
    assert_eq!(out, "<p>caf&eacute; &#9731;</p>\n");
}

#[test]
fn crlf_newlines() {
    let config = Config {
        newline: Newline::CrLf,
        ..Config::default()
    };
    let (out, _) = print_with("<div><p>a</p></div>", &config);
    assert_eq!(out, "<div>\r\n<p>a</p>\r\n</div>\r\n");
}

#[test]
fn byte_order_mark_is_written_first() {
    let config = Config {
        output_bom: true,
        ..Config::default()
    };
    let tags = HtmlTagTable::new();
    let mut diag = Diagnostics::default();
    let out = crate::tidy(b"<p>a</p>".to_vec(), &config, &tags, &mut diag);
    assert_eq!(&out[..3], &[0xEF, 0xBB, 0xBF]);
    assert_eq!(&out[3..], b"<p>a</p>\n");
}

#[test]
fn attributes_on_their_own_lines() {
    let config = Config {
        indent_attributes: true,
        ..Config::default()
    };
    let (out, _) = print_with(r#"<p class="a" id="b" title="c">x</p>"#, &config);
    assert_eq!(out, "<p class=\"a\"\n  id=\"b\"\n  title=\"c\">x</p>\n");
}

#[test]
fn uppercase_tags() {
    let config = Config {
        uppercase_tags: true,
        ..Config::default()
    };
    let (out, _) = print_with("<p>x</p>", &config);
    assert_eq!(out, "<P>x</P>\n");
}

#[test]
fn doctype_comment_and_server_code() {
    assert_eq!(
        print("<!DOCTYPE html><div><!-- note --><p>x</p></div>"),
        "<!DOCTYPE html>\n<div>\n<!-- note -->\n<p>x</p>\n</div>\n"
    );
    assert_eq!(
        print("<p><?php echo 1; ?></p>"),
        "<p><?php echo 1; ?></p>\n"
    );
}

#[test]
fn blank_lines_and_trailing_spaces_survive_in_opaque_regions() {
    let out = print("<div><!--\n  keep\n\n  this  \n--></div>");
    assert!(out.contains("<!--\n  keep\n\n  this  \n-->"), "{out:?}");

    let out = print("<div><?php\n\n  echo 1;\n\n?></div>");
    assert!(out.contains("<?php\n\n  echo 1;\n\n?>"), "{out:?}");
}

#[test]
fn chinese_text_uses_half_the_width() {
    let text = "一二三四五六七八九十一二三四五";
    let input = format!("<p>{text}</p>");
    let config = Config {
        wrap_column: 20,
        language: Some("zh".to_string()),
        ..Config::default()
    };
    let (out, _) = print_with(&input, &config);
    assert_eq!(out, "<p>一二三四五六七\n八九十一二三四五\n</p>\n");

    let config = Config {
        language: None,
        ..config
    };
    let (out, _) = print_with(&input, &config);
    assert_eq!(out.lines().next(), Some(format!("<p>{text}").as_str()));
}

#[test]
fn custom_wrap_width() {
    struct Fixed(usize);

    impl WrapWidth for Fixed {
        fn effective_width(&self, _: usize) -> usize {
            self.0
        }
    }

    let config = Config::default();
    let tags = HtmlTagTable::new();
    let mut diag = Diagnostics::default();
    let doc = crate::parse(b"<p>one two three four five six</p>".to_vec(), &config, &tags, &mut diag);
    let out = PrettyPrinter::new(&config, &tags)
        .with_wrap_width(Fixed(20))
        .print(&doc);
    assert_eq!(out, b"<p>one two three\nfour five six</p>\n");
}

/// Lines stay within the wrap width unless they hold a single unbreakable word.
#[test]
fn lines_respect_wrap_width_quickcheck() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(words: Vec<String>, width: u8) -> bool {
        let width = 10 + usize::from(width % 60);
        let words: Vec<String> = words
            .iter()
            .map(|w| w.chars().filter(char::is_ascii_lowercase).collect::<String>())
            .filter(|w| !w.is_empty())
            .collect();
        let input = format!("<p>{}</p>", words.join(" "));
        let config = Config {
            wrap_column: width,
            ..Config::default()
        };
        let (out, _) = print_with(&input, &config);
        out.lines()
            .all(|line| line.chars().count() <= width || !line.trim().contains(' '))
    }

    QuickCheck::new()
        .tests(500)
        .quickcheck(prop as fn(Vec<String>, u8) -> bool);
}
