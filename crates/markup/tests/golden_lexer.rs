use std::env;
use std::path::{Path, PathBuf};

use markup::{Diagnostics, HtmlTagTable, parse};
use markup_test_support::{Fixture, FixtureStatus, diff_lines, document_lines, load_fixtures};

const FORMAT: &str = "markup-token-v1";

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("lexer")
}

fn fixture_filter() -> Option<String> {
    env::var("MARKUP_LEXER_FIXTURE").ok()
}

fn run(fixture: &Fixture) -> Vec<String> {
    let tags = HtmlTagTable::new();
    let mut diag = Diagnostics::for_config(&fixture.config);
    let doc = parse(fixture.input.clone(), &fixture.config, &tags, &mut diag);
    document_lines(&doc)
        .unwrap_or_else(|err| panic!("{err} while formatting fixture '{}'", fixture.name))
}

#[test]
fn golden_lexer_fixtures() {
    let filter = fixture_filter();
    let mut ran = 0usize;
    for fixture in load_fixtures(&fixture_root(), "tokens.txt", FORMAT) {
        if filter.as_deref().is_some_and(|f| !fixture.name.contains(f)) {
            continue;
        }
        ran += 1;
        if fixture.expected.status == FixtureStatus::Skip {
            continue;
        }
        let actual = run(&fixture);
        let mismatch = actual != fixture.expected.lines;
        match fixture.expected.status {
            FixtureStatus::Active if mismatch => panic!(
                "token mismatch in fixture '{}'\npath: {}\n{}",
                fixture.name,
                fixture.dir.display(),
                diff_lines(&fixture.expected.lines, &actual)
            ),
            FixtureStatus::Xfail if !mismatch => panic!(
                "fixture '{}' matched but is marked xfail; reason: {}",
                fixture.name,
                fixture.expected.reason.as_deref().unwrap_or("<missing reason>")
            ),
            _ => {}
        }
    }
    assert!(ran > 0, "no fixtures matched filter");
}
