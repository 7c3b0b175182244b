use std::env;
use std::path::{Path, PathBuf};

use markup::{Diagnostics, HtmlTagTable, tidy};
use markup_test_support::{Fixture, FixtureStatus, diff_lines, load_fixtures, output_lines};

const FORMAT: &str = "markup-print-v1";

fn fixture_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("printer")
}

fn fixture_filter() -> Option<String> {
    env::var("MARKUP_PRINTER_FIXTURE").ok()
}

fn run(fixture: &Fixture) -> Vec<String> {
    let tags = HtmlTagTable::new();
    let mut diag = Diagnostics::for_config(&fixture.config);
    let bytes = tidy(fixture.input.clone(), &fixture.config, &tags, &mut diag);
    // Non-UTF-8 outputs are compared as Latin-1 so each byte stays visible.
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
    };
    output_lines(&text)
}

#[test]
fn golden_printer_fixtures() {
    let filter = fixture_filter();
    let mut ran = 0usize;
    for fixture in load_fixtures(&fixture_root(), "output.txt", FORMAT) {
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
                "output mismatch in fixture '{}'\npath: {}\n{}",
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
