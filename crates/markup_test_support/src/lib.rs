//! Shared fixture plumbing for the markup integration tests.

pub mod config;
pub mod fixture;
pub mod snapshot;

pub use config::{FixtureConfig, load_config};
pub use fixture::{Expected, Fixture, FixtureStatus, load_fixtures};
pub use snapshot::document_lines;

/// Render the first mismatch between two line lists with a little context.
pub fn diff_lines(expected: &[String], actual: &[String]) -> String {
    use std::fmt::Write;

    let max = expected.len().max(actual.len());
    let missing = "<missing>";
    let line = |lines: &[String], i: usize| -> String {
        lines.get(i).map_or(missing, String::as_str).to_string()
    };
    let mut out = String::new();

    let mismatch = (0..max).find(|&i| line(expected, i) != line(actual, i));
    match mismatch {
        Some(i) => {
            let start = i.saturating_sub(2);
            let end = (i + 3).min(max);
            let _ = writeln!(&mut out, "first mismatch at line {} (showing {}..={}):", i + 1, start + 1, end);
            for at in start..end {
                let marker = if at == i { ">" } else { " " };
                let _ = writeln!(&mut out, "{marker} {:>4}  expected: {}", at + 1, line(expected, at));
                let _ = writeln!(&mut out, "{marker} {:>4}    actual: {}", at + 1, line(actual, at));
            }
        }
        None if expected.len() != actual.len() => {
            let _ = writeln!(&mut out, "prefix matched but lengths differ");
        }
        None => {}
    }
    let _ = writeln!(
        &mut out,
        "expected {} lines, actual {} lines",
        expected.len(),
        actual.len()
    );
    out
}

/// Split printer output into lines, making line terminators visible.
pub fn output_lines(output: &str) -> Vec<String> {
    output
        .split_inclusive('\n')
        .map(|line| line.replace('\r', "\\r").replace('\n', "\\n"))
        .collect()
}
