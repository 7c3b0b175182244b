//! Fixture directories: `<root>/<name>/{input.html, <expected>, config.toml}`.
//!
//! Expected files hold `# key: value` headers followed by one line per
//! expected item. `# format:` is required; `# status: xfail|skip` needs a
//! `# reason:`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use markup::Config;

use crate::config::load_config;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FixtureStatus {
    Active,
    Xfail,
    Skip,
}

pub struct Expected {
    pub status: FixtureStatus,
    pub reason: Option<String>,
    pub lines: Vec<String>,
}

pub struct Fixture {
    pub name: String,
    pub dir: PathBuf,
    pub input: Vec<u8>,
    pub config: Config,
    pub expected: Expected,
}

/// Load every fixture under `root`, sorted by name. Directories without an
/// `expected_file` are ignored so lexer and printer fixtures can share a root.
pub fn load_fixtures(root: &Path, expected_file: &str, format: &str) -> Vec<Fixture> {
    let mut entries: Vec<_> = fs::read_dir(root)
        .unwrap_or_else(|err| panic!("failed to read fixture root {root:?}: {err}"))
        .filter_map(Result::ok)
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    let mut fixtures = Vec::new();
    for entry in entries {
        let dir = entry.path();
        if !dir.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        let expected_path = dir.join(expected_file);
        if !expected_path.exists() {
            continue;
        }
        let input_path = dir.join("input.html");
        let input = fs::read(&input_path)
            .unwrap_or_else(|err| panic!("failed to read input {input_path:?}: {err}"));
        let config = load_config(&dir.join("config.toml"));
        let expected = parse_expected(&expected_path, format);
        fixtures.push(Fixture {
            name,
            dir,
            input,
            config,
            expected,
        });
    }
    fixtures
}

pub fn parse_expected(path: &Path, format: &str) -> Expected {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read expected file {path:?}: {err}"));
    let mut headers = BTreeMap::<String, String>::new();
    let mut lines = Vec::new();

    for raw_line in content.lines() {
        let line = raw_line.trim_end();
        if line.is_empty() {
            continue;
        }
        if let Some(stripped) = line.strip_prefix("# ") {
            let (key, value) = stripped
                .split_once(':')
                .unwrap_or_else(|| panic!("invalid header in {path:?}: '{line}'"));
            let key = key.trim().to_ascii_lowercase();
            if headers.insert(key.clone(), value.trim().to_string()).is_some() {
                panic!("duplicate header '{key}' in {path:?}");
            }
        } else {
            lines.push(line.to_string());
        }
    }

    let found = headers
        .get("format")
        .unwrap_or_else(|| panic!("missing format header in {path:?}"));
    assert_eq!(found, format, "unsupported format in {path:?}");

    let status = match headers.get("status").map(String::as_str) {
        Some("active") | None => FixtureStatus::Active,
        Some("xfail") => FixtureStatus::Xfail,
        Some("skip") => FixtureStatus::Skip,
        Some(other) => panic!("unsupported status '{other}' in {path:?}"),
    };
    let reason = headers.get("reason").cloned();
    if status != FixtureStatus::Active && reason.as_deref().unwrap_or("").is_empty() {
        panic!("non-active fixture missing reason in {path:?}");
    }

    Expected {
        status,
        reason,
        lines,
    }
}
