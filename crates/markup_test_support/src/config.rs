//! Per-fixture `config.toml`: a sparse overlay on [`Config::default`].

use std::fs;
use std::path::Path;

use markup::{Config, Encoding, IndentContent, Newline, ReplacementPolicy};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureConfig {
    pub input_encoding: Option<String>,
    pub output_encoding: Option<String>,
    pub replacement: Option<String>,
    pub tab_size: Option<usize>,
    pub xml_tags: Option<bool>,
    pub fix_comments: Option<bool>,
    pub xml_out: Option<bool>,
    pub xhtml_out: Option<bool>,
    pub output_bom: Option<bool>,
    pub newline: Option<String>,
    pub wrap_column: Option<usize>,
    pub wrap_attributes: Option<bool>,
    pub indent_spaces: Option<usize>,
    pub indent_content: Option<String>,
    pub indent_attributes: Option<bool>,
    pub quote_marks: Option<bool>,
    pub quote_ampersand: Option<bool>,
    pub quote_nbsp: Option<bool>,
    pub escape_lt_gt: Option<bool>,
    pub numeric_entities: Option<bool>,
    pub uppercase_tags: Option<bool>,
    pub break_before_br: Option<bool>,
    pub language: Option<String>,
}

macro_rules! overlay {
    ($from:ident => $to:ident: $($field:ident),* $(,)?) => {
        $(if let Some(value) = $from.$field {
            $to.$field = value;
        })*
    };
}

impl FixtureConfig {
    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|err| err.to_string())
    }

    pub fn into_config(self) -> Result<Config, String> {
        let mut config = Config::default();
        if let Some(label) = &self.input_encoding {
            config.input_encoding = parse_encoding(label)?;
        }
        if let Some(label) = &self.output_encoding {
            config.output_encoding = parse_encoding(label)?;
        }
        if let Some(policy) = &self.replacement {
            config.replacement = match policy.as_str() {
                "substitute" => ReplacementPolicy::Substitute,
                "discard" => ReplacementPolicy::Discard,
                other => return Err(format!("unknown replacement policy '{other}'")),
            };
        }
        if let Some(newline) = &self.newline {
            config.newline = match newline.as_str() {
                "lf" => Newline::Lf,
                "crlf" => Newline::CrLf,
                "cr" => Newline::Cr,
                other => return Err(format!("unknown newline '{other}'")),
            };
        }
        if let Some(indent) = &self.indent_content {
            config.indent_content = match indent.as_str() {
                "no" => IndentContent::No,
                "yes" => IndentContent::Yes,
                "auto" => IndentContent::Auto,
                other => return Err(format!("unknown indent_content '{other}'")),
            };
        }
        if self.language.is_some() {
            config.language = self.language.clone();
        }
        let fields = self;
        overlay!(fields => config:
            tab_size,
            xml_tags,
            fix_comments,
            xml_out,
            xhtml_out,
            output_bom,
            wrap_column,
            wrap_attributes,
            indent_spaces,
            indent_attributes,
            quote_marks,
            quote_ampersand,
            quote_nbsp,
            escape_lt_gt,
            numeric_entities,
            uppercase_tags,
            break_before_br,
        );
        Ok(config)
    }
}

fn parse_encoding(label: &str) -> Result<Encoding, String> {
    label.parse::<Encoding>().map_err(|err| err.to_string())
}

/// Read `path` if it exists; a missing file means the default config.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    let text = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read config {path:?}: {err}"));
    FixtureConfig::parse(&text)
        .and_then(FixtureConfig::into_config)
        .unwrap_or_else(|err| panic!("invalid config {path:?}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_overlay_is_default() {
        let config = FixtureConfig::parse("").unwrap().into_config().unwrap();
        assert_eq!(config.wrap_column, Config::default().wrap_column);
        assert_eq!(config.output_encoding, Encoding::Utf8);
    }

    #[test]
    fn fields_override_defaults() {
        let text = r#"
            output_encoding = "ascii"
            newline = "crlf"
            indent_content = "auto"
            wrap_column = 40
            xhtml_out = true
            language = "ja"
        "#;
        let config = FixtureConfig::parse(text).unwrap().into_config().unwrap();
        assert_eq!(config.output_encoding, Encoding::Ascii);
        assert_eq!(config.newline, Newline::CrLf);
        assert_eq!(config.indent_content, IndentContent::Auto);
        assert_eq!(config.wrap_column, 40);
        assert!(config.xhtml_out);
        assert_eq!(config.language.as_deref(), Some("ja"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(FixtureConfig::parse("wrap = 3").is_err());
        let config = FixtureConfig::parse(r#"newline = "crcr""#).unwrap();
        assert!(config.into_config().is_err());
        let config = FixtureConfig::parse(r#"output_encoding = "ebcdic""#).unwrap();
        assert!(config.into_config().is_err());
    }
}
