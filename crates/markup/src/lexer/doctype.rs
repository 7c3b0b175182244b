//! DOCTYPE classification.

use memchr::{memchr, memchr2};

/// Document type announced by the DOCTYPE public identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoctypeVersion {
    Html20,
    Html32,
    Html40Strict,
    Html40Transitional,
    Html40Frameset,
    Xhtml10Strict,
    Xhtml10Transitional,
    Xhtml10Frameset,
    Xhtml11,
    Html5,
    /// Declared, but nothing in the known table matched.
    Unknown,
}

impl DoctypeVersion {
    pub fn is_xhtml(self) -> bool {
        matches!(
            self,
            DoctypeVersion::Xhtml10Strict
                | DoctypeVersion::Xhtml10Transitional
                | DoctypeVersion::Xhtml10Frameset
                | DoctypeVersion::Xhtml11
        )
    }
}

const KNOWN_PUBLIC_IDS: &[(&str, DoctypeVersion)] = &[
    ("-//IETF//DTD HTML 2.0//EN", DoctypeVersion::Html20),
    ("-//IETF//DTD HTML//EN", DoctypeVersion::Html20),
    ("-//W3C//DTD HTML 3.2//EN", DoctypeVersion::Html32),
    ("-//W3C//DTD HTML 3.2 Final//EN", DoctypeVersion::Html32),
    ("-//W3C//DTD HTML 3.2 Draft//EN", DoctypeVersion::Html32),
    ("-//W3C//DTD HTML 4.0//EN", DoctypeVersion::Html40Strict),
    ("-//W3C//DTD HTML 4.01//EN", DoctypeVersion::Html40Strict),
    ("-//W3C//DTD HTML 4.0 Transitional//EN", DoctypeVersion::Html40Transitional),
    ("-//W3C//DTD HTML 4.01 Transitional//EN", DoctypeVersion::Html40Transitional),
    ("-//W3C//DTD HTML 4.0 Frameset//EN", DoctypeVersion::Html40Frameset),
    ("-//W3C//DTD HTML 4.01 Frameset//EN", DoctypeVersion::Html40Frameset),
    ("-//W3C//DTD XHTML 1.0 Strict//EN", DoctypeVersion::Xhtml10Strict),
    ("-//W3C//DTD XHTML 1.0 Transitional//EN", DoctypeVersion::Xhtml10Transitional),
    ("-//W3C//DTD XHTML 1.0 Frameset//EN", DoctypeVersion::Xhtml10Frameset),
    ("-//W3C//DTD XHTML 1.1//EN", DoctypeVersion::Xhtml11),
];

/// Byte offset of `needle` in `haystack`, ignoring ASCII case.
pub(crate) fn find_ignore_ascii_case(haystack: &str, needle: &[u8]) -> Option<usize> {
    let hay = haystack.as_bytes();
    let n = needle.len();
    if n == 0 {
        return Some(0);
    }
    let first = needle[0];
    let (a, b) = if first.is_ascii_alphabetic() {
        (first.to_ascii_lowercase(), first.to_ascii_uppercase())
    } else {
        (first, first)
    };
    let mut i = 0;
    while i + n <= hay.len() {
        let rel = if a == b {
            memchr(a, &hay[i..])
        } else {
            memchr2(a, b, &hay[i..])
        };
        let pos = i + rel?;
        if pos + n <= hay.len() && hay[pos..pos + n].eq_ignore_ascii_case(needle) {
            return Some(pos);
        }
        i = pos + 1;
    }
    None
}

/// First quoted literal at or after `from`.
fn quoted_after(body: &str, from: usize) -> Option<&str> {
    let rest = body.get(from..)?;
    let open = rest.find(['"', '\''])?;
    let quote = rest[open..].chars().next()?;
    let value = &rest[open + 1..];
    let close = value.find(quote)?;
    Some(&value[..close])
}

pub(crate) fn public_id(body: &str) -> Option<&str> {
    let at = find_ignore_ascii_case(body, b"PUBLIC")?;
    quoted_after(body, at + "PUBLIC".len())
}

fn system_id(body: &str) -> Option<&str> {
    let at = find_ignore_ascii_case(body, b"SYSTEM")?;
    quoted_after(body, at + "SYSTEM".len())
}

/// Whether the text after `DOCTYPE` names an `html` root followed by an
/// external identifier keyword (or nothing, as in `<!DOCTYPE html>`).
pub(crate) fn has_html_root(body: &str) -> bool {
    let mut words = body.split(' ');
    let root = words.next().unwrap_or("");
    if !root.eq_ignore_ascii_case("html") {
        return false;
    }
    match words.next() {
        None => true,
        Some(kw) => kw.eq_ignore_ascii_case("PUBLIC") || kw.eq_ignore_ascii_case("SYSTEM"),
    }
}

pub(crate) fn classify(body: &str) -> DoctypeVersion {
    if let Some(fpi) = public_id(body) {
        return KNOWN_PUBLIC_IDS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(fpi.trim()))
            .map_or(DoctypeVersion::Unknown, |(_, version)| *version);
    }
    if body.trim().eq_ignore_ascii_case("html")
        || system_id(body).is_some_and(|id| id.eq_ignore_ascii_case("about:legacy-compat"))
    {
        return DoctypeVersion::Html5;
    }
    DoctypeVersion::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_public_identifiers() {
        assert_eq!(
            classify(r#"html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd""#),
            DoctypeVersion::Html40Strict
        );
        assert_eq!(
            classify(r#"HTML PUBLIC "-//W3C//DTD XHTML 1.0 Transitional//EN""#),
            DoctypeVersion::Xhtml10Transitional
        );
        assert_eq!(classify(r#"html public '-//w3c//dtd html 3.2 final//en'"#), DoctypeVersion::Html32);
    }

    #[test]
    fn bare_html_is_html5() {
        assert_eq!(classify("html"), DoctypeVersion::Html5);
        assert_eq!(classify(r#"html SYSTEM "about:legacy-compat""#), DoctypeVersion::Html5);
    }

    #[test]
    fn unmatched_public_id_is_unknown() {
        assert_eq!(classify(r#"html PUBLIC "-//ACME//DTD Web 1//EN""#), DoctypeVersion::Unknown);
        assert_eq!(public_id(r#"html PUBLIC "-//ACME//DTD Web 1//EN""#), Some("-//ACME//DTD Web 1//EN"));
    }

    #[test]
    fn root_check() {
        assert!(has_html_root("html"));
        assert!(has_html_root(r#"html PUBLIC "x""#));
        assert!(!has_html_root("svg"));
        assert!(!has_html_root("html FOO"));
    }

    #[test]
    fn finds_needle_ignoring_case() {
        assert_eq!(find_ignore_ascii_case("html public", b"PUBLIC"), Some(5));
        assert_eq!(find_ignore_ascii_case("html", b"PUBLIC"), None);
    }
}
