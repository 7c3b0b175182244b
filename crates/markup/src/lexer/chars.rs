//! Character classes used by the lexer.

pub(crate) fn is_white(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{0c}')
}

pub(crate) fn is_letter(c: char, xml: bool) -> bool {
    c.is_ascii_alphabetic() || (xml && (c == '_' || c == ':' || (!c.is_ascii() && c.is_alphabetic())))
}

pub(crate) fn is_namechar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(c, '.' | '-' | '_' | ':')
        || (!c.is_ascii() && c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classes() {
        assert!(is_white('\u{0c}'));
        assert!(!is_white('\u{a0}'));
        assert!(is_letter('q', false));
        assert!(!is_letter('_', false));
        assert!(is_letter('_', true));
        assert!(is_namechar('-') && is_namechar('é'));
        assert!(!is_namechar('='));
    }
}
