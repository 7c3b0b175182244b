//! Wrap width strategies and break opportunities in double-width scripts.

use crate::config::WrapTunables;

/// Decides how many columns of the configured wrap width a line may use.
///
/// Double-width scripts occupy two display columns per char, so counting
/// chars against the configured column overshoots. Implementations scale
/// the width for the document's script.
pub trait WrapWidth {
    fn effective_width(&self, wrap_column: usize) -> usize;
}

/// Scales the width by a per-language fraction from [`WrapTunables`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LanguageWrapWidth {
    fraction: Option<(usize, usize)>,
}

impl LanguageWrapWidth {
    pub fn new(language: Option<&str>, tunables: &WrapTunables) -> Self {
        let primary = language
            .map(|lang| lang.split(['-', '_']).next().unwrap_or(lang).to_ascii_lowercase());
        let fraction = match primary.as_deref() {
            Some("zh") => Some(tunables.zh_fraction),
            Some("ja") => Some(tunables.ja_fraction),
            _ => None,
        };
        Self { fraction }
    }
}

impl WrapWidth for LanguageWrapWidth {
    fn effective_width(&self, wrap_column: usize) -> usize {
        match self.fraction {
            Some((num, den)) if den > 0 => wrap_column * num / den,
            _ => wrap_column,
        }
    }
}

/// Where a line may be broken around a char.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BreakClass {
    None,
    /// Opening punctuation: break before it.
    Before,
    /// Closing punctuation and ideographs: break after.
    After,
}

pub(crate) fn break_class(c: char) -> BreakClass {
    match c {
        '\u{2018}' | '\u{201C}' | '\u{3008}' | '\u{300A}' | '\u{300C}' | '\u{300E}'
        | '\u{3010}' | '\u{3014}' | '\u{3016}' | '\u{3018}' | '\u{301A}' | '\u{301D}'
        | '\u{FF08}' | '\u{FF3B}' | '\u{FF5B}' | '\u{FF62}' => BreakClass::Before,
        '\u{2019}' | '\u{201D}' | '\u{3001}' | '\u{3002}' | '\u{3009}' | '\u{300B}'
        | '\u{300D}' | '\u{300F}' | '\u{3011}' | '\u{3015}' | '\u{3017}' | '\u{3019}'
        | '\u{301B}' | '\u{301E}' | '\u{301F}' | '\u{30FB}' | '\u{FF01}' | '\u{FF09}'
        | '\u{FF0C}' | '\u{FF0E}' | '\u{FF1A}' | '\u{FF1B}' | '\u{FF1F}' | '\u{FF3D}'
        | '\u{FF5D}' | '\u{FF61}' | '\u{FF63}' | '\u{FF64}' => BreakClass::After,
        // Kana, CJK ideographs, Hangul syllables.
        '\u{3040}'..='\u{30FF}' | '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}'
        | '\u{AC00}'..='\u{D7AF}' => BreakClass::After,
        _ => BreakClass::None,
    }
}
