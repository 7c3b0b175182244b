//! Tag dictionary: maps element names to ids and content models.
//!
//! The lexer and printer only see the [`TagDictionary`] trait. A richer
//! dictionary (attribute tables, version masks) can be plugged in by the
//! caller; [`HtmlTagTable`] covers HTML 4 plus the common HTML5 sectioning
//! elements.

use bitflags::bitflags;

bitflags! {
    /// Content-model bits consulted by the tree assembler and the printer.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ContentModel: u32 {
        const EMPTY = 1 << 0;
        const HTML = 1 << 1;
        const HEAD = 1 << 2;
        const BLOCK = 1 << 3;
        const INLINE = 1 << 4;
        const LIST = 1 << 5;
        const DEFLIST = 1 << 6;
        const TABLE = 1 << 7;
        const ROWGRP = 1 << 8;
        const ROW = 1 << 9;
        const FIELD = 1 << 10;
        const OBJECT = 1 << 11;
        const PARAM = 1 << 12;
        const FRAMES = 1 << 13;
        const HEADING = 1 << 14;
        const OPT = 1 << 15;
        const IMG = 1 << 16;
        const MIXED = 1 << 17;
        const NO_INDENT = 1 << 18;
        /// Start tag may be omitted.
        const OMITST = 1 << 19;
        /// Whitespace is significant and lines must not be wrapped.
        const PREFORMATTED = 1 << 20;
        /// Content is opaque text up to the matching end tag.
        const RAW_TEXT = 1 << 21;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(pub u16);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagInfo {
    pub id: TagId,
    pub name: &'static str,
    pub model: ContentModel,
}

impl TagInfo {
    pub fn is_empty(&self) -> bool {
        self.model.contains(ContentModel::EMPTY)
    }

    pub fn is_inline(&self) -> bool {
        self.model.contains(ContentModel::INLINE) && !self.model.contains(ContentModel::BLOCK)
    }
}

pub trait TagDictionary {
    /// Look up a (already case-folded) element name.
    fn lookup(&self, name: &str) -> Option<&TagInfo>;

    fn info(&self, id: TagId) -> Option<&TagInfo>;
}

macro_rules! tags {
    ($($name:literal => $($bit:ident)|+;)*) => {
        &[$(($name, ContentModel::empty()$(.union(ContentModel::$bit))+),)*]
    };
}

static HTML_TAGS: &[(&str, ContentModel)] = tags! {
    "a" => INLINE;
    "abbr" => INLINE;
    "acronym" => INLINE;
    "address" => BLOCK;
    "applet" => OBJECT | IMG | INLINE | PARAM;
    "area" => BLOCK | EMPTY;
    "article" => BLOCK;
    "aside" => BLOCK;
    "b" => INLINE;
    "base" => HEAD | EMPTY;
    "basefont" => INLINE | EMPTY;
    "bdo" => INLINE;
    "big" => INLINE;
    "blockquote" => BLOCK;
    "body" => HTML | OPT | OMITST;
    "br" => INLINE | EMPTY;
    "button" => INLINE;
    "caption" => TABLE;
    "center" => BLOCK;
    "cite" => INLINE;
    "code" => INLINE;
    "col" => TABLE | EMPTY;
    "colgroup" => TABLE | OPT;
    "dd" => DEFLIST | OPT | NO_INDENT;
    "del" => INLINE | BLOCK | MIXED;
    "dfn" => INLINE;
    "dir" => BLOCK;
    "div" => BLOCK;
    "dl" => BLOCK;
    "dt" => DEFLIST | OPT | NO_INDENT;
    "em" => INLINE;
    "fieldset" => BLOCK;
    "figcaption" => BLOCK;
    "figure" => BLOCK;
    "font" => INLINE;
    "footer" => BLOCK;
    "form" => BLOCK;
    "frame" => FRAMES | EMPTY;
    "frameset" => HTML | FRAMES;
    "h1" => BLOCK | HEADING;
    "h2" => BLOCK | HEADING;
    "h3" => BLOCK | HEADING;
    "h4" => BLOCK | HEADING;
    "h5" => BLOCK | HEADING;
    "h6" => BLOCK | HEADING;
    "head" => HTML | OPT | OMITST;
    "header" => BLOCK;
    "hr" => BLOCK | EMPTY;
    "html" => HTML | OPT | OMITST;
    "i" => INLINE;
    "iframe" => INLINE;
    "img" => INLINE | IMG | EMPTY;
    "input" => INLINE | IMG | EMPTY;
    "ins" => INLINE | BLOCK | MIXED;
    "isindex" => BLOCK | EMPTY;
    "kbd" => INLINE;
    "label" => INLINE;
    "legend" => INLINE;
    "li" => LIST | OPT | NO_INDENT;
    "link" => HEAD | EMPTY;
    "listing" => BLOCK | PREFORMATTED;
    "main" => BLOCK;
    "map" => INLINE;
    "mark" => INLINE;
    "menu" => BLOCK;
    "meta" => HEAD | EMPTY;
    "nav" => BLOCK;
    "noframes" => BLOCK | FRAMES;
    "noscript" => BLOCK | INLINE | MIXED;
    "object" => OBJECT | HEAD | IMG | INLINE | PARAM;
    "ol" => BLOCK;
    "optgroup" => FIELD | OPT;
    "option" => FIELD | OPT;
    "p" => BLOCK | OPT;
    "param" => INLINE | EMPTY;
    "plaintext" => BLOCK | PREFORMATTED;
    "pre" => BLOCK | PREFORMATTED;
    "q" => INLINE;
    "s" => INLINE;
    "samp" => INLINE;
    "script" => HEAD | MIXED | BLOCK | INLINE | RAW_TEXT;
    "section" => BLOCK;
    "select" => INLINE | FIELD;
    "small" => INLINE;
    "span" => INLINE;
    "strike" => INLINE;
    "strong" => INLINE;
    "style" => HEAD | RAW_TEXT;
    "sub" => INLINE;
    "sup" => INLINE;
    "table" => BLOCK;
    "tbody" => TABLE | ROWGRP | OPT;
    "td" => ROW | OPT | NO_INDENT;
    "textarea" => INLINE | FIELD | PREFORMATTED;
    "tfoot" => TABLE | ROWGRP | OPT;
    "th" => ROW | OPT | NO_INDENT;
    "thead" => TABLE | ROWGRP | OPT;
    "time" => INLINE;
    "title" => HEAD;
    "tr" => TABLE | OPT;
    "tt" => INLINE;
    "u" => INLINE;
    "ul" => BLOCK;
    "var" => INLINE;
    "wbr" => INLINE | EMPTY;
    "xmp" => BLOCK | PREFORMATTED;
};

/// Built-in HTML tag table.
#[derive(Debug)]
pub struct HtmlTagTable {
    tags: Vec<TagInfo>,
}

impl HtmlTagTable {
    pub fn new() -> Self {
        let tags = HTML_TAGS
            .iter()
            .enumerate()
            .map(|(i, (name, model))| TagInfo {
                id: TagId(i as u16),
                name,
                model: *model,
            })
            .collect();
        Self { tags }
    }
}

impl Default for HtmlTagTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TagDictionary for HtmlTagTable {
    fn lookup(&self, name: &str) -> Option<&TagInfo> {
        self.tags
            .binary_search_by(|tag| tag.name.cmp(name))
            .ok()
            .map(|i| &self.tags[i])
    }

    fn info(&self, id: TagId) -> Option<&TagInfo> {
        self.tags.get(usize::from(id.0))
    }
}
