//! Pretty printer.
//!
//! Walks a finished [`Document`] and serializes it with indentation and
//! column-bounded wrapping, encoding the result with `charcodec`.
//!
//! Output is assembled one line at a time in a [`LineBuffer`]. Before each
//! char is appended in a wrappable region, a line that has reached the wrap
//! width is cut at its last safe break; a line with no safe break keeps
//! growing until one arrives.

mod escape;
mod linebuf;
mod wrap;

#[cfg(test)]
mod tests;

use bitflags::bitflags;
use charcodec::Encoder;

use crate::config::{Config, IndentContent};
use crate::tags::{ContentModel, TagDictionary, TagInfo};
use crate::token::{Attribute, EmbeddedKind, NodeFlags, NodeKind};
use crate::tree::{Document, NodeId, Tree};

use escape::Escaper;
use linebuf::LineBuffer;
use wrap::{BreakClass, break_class};

pub use wrap::{LanguageWrapWidth, WrapWidth};

const CDATA_OPEN: &str = "<![CDATA[";

bitflags! {
    /// How text in the current region is printed.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct PrintMode: u8 {
        /// Whitespace is significant and kept verbatim.
        const PREFORMATTED = 1 << 0;
        /// Comment text: printed without escaping.
        const COMMENT = 1 << 1;
        const ATTRIB_VALUE = 1 << 2;
        /// No line breaks are inserted.
        const NOWRAP = 1 << 3;
        /// `<`, `>` and `&` pass through unescaped.
        const CDATA = 1 << 4;
    }
}

impl PrintMode {
    fn verbatim(self) -> bool {
        self.intersects(PrintMode::PREFORMATTED | PrintMode::COMMENT | PrintMode::CDATA)
    }

    fn wrappable(self) -> bool {
        !self.intersects(PrintMode::PREFORMATTED | PrintMode::NOWRAP)
    }
}

/// Comment syntax hiding CDATA markers inside script and style content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CommentStyle {
    Slashes,
    Quote,
    Block,
    None,
}

impl CommentStyle {
    fn markers(self) -> (&'static str, &'static str) {
        match self {
            CommentStyle::Slashes => ("//<![CDATA[", "//]]>"),
            CommentStyle::Quote => ("'<![CDATA[", "']]>"),
            CommentStyle::Block => ("/*<![CDATA[*/", "/*]]>*/"),
            CommentStyle::None => ("<![CDATA[", "]]>"),
        }
    }
}

pub struct PrettyPrinter<'c> {
    config: &'c Config,
    tags: &'c dyn TagDictionary,
    width: Box<dyn WrapWidth + 'c>,
}

impl<'c> PrettyPrinter<'c> {
    pub fn new(config: &'c Config, tags: &'c dyn TagDictionary) -> Self {
        let width = LanguageWrapWidth::new(config.language.as_deref(), &config.tunables);
        Self {
            config,
            tags,
            width: Box::new(width),
        }
    }

    /// Replace the default language-based wrap width.
    pub fn with_wrap_width(mut self, width: impl WrapWidth + 'c) -> Self {
        self.width = Box::new(width);
        self
    }

    /// Serialize `doc` in the configured output encoding.
    pub fn print(&self, doc: &Document) -> Vec<u8> {
        let wrap_width = match self.config.wrap_column {
            0 => 0,
            column => self.width.effective_width(column).max(1),
        };
        let mut job = Job {
            config: self.config,
            tags: self.tags,
            doc,
            escaper: Escaper::new(self.config),
            encoder: Encoder::new(self.config.output_encoding),
            out: Vec::new(),
            line: LineBuffer::new(),
            wrap_width,
        };
        if self.config.output_bom {
            job.encoder.write_bom(&mut job.out);
        }
        job.print_node(Tree::ROOT, PrintMode::empty(), 0);
        job.cond_flush();
        job.out
    }
}

/// State for printing one document.
struct Job<'p, 'd> {
    config: &'p Config,
    tags: &'p dyn TagDictionary,
    doc: &'d Document,
    escaper: Escaper,
    encoder: Encoder,
    out: Vec<u8>,
    line: LineBuffer,
    /// Effective width; `0` disables wrapping.
    wrap_width: usize,
}

impl Job<'_, '_> {
    fn write_char(&mut self, c: char) {
        if let Err(err) = self.encoder.encode(c, &mut self.out) {
            log::warn!(target: "markup.pprint", "{err}; substituted");
        }
    }

    fn write_line(&mut self, indent: usize, text: &str) {
        if !text.is_empty() {
            for _ in 0..indent {
                self.write_char(' ');
            }
            for c in text.chars() {
                self.write_char(c);
            }
        }
        for c in self.config.newline.as_str().chars() {
            self.write_char(c);
        }
    }

    /// Break the line at its wrap point once it has reached the wrap width.
    fn check_wrap(&mut self, indent: usize) {
        if self.wrap_width == 0 || !self.line.can_wrap() {
            return;
        }
        if self.line.indent() + self.line.len() >= self.wrap_width {
            let (line_indent, text) = self.line.split_at_wraphere(indent);
            self.write_line(line_indent, &text);
        }
    }

    /// End the current line. Outside preformatted text an empty line is
    /// left alone.
    fn flush(&mut self, mode: PrintMode) {
        let preformatted = mode.contains(PrintMode::PREFORMATTED);
        if self.line.is_empty() && !preformatted {
            return;
        }
        let (indent, text) = self.line.take(!preformatted);
        self.write_line(indent, &text);
    }

    fn cond_flush(&mut self) {
        self.flush(PrintMode::empty());
    }

    fn put(&mut self, c: char, mode: PrintMode, indent: usize) {
        if mode.wrappable() {
            self.check_wrap(indent);
        }
        self.line.push(c, indent);
    }

    fn put_str(&mut self, s: &str, mode: PrintMode, indent: usize) {
        for c in s.chars() {
            self.put(c, mode, indent);
        }
    }

    fn put_escaped(&mut self, c: char, mode: PrintMode, delimiter: Option<char>, indent: usize) {
        if mode.intersects(PrintMode::CDATA | PrintMode::COMMENT) {
            self.put(c, mode, indent);
            return;
        }
        match self.escaper.escape(c, delimiter) {
            Some(entity) => self.put_str(&entity, mode, indent),
            None => self.put(c, mode, indent),
        }
    }

    fn print_text(&mut self, text: &str, mode: PrintMode, indent: usize) {
        let mut indent = indent;
        let verbatim = mode.verbatim();
        let wrappable = mode.wrappable();

        for c in text.chars() {
            if c == '\n' {
                if verbatim {
                    // Blank lines and trailing spaces are content here.
                    self.flush(mode | PrintMode::PREFORMATTED);
                    indent = 0;
                } else {
                    self.flush(mode);
                }
                continue;
            }
            if c == ' ' && wrappable {
                if self.line.is_empty() && !verbatim {
                    continue;
                }
                self.check_wrap(indent);
                self.line.set_wraphere(false);
                self.line.push(' ', indent);
                continue;
            }
            let class = if wrappable && !verbatim {
                break_class(c)
            } else {
                BreakClass::None
            };
            if wrappable {
                self.check_wrap(indent);
            }
            if class == BreakClass::Before {
                self.line.set_wraphere(false);
            }
            self.put_escaped(c, mode, None, indent);
            if class == BreakClass::After {
                self.line.set_wraphere(false);
            }
        }
    }

    fn print_node(&mut self, id: NodeId, mode: PrintMode, indent: usize) {
        let doc = self.doc;
        let token = &doc.tree.node(id).token;
        match token.kind {
            NodeKind::Root => self.print_children(id, mode, indent),
            NodeKind::Text => self.print_text(doc.text_of(id), mode, indent),
            NodeKind::StartTag | NodeKind::StartEndTag => self.print_element(id, mode, indent),
            NodeKind::EndTag => self.print_end_tag(id, mode, indent),
            NodeKind::Comment => {
                let comment = mode | PrintMode::COMMENT | PrintMode::NOWRAP;
                self.put_str("<!--", comment, indent);
                self.print_text(doc.text_of(id), comment, indent);
                self.put_str("-->", comment, indent);
                if token.flags.contains(NodeFlags::LINEBREAK_AFTER) {
                    self.flush(mode);
                }
            }
            NodeKind::DocType => {
                let raw = PrintMode::COMMENT | PrintMode::NOWRAP;
                self.cond_flush();
                self.put_str("<!DOCTYPE", raw, indent);
                let text = doc.text_of(id);
                if !text.is_empty() {
                    self.put(' ', raw, indent);
                    self.print_text(text, raw, indent);
                }
                self.put('>', raw, indent);
                self.flush(mode);
            }
            NodeKind::ProcIns | NodeKind::XmlDecl => {
                let raw = PrintMode::COMMENT | PrintMode::NOWRAP;
                let top_level = doc.tree.node(id).parent == Some(Tree::ROOT);
                if top_level {
                    self.cond_flush();
                }
                self.put_str("<?", raw, indent);
                self.print_text(doc.text_of(id), raw, indent);
                self.put_str("?>", raw, indent);
                if top_level {
                    self.flush(mode);
                }
            }
            NodeKind::CData => self.print_code(id, mode, indent, CDATA_OPEN, "]]>", false),
            NodeKind::Section => {
                self.print_code(id, mode, indent, "<![", "]>", self.config.wrap_sections)
            }
            NodeKind::Asp => self.print_code(id, mode, indent, "<%", "%>", self.config.wrap_asp),
            NodeKind::Jste => self.print_code(id, mode, indent, "<#", "#>", self.config.wrap_jste),
            NodeKind::Php => self.print_code(id, mode, indent, "<?", "?>", self.config.wrap_php),
        }
    }

    fn print_children(&mut self, id: NodeId, mode: PrintMode, indent: usize) {
        let doc = self.doc;
        for child in doc.tree.children(id) {
            self.print_node(child, mode, indent);
        }
    }

    fn print_code(
        &mut self,
        id: NodeId,
        mode: PrintMode,
        indent: usize,
        open: &str,
        close: &str,
        wrap: bool,
    ) {
        let mut code = mode | PrintMode::CDATA;
        if !wrap {
            code |= PrintMode::NOWRAP;
        }
        let doc = self.doc;
        self.put_str(open, code | PrintMode::NOWRAP, indent);
        self.print_text(doc.text_of(id), code, indent);
        self.put_str(close, code | PrintMode::NOWRAP, indent);
    }

    fn info(&self, id: NodeId) -> Option<TagInfo> {
        let tag = self.doc.tree.node(id).token.tag?;
        self.tags.info(tag).copied()
    }

    fn tag_name(&self, id: NodeId) -> String {
        let name = self.doc.name_of(id).unwrap_or("");
        if self.config.uppercase_tags && !self.config.xml_output() {
            name.to_ascii_uppercase()
        } else {
            name.to_string()
        }
    }

    fn attr_value(&self, id: NodeId, name: &str) -> Option<&str> {
        let doc = self.doc;
        doc.tree.node(id).token.attrs.iter().find_map(|attr| {
            let attr_name = doc.atoms.resolve(attr.name?)?;
            if attr_name.eq_ignore_ascii_case(name) {
                Some(attr.value.map_or("", |span| doc.text.slice(span)))
            } else {
                None
            }
        })
    }

    /// Whether a child flows with text rather than starting its own line.
    fn flows_inline(&self, id: NodeId) -> bool {
        match self.doc.tree.node(id).token.kind {
            NodeKind::Text | NodeKind::Comment | NodeKind::Asp | NodeKind::Jste | NodeKind::Php => {
                true
            }
            NodeKind::StartTag | NodeKind::StartEndTag => {
                self.info(id).is_none_or(|info| info.is_inline())
            }
            _ => false,
        }
    }

    fn should_indent(&self, model: ContentModel, has_children: bool, block_children: bool) -> bool {
        match self.config.indent_content {
            IndentContent::No => false,
            _ if model.contains(ContentModel::NO_INDENT) => block_children,
            IndentContent::Yes => has_children,
            IndentContent::Auto => block_children,
        }
    }

    fn print_element(&mut self, id: NodeId, mode: PrintMode, indent: usize) {
        let doc = self.doc;
        let node = doc.tree.node(id);
        let info = self.info(id);
        let model = info.map_or(ContentModel::INLINE, |info| info.model);
        let inline = info.is_none_or(|info| info.is_inline());
        let is_br = doc.name_of(id) == Some("br");

        if model.contains(ContentModel::EMPTY) || node.token.kind == NodeKind::StartEndTag {
            if !inline || (is_br && self.config.break_before_br) {
                self.cond_flush();
            }
            self.print_start_tag(id, mode, indent);
            if !inline || is_br {
                self.flush(mode);
            }
            return;
        }

        if model.contains(ContentModel::PREFORMATTED) {
            let pre = mode | PrintMode::PREFORMATTED | PrintMode::NOWRAP;
            if !inline {
                self.cond_flush();
            }
            self.print_start_tag(id, mode, indent);
            if self.starts_with_newline(id) {
                self.flush(pre);
            }
            self.print_children(id, pre, 0);
            self.print_end_tag(id, pre, 0);
            if !inline {
                self.flush(mode);
            }
            return;
        }

        if model.contains(ContentModel::RAW_TEXT) {
            self.print_raw_text(id, mode, indent, inline);
            return;
        }

        if inline {
            self.print_start_tag(id, mode, indent);
            self.print_children(id, mode, indent);
            self.print_end_tag(id, mode, indent);
            return;
        }

        let children: Vec<NodeId> = doc.tree.children(id).collect();
        let block_children = children.iter().any(|&c| !self.flows_inline(c));
        // Indenting mixed content would add whitespace to the rendered text.
        let mixed = children
            .iter()
            .any(|&c| doc.tree.node(c).token.kind == NodeKind::Text);
        let indented = !mixed && self.should_indent(model, !children.is_empty(), block_children);

        self.cond_flush();
        self.print_start_tag(id, mode, indent);
        if indented || block_children {
            let child_indent = if indented {
                indent + self.config.indent_spaces
            } else {
                indent
            };
            if !mixed {
                self.flush(mode);
            }
            for &child in &children {
                self.print_node(child, mode, child_indent);
            }
            if !mixed {
                self.cond_flush();
            }
        } else {
            self.print_children(id, mode, indent);
        }
        self.print_end_tag(id, mode, indent);
        self.flush(mode);
    }

    fn starts_with_newline(&self, id: NodeId) -> bool {
        let doc = self.doc;
        doc.tree.node(id).first_child.is_some_and(|child| {
            doc.tree.node(child).token.kind == NodeKind::Text && doc.text_of(child).starts_with('\n')
        })
    }

    fn comment_style(&self, id: NodeId) -> CommentStyle {
        let kind = self
            .attr_value(id, "type")
            .or_else(|| self.attr_value(id, "language"))
            .map(str::to_ascii_lowercase);
        match kind.as_deref() {
            None | Some("") => {
                if self.doc.name_of(id) == Some("style") {
                    CommentStyle::Block
                } else {
                    CommentStyle::Slashes
                }
            }
            Some(t) if t.contains("css") => CommentStyle::Block,
            Some(t) if t.contains("vbscript") => CommentStyle::Quote,
            Some(t) if t.contains("javascript") || t.contains("ecmascript") || t.contains("jscript") => {
                CommentStyle::Slashes
            }
            Some(_) => CommentStyle::None,
        }
    }

    /// Script and style: content passes through untouched.
    fn print_raw_text(&mut self, id: NodeId, mode: PrintMode, indent: usize, inline: bool) {
        let doc = self.doc;
        let raw = mode | PrintMode::PREFORMATTED | PrintMode::CDATA | PrintMode::NOWRAP;
        let content: String = doc
            .tree
            .children(id)
            .filter(|&c| doc.tree.node(c).token.kind == NodeKind::Text)
            .map(|c| doc.text_of(c))
            .collect();

        if !inline {
            self.cond_flush();
        }
        self.print_start_tag(id, mode, indent);
        if !content.is_empty() {
            if self.config.xml_output() && !content.contains(CDATA_OPEN) {
                let (open, close) = self.comment_style(id).markers();
                self.flush(mode);
                self.put_str(open, raw, indent);
                self.flush(raw);
                self.print_text(content.trim_matches('\n'), raw, 0);
                self.flush(raw);
                self.put_str(close, raw, indent);
                self.flush(mode);
            } else {
                if content.starts_with('\n') {
                    self.flush(raw);
                }
                self.print_text(&content, raw, 0);
            }
        }
        self.print_end_tag(id, raw, 0);
        if !inline {
            self.flush(mode);
        }
    }

    fn print_start_tag(&mut self, id: NodeId, mode: PrintMode, indent: usize) {
        let doc = self.doc;
        let token = &doc.tree.node(id).token;
        let name = self.tag_name(id);
        let attr_indent = indent + self.config.indent_spaces;

        self.put('<', mode, indent);
        self.put_str(&name, mode, indent);
        for (i, attr) in token.attrs_in_order().enumerate() {
            if self.config.indent_attributes && i > 0 {
                self.flush(mode);
            } else {
                if mode.wrappable() {
                    self.check_wrap(attr_indent);
                    self.line.set_wraphere(false);
                }
                self.line.push(' ', attr_indent);
            }
            self.print_attr(attr, mode, attr_indent);
        }

        let empty = self.info(id).is_some_and(|info| info.is_empty());
        if token.kind == NodeKind::StartEndTag || (self.config.xml_output() && empty) {
            if self.config.xhtml_out {
                self.put(' ', mode, indent);
            }
            self.put('/', mode, indent);
        }
        self.put('>', mode, indent);
    }

    fn print_attr(&mut self, attr: &Attribute, mode: PrintMode, indent: usize) {
        let doc = self.doc;
        if let Some(code) = attr.code {
            let (open, close) = match code.kind {
                EmbeddedKind::Asp => ("<%", "%>"),
                EmbeddedKind::Php => ("<?", "?>"),
            };
            let raw = mode | PrintMode::CDATA | PrintMode::NOWRAP;
            self.put_str(open, raw, indent);
            self.print_text(doc.text.slice(code.span), raw, indent);
            self.put_str(close, raw, indent);
            return;
        }

        let Some(name) = attr.name.and_then(|n| doc.atoms.resolve(n)) else {
            return;
        };
        self.put_str(name, mode, indent);

        let value = match attr.value {
            Some(span) => doc.text.slice(span),
            None if self.config.xml_output() => name,
            None => return,
        };
        let delimiter = if self.config.xml_output() {
            '"'
        } else {
            attr.delimiter.unwrap_or('"')
        };
        let mut value_mode = mode | PrintMode::ATTRIB_VALUE;
        if !self.config.wrap_attributes {
            value_mode |= PrintMode::NOWRAP;
        }
        let script = name.len() > 2 && name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("on"));

        self.put('=', mode, indent);
        self.put(delimiter, value_mode, indent);
        let mut quote: Option<char> = None;
        for c in value.chars() {
            if script && (c == '"' || c == '\'') {
                quote = match quote {
                    Some(q) if q == c => None,
                    None => Some(c),
                    open => open,
                };
                self.line.set_in_string(quote.is_some());
            }
            if c == ' ' && value_mode.wrappable() {
                self.check_wrap(indent);
                self.line.set_wraphere(true);
            }
            self.put_escaped(c, value_mode, Some(delimiter), indent);
        }
        self.line.set_in_string(false);
        self.put(delimiter, value_mode, indent);
    }

    fn print_end_tag(&mut self, id: NodeId, mode: PrintMode, indent: usize) {
        let name = self.tag_name(id);
        self.put_str("</", mode, indent);
        self.put_str(&name, mode, indent);
        self.put('>', mode, indent);
    }
}
