//! Naive tree assembly.
//!
//! Nests tokens with an open-element stack and nothing else: no implied
//! elements, no tag-omission rules. Enough to print what was lexed.

use crate::atom::AtomId;
use crate::diag::{DiagnosticKind, DiagnosticSink};
use crate::lexer::{LexMode, Lexer};
use crate::tags::{ContentModel, TagDictionary, TagInfo};
use crate::token::{NodeFlags, NodeKind, Token};
use crate::tree::{Document, NodeId, Tree};

struct Open {
    node: NodeId,
    name: Option<AtomId>,
    info: Option<TagInfo>,
}

pub fn assemble(mut lexer: Lexer<'_>, diag: &mut dyn DiagnosticSink) -> Document {
    let mut tree = Tree::new();
    let mut open: Vec<Open> = Vec::new();

    loop {
        let mode = lex_mode(&tree, &open, lexer.tags());
        let Some(token) = lexer.next_token(mode, diag) else {
            break;
        };
        let parent = open.last().map_or(Tree::ROOT, |o| o.node);

        match token.kind {
            NodeKind::StartTag => {
                let info = token.tag.and_then(|id| lexer.tags().info(id)).copied();
                let name = token.name;
                let node = tree.append_child(parent, token);
                if info.is_some_and(|i| i.is_empty()) {
                    continue;
                }
                if let Some(name) = name.filter(|_| has_model(info, ContentModel::RAW_TEXT)) {
                    if let Some(text) = lexer.next_raw_text(name, diag) {
                        tree.append_child(node, text);
                    }
                }
                open.push(Open { node, name, info });
            }
            NodeKind::EndTag => close_element(&mut tree, &mut open, &token, &lexer, diag),
            _ => {
                tree.append_child(parent, token);
            }
        }
    }

    for o in open.into_iter().rev() {
        close_implicitly(&mut tree, &o, &lexer, diag);
    }
    lexer.into_document(tree)
}

fn has_model(info: Option<TagInfo>, bits: ContentModel) -> bool {
    info.is_some_and(|i| i.model.intersects(bits))
}

/// Whitespace mode for the next token given the insertion point.
fn lex_mode(tree: &Tree, open: &[Open], tags: &dyn TagDictionary) -> LexMode {
    if open.iter().any(|o| has_model(o.info, ContentModel::PREFORMATTED)) {
        return LexMode::Preformatted;
    }
    let Some(top) = open.last() else {
        return LexMode::IgnoreWhitespace;
    };
    // Unknown elements count as inline.
    if top.info.is_none_or(|i| i.is_inline()) {
        return LexMode::MixedContent;
    }
    match tree.node(top.node).last_child {
        Some(last) if flows_inline(&tree.node(last).token, tags) => LexMode::MixedContent,
        _ => LexMode::IgnoreWhitespace,
    }
}

fn flows_inline(token: &Token, tags: &dyn TagDictionary) -> bool {
    match token.kind {
        NodeKind::Text => true,
        NodeKind::StartTag | NodeKind::StartEndTag => token
            .tag
            .and_then(|id| tags.info(id))
            .is_none_or(|info| info.is_inline()),
        _ => false,
    }
}

fn close_element(
    tree: &mut Tree,
    open: &mut Vec<Open>,
    end: &Token,
    lexer: &Lexer<'_>,
    diag: &mut dyn DiagnosticSink,
) {
    let Some(at) = open.iter().rposition(|o| o.name.is_some() && o.name == end.name) else {
        let name = end.name.and_then(|n| lexer.atoms().resolve(n)).unwrap_or("");
        diag.push(
            DiagnosticKind::UnexpectedEndTag,
            end.position.line,
            end.position.column,
            name,
        );
        return;
    };
    for o in open.drain(at + 1..).rev() {
        close_implicitly(tree, &o, lexer, diag);
    }
    if let Some(o) = open.pop() {
        tree.node_mut(o.node).token.flags |= NodeFlags::CLOSED;
    }
}

fn close_implicitly(tree: &mut Tree, o: &Open, lexer: &Lexer<'_>, diag: &mut dyn DiagnosticSink) {
    let token = &mut tree.node_mut(o.node).token;
    token.flags |= NodeFlags::IMPLICIT;
    if !has_model(o.info, ContentModel::OPT) {
        let name = o.name.and_then(|n| lexer.atoms().resolve(n)).unwrap_or("");
        diag.push(
            DiagnosticKind::MissingEndTag,
            token.position.line,
            token.position.column,
            name,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::diag::Diagnostics;
    use crate::tags::HtmlTagTable;

    fn build(input: &str) -> (Document, Diagnostics) {
        let tags = HtmlTagTable::new();
        let config = Config::default();
        let mut diag = Diagnostics::default();
        let lexer = Lexer::new(input.as_bytes().to_vec(), &config, &tags);
        let doc = assemble(lexer, &mut diag);
        (doc, diag)
    }

    /// Nested s-expression of element names and quoted text.
    fn outline(doc: &Document, id: NodeId) -> String {
        let mut parts = Vec::new();
        for child in doc.tree.children(id) {
            let token = &doc.tree.node(child).token;
            match token.kind {
                NodeKind::Text => parts.push(format!("{:?}", doc.text_of(child))),
                NodeKind::StartTag | NodeKind::StartEndTag => {
                    let name = doc.name_of(child).unwrap_or("?");
                    if doc.tree.node(child).first_child.is_some() {
                        parts.push(format!("({name} {})", outline(doc, child)));
                    } else {
                        parts.push(format!("({name})"));
                    }
                }
                kind => parts.push(format!("{kind:?}")),
            }
        }
        parts.join(" ")
    }

    #[test]
    fn nests_elements_and_text() {
        let (doc, diag) = build("<div><p>a <b>b</b> c</p></div>");
        assert_eq!(outline(&doc, Tree::ROOT), r#"(div (p "a " (b "b") " c"))"#);
        assert!(diag.is_empty());
    }

    #[test]
    fn void_elements_are_leaves() {
        let (doc, _) = build("<p>a<br>b<img src=x>c</p>");
        assert_eq!(outline(&doc, Tree::ROOT), r#"(p "a" (br) "b" (img) "c")"#);
    }

    #[test]
    fn block_whitespace_is_dropped() {
        let (doc, _) = build("<ul>\n  <li>x</li>\n  <li>y</li>\n</ul>\n");
        assert_eq!(outline(&doc, Tree::ROOT), r#"(ul (li "x") (li "y"))"#);
    }

    #[test]
    fn preformatted_content_is_verbatim() {
        let (doc, _) = build("<div><pre>  a\n  b</pre></div>");
        assert_eq!(outline(&doc, Tree::ROOT), r#"(div (pre "  a\n  b"))"#);
    }

    #[test]
    fn raw_text_is_one_child() {
        let (doc, _) = build("<script>if (a<b) {}</script><p>x</p>");
        assert_eq!(outline(&doc, Tree::ROOT), r#"(script "if (a<b) {}") (p "x")"#);
    }

    #[test]
    fn unmatched_end_tag_is_dropped() {
        let (doc, diag) = build("<p>a</b>b</p>");
        assert_eq!(outline(&doc, Tree::ROOT), r#"(p "a" "b")"#);
        assert_eq!(diag.count(DiagnosticKind::UnexpectedEndTag), 1);
    }

    #[test]
    fn unclosed_elements_close_implicitly() {
        let (doc, diag) = build("<div><b>x</div>");
        let div = doc.tree.children(Tree::ROOT).next().unwrap();
        let b = doc.tree.children(div).next().unwrap();
        assert!(doc.tree.node(div).token.flags.contains(NodeFlags::CLOSED));
        assert!(doc.tree.node(b).token.flags.contains(NodeFlags::IMPLICIT));
        assert_eq!(diag.count(DiagnosticKind::MissingEndTag), 1);
    }

    #[test]
    fn optional_end_tags_are_not_reported() {
        let (doc, diag) = build("<ul><li>a</ul><p>b");
        assert_eq!(outline(&doc, Tree::ROOT), r#"(ul (li "a")) (p "b")"#);
        assert!(!diag.contains(DiagnosticKind::MissingEndTag));
    }

    #[test]
    fn doctype_and_comments_are_kept() {
        let (doc, _) = build("<!DOCTYPE html>\n<!-- c -->\n<html></html>");
        assert_eq!(outline(&doc, Tree::ROOT), "DocType Comment (html)");
        assert_eq!(doc.doctype, Some(crate::lexer::DoctypeVersion::Html5));
    }
}
