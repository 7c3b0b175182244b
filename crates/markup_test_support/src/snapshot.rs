//! Flatten an assembled document back into token lines.

use markup::{Document, NodeFlags, NodeId, NodeKind, TokenFmt, TokenFmtError, Tree};

/// One [`TokenFmt`] line per node in document order, with an `END` line
/// after each element that was closed. Inferred closes are marked
/// `implicit`.
pub fn document_lines(doc: &Document) -> Result<Vec<String>, TokenFmtError> {
    let fmt = TokenFmt::new(&doc.atoms, &doc.text);
    let mut out = Vec::new();
    for child in doc.tree.children(Tree::ROOT) {
        walk(doc, &fmt, child, &mut out)?;
    }
    Ok(out)
}

fn walk(
    doc: &Document,
    fmt: &TokenFmt<'_>,
    id: NodeId,
    out: &mut Vec<String>,
) -> Result<(), TokenFmtError> {
    let token = &doc.tree.node(id).token;
    out.push(fmt.format_token(token)?);
    for child in doc.tree.children(id) {
        walk(doc, fmt, child, out)?;
    }
    if token.kind != NodeKind::StartTag {
        return Ok(());
    }
    if token.flags.contains(NodeFlags::IMPLICIT) {
        out.push(format!("END name={} implicit", doc.name_of(id).unwrap_or("")));
    } else if token.flags.contains(NodeFlags::CLOSED) {
        out.push(format!("END name={}", doc.name_of(id).unwrap_or("")));
    }
    Ok(())
}
