//! Arena-backed node tree.

use crate::arena::{Span, TextArena};
use crate::atom::AtomTable;
use crate::lexer::DoctypeVersion;
use crate::stream::Position;
use crate::token::{NodeKind, Token};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

#[derive(Clone, Debug)]
pub struct Node {
    pub token: Token,
    pub parent: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
}

/// Single-rooted tree; every non-root node has exactly one parent.
#[derive(Clone, Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    pub const ROOT: NodeId = NodeId(0);

    pub fn new() -> Self {
        let root = Node {
            token: Token::new(NodeKind::Root, Span::default(), Position::START),
            parent: None,
            prev: None,
            next: None,
            first_child: None,
            last_child: None,
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0 as usize]
    }

    /// Append `token` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, token: Token) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let prev = self.node(parent).last_child;
        self.nodes.push(Node {
            token,
            parent: Some(parent),
            prev,
            next: None,
            first_child: None,
            last_child: None,
        });
        match prev {
            Some(prev) => self.node_mut(prev).next = Some(id),
            None => self.node_mut(parent).first_child = Some(id),
        }
        self.node_mut(parent).last_child = Some(id);
        id
    }

    pub fn children(&self, parent: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.node(parent).first_child,
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Children<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.node(id).next;
        Some(id)
    }
}

/// A lexed document: the tree plus the storage its spans and names point into.
#[derive(Debug)]
pub struct Document {
    pub tree: Tree,
    pub text: TextArena,
    pub atoms: AtomTable,
    pub doctype: Option<DoctypeVersion>,
}

impl Document {
    pub fn text_of(&self, id: NodeId) -> &str {
        self.text.slice(self.tree.node(id).token.span)
    }

    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.tree
            .node(id)
            .token
            .name
            .and_then(|name| self.atoms.resolve(name))
    }
}
