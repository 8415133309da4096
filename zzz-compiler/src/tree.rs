//! Syntax tree arena.
//!
//! Nodes live in one growable arena; children and the parent back-reference
//! are indices, so upward traversal (scope-chain lookups) needs no ownership
//! cycle.

use crate::frontend::grammar::NonTerm;
use crate::frontend::lexer::Token;
use crate::symbols::SymbolId;
use crate::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// A grammar production.
    NonTerm(NonTerm),
    /// A consumed terminal, carrying its token.
    Term(Token),
    /// An empty production alternative.
    Epsilon,
}

#[derive(Debug)]
pub struct Node {
    pub label: Label,
    pub value: Option<String>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub symbol: Option<SymbolId>,
    pub location: SourceLocation,
}

#[derive(Debug, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&mut self, nt: NonTerm) -> NodeId {
        debug_assert!(self.nodes.is_empty());
        self.push(Label::NonTerm(nt), None)
    }

    pub fn add(&mut self, parent: NodeId, label: Label) -> NodeId {
        let id = self.push(label, Some(parent));
        self.nodes[parent.0].children.push(id);
        id
    }

    fn push(&mut self, label: Label, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            label,
            value: None,
            parent,
            children: Vec::new(),
            symbol: None,
            location: SourceLocation::default(),
        });
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Children as an owned list, convenient while mutating other nodes.
    pub fn kids(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id.0].children.clone()
    }

    pub fn child(&self, id: NodeId, index: usize) -> NodeId {
        self.nodes[id.0].children[index]
    }

    pub fn value(&self, id: NodeId) -> &str {
        self.nodes[id.0].value.as_deref().unwrap_or("")
    }

    pub fn symbol(&self, id: NodeId) -> Option<SymbolId> {
        self.nodes[id.0].symbol
    }

    pub fn location(&self, id: NodeId) -> SourceLocation {
        self.nodes[id.0].location
    }

    pub fn nt(&self, id: NodeId) -> Option<NonTerm> {
        match self.nodes[id.0].label {
            Label::NonTerm(nt) => Some(nt),
            _ => None,
        }
    }

    pub fn is(&self, id: NodeId, nt: NonTerm) -> bool {
        self.nt(id) == Some(nt)
    }

    pub fn term(&self, id: NodeId) -> Option<&Token> {
        match &self.nodes[id.0].label {
            Label::Term(token) => Some(token),
            _ => None,
        }
    }

    pub fn is_epsilon(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].label, Label::Epsilon)
    }

    /// Indented dump of the whole tree, for debugging the parser.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(self.root(), 0, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, indent: usize, out: &mut String) {
        let node = &self.nodes[id.0];
        out.push_str(&"| ".repeat(indent));
        match &node.label {
            Label::NonTerm(nt) => out.push_str(&nt.to_string()),
            Label::Term(token) => match &node.value {
                Some(value) if value != &token.to_string() => {
                    out.push_str(&format!("{token} ({value})"))
                }
                _ => out.push_str(&token.to_string()),
            },
            Label::Epsilon => out.push_str("epsilon"),
        }
        if let Some(symbol) = node.symbol {
            out.push_str(&format!(" #{}", symbol.0));
        }
        out.push('\n');
        for &child in &node.children {
            self.render_node(child, indent + 1, out);
        }
    }
}
