//! Id lookup and upward property inheritance over a parsed [`EmailDocument`].

use log::warn;

use crate::document::{Block, Cell, EmailDocument, NodeId, NodeKind, Widget, ROOT_ID};
use crate::style::{PropValue, Style, StyleProperty};

/// Depth of the deepest node (a widget) below the root
const MAX_DEPTH: usize = 3;

/// A borrowed view of any node in the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Document(&'a EmailDocument),
    Block(&'a Block),
    Cell(&'a Cell),
    Widget(&'a Widget),
}

impl<'a> Node<'a> {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Document(d) => d.id,
            Node::Block(b) => b.id,
            Node::Cell(c) => c.id,
            Node::Widget(w) => w.id,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Document(_) => NodeKind::Document,
            Node::Block(_) => NodeKind::Block,
            Node::Cell(_) => NodeKind::Cell,
            Node::Widget(_) => NodeKind::Widget,
        }
    }

    pub fn style(&self) -> &'a Style {
        match self {
            Node::Document(d) => &d.style,
            Node::Block(b) => &b.style,
            Node::Cell(c) => &c.style,
            Node::Widget(w) => &w.style,
        }
    }

    /// The node's own value for `property`, without inheritance
    pub fn property(&self, property: StyleProperty) -> Option<&'a PropValue> {
        self.style().get(property)
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Node::Document(_))
    }
}

fn sorted_blocks(doc: &EmailDocument) -> Vec<&Block> {
    let mut blocks: Vec<&Block> = doc.blocks.iter().collect();
    blocks.sort_by(|a, b| a.position.total_cmp(&b.position));
    blocks
}

fn sorted_widgets(cell: &Cell) -> Vec<&Widget> {
    let mut widgets: Vec<&Widget> = cell.widgets.iter().collect();
    widgets.sort_by(|a, b| a.position.total_cmp(&b.position));
    widgets
}

/// Find a node by id.
///
/// Blocks and widgets are searched in `position` order, cells in stored order.
/// Id `0` and ids that match nothing both return the document root.
pub fn find_by_id(doc: &EmailDocument, id: NodeId) -> Node<'_> {
    if id == ROOT_ID {
        return Node::Document(doc);
    }
    for block in sorted_blocks(doc) {
        if block.id == id {
            return Node::Block(block);
        }
        for cell in &block.cells {
            if cell.id == id {
                return Node::Cell(cell);
            }
            for widget in sorted_widgets(cell) {
                if widget.id == id {
                    return Node::Widget(widget);
                }
            }
        }
    }
    warn!("node {} not found, falling back to document root", id);
    Node::Document(doc)
}

/// Find the parent of the node with the given id.
///
/// Returns `None` for the root (id `0`) and for ids that are not a block,
/// a cell or a widget of this document.
pub fn find_parent(doc: &EmailDocument, id: NodeId) -> Option<Node<'_>> {
    if id == ROOT_ID {
        return None;
    }
    if doc.blocks.iter().any(|b| b.id == id) {
        return Some(Node::Document(doc));
    }
    for block in &doc.blocks {
        if block.cells.iter().any(|c| c.id == id) {
            return Some(Node::Block(block));
        }
        for cell in &block.cells {
            if cell.widgets.iter().any(|w| w.id == id) {
                return Some(Node::Cell(cell));
            }
        }
    }
    None
}

/// Resolve the effective value of `property` for the node with the given id.
///
/// Returns the node's own value if set, otherwise the value of the nearest
/// ancestor that sets it, otherwise an empty string.
pub fn resolve_property(doc: &EmailDocument, id: NodeId, property: StyleProperty) -> PropValue {
    let node = find_by_id(doc, id);
    if let Some(value) = node.property(property) {
        return value.clone();
    }
    if node.is_root() {
        return PropValue::empty();
    }

    let mut current = node.id();
    for _ in 0..MAX_DEPTH {
        let Some(parent) = find_parent(doc, current) else {
            return PropValue::empty();
        };
        if let Some(value) = parent.property(property) {
            return value.clone();
        }
        if parent.is_root() {
            return PropValue::empty();
        }
        current = parent.id();
    }

    warn!(
        "inheritance walk for '{}' from node {} exceeded the tree depth",
        property.key(),
        id
    );
    PropValue::empty()
}

/// All ancestors of the node with the given id, nearest first
pub fn ancestors(doc: &EmailDocument, id: NodeId) -> Vec<Node<'_>> {
    let mut chain = Vec::new();
    let mut current = find_by_id(doc, id);
    while !current.is_root() && chain.len() <= MAX_DEPTH {
        match find_parent(doc, current.id()) {
            Some(parent) => {
                chain.push(parent);
                current = parent;
            }
            None => break,
        }
    }
    chain
}
