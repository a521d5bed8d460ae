//! Arena storage for the generic syntax tree.

use super::{NodeId, NodeKind, SyntaxNode, Slot};

/// An arena-held tree of [`SyntaxNode`]s.
///
/// Nodes are appended top-down: a node can only be added under a parent that
/// already exists, so parent links always point at lower indices and can
/// never form a cycle. Once added, a node's parent link is never changed.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Create a tree holding only `root`.
    pub fn new(root: SyntaxNode) -> Self {
        let mut root = root;
        root.parent = None;
        root.slot = Slot::Root;
        root.children.clear();
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append `node` as the last child of `parent` in `slot`.
    pub fn add(&mut self, parent: NodeId, slot: Slot, node: SyntaxNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut node = node;
        node.parent = Some(parent);
        node.slot = slot;
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// First child of `id` occupying `slot`.
    pub fn child(&self, id: NodeId, slot: Slot) -> Option<NodeId> {
        self.children_in(id, slot).next()
    }

    /// All children of `id` occupying `slot`, in source order.
    pub fn children_in(&self, id: NodeId, slot: Slot) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| self.node(*c).slot == slot)
    }

    /// Iterate over the ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// All node ids in pre-order (parents before children, source order).
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root()],
        }
    }
}

/// Iterator over a node's ancestor chain.
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

/// Pre-order traversal using an explicit stack.
pub struct Preorder<'a> {
    tree: &'a SyntaxTree,
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::DeclarationKind;

    #[test]
    fn test_add_sets_parent_and_slot() {
        let mut tree = SyntaxTree::new(SyntaxNode::new(NodeKind::Program));
        let decl = tree.add(
            tree.root(),
            Slot::Body,
            SyntaxNode::new(NodeKind::VariableDeclaration)
                .with_declaration_kind(DeclarationKind::Let),
        );
        let declarator = tree.add(decl, Slot::Declaration, SyntaxNode::new(NodeKind::VariableDeclarator));
        let id = tree.add(declarator, Slot::Id, SyntaxNode::identifier("x"));
        let init = tree.add(declarator, Slot::Init, SyntaxNode::number(7.0, "7"));

        assert_eq!(tree.parent(init), Some(declarator));
        assert_eq!(tree.node(init).slot, Slot::Init);
        assert_eq!(tree.child(declarator, Slot::Id), Some(id));
        assert_eq!(tree.child(declarator, Slot::Init), Some(init));
        assert_eq!(tree.child(declarator, Slot::Value), None);
        assert_eq!(tree.parent(tree.root()), None);
    }

    #[test]
    fn test_preorder_visits_in_source_order() {
        let mut tree = SyntaxTree::new(SyntaxNode::new(NodeKind::Program));
        let array = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Array));
        let a = tree.add(array, Slot::Element, SyntaxNode::number(1.0, "1"));
        let b = tree.add(array, Slot::Element, SyntaxNode::number(2.0, "2"));
        let after = tree.add(tree.root(), Slot::Body, SyntaxNode::string("x"));

        let order: Vec<NodeId> = tree.preorder().collect();
        assert_eq!(order, vec![tree.root(), array, a, b, after]);
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let mut tree = SyntaxTree::new(SyntaxNode::new(NodeKind::Program));
        let object = tree.add(tree.root(), Slot::Body, SyntaxNode::new(NodeKind::Object));
        let property = tree.add(object, Slot::Property, SyntaxNode::new(NodeKind::Property));
        let value = tree.add(property, Slot::Value, SyntaxNode::number(3.0, "3"));

        let chain: Vec<NodeId> = tree.ancestors(value).collect();
        assert_eq!(chain, vec![property, object, tree.root()]);
    }
}
