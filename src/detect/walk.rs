//! Host-side traversal: dispatches nodes to the rules that asked for them.

use crate::engine::DiagnosticSink;
use crate::rules::Rule;
use crate::syntax::SyntaxTree;

/// Visit `tree` in pre-order, calling each rule for the node kinds it is
/// interested in, then run every rule's end-of-traversal callback.
pub fn walk(tree: &SyntaxTree, rules: &mut [Box<dyn Rule>], sink: &mut dyn DiagnosticSink) {
    for node in tree.preorder() {
        let kind = tree.kind(node);
        for rule in rules.iter_mut() {
            if rule.interests().contains(&kind) {
                rule.check(tree, node, sink);
            }
        }
    }
    for rule in rules.iter_mut() {
        rule.finish(tree, sink);
    }
}
