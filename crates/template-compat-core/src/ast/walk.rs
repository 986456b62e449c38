//! Shared tree traversal.
//!
//! Passes filter the file by node variant with [`collect_nodes`] /
//! [`collect_exprs`] and then act on the filtered list. Rewrites go through
//! [`for_each_node_mut`], which hands out one node at a time so a callback can
//! replace owned children without aliasing the rest of the tree.

use super::expr::ExprNode;
use super::node::{Node, NodeId, TemplateFile};

/// Visit every statement node in the file, pre-order.
///
/// Covers template bodies, `let` content, `if` branches, loop bodies and
/// `ifempty` blocks, and call param content.
pub fn visit_nodes<'a>(file: &'a TemplateFile, f: &mut dyn FnMut(&'a Node)) {
    for template in &file.templates {
        visit_block(&template.children, f);
    }
}

fn visit_block<'a>(nodes: &'a [Node], f: &mut dyn FnMut(&'a Node)) {
    for node in nodes {
        f(node);
        for block in node.child_blocks() {
            visit_block(block, f);
        }
    }
}

/// Visit every expression node reachable from any expression root, pre-order.
pub fn visit_exprs<'a>(file: &'a TemplateFile, f: &mut dyn FnMut(&'a ExprNode)) {
    visit_nodes(file, &mut |node| {
        for root in node.expr_roots() {
            visit_expr(root.root(), f);
        }
    });
}

fn visit_expr<'a>(expr: &'a ExprNode, f: &mut dyn FnMut(&'a ExprNode)) {
    f(expr);
    for child in expr.children() {
        visit_expr(child, f);
    }
}

/// Collect every statement node that `select` projects to a `T`.
///
/// ```
/// use template_compat_core::ast::{collect_nodes, Node, TemplateFile};
///
/// let file = TemplateFile { file_path: "a.tmpl".into(), namespace: "ns".into(), templates: vec![] };
/// let calls = collect_nodes(&file, |n| match n { Node::Call(c) => Some(c), _ => None });
/// assert!(calls.is_empty());
/// ```
pub fn collect_nodes<'a, T: ?Sized>(
    file: &'a TemplateFile,
    select: impl Fn(&'a Node) -> Option<&'a T>,
) -> Vec<&'a T> {
    let mut out = Vec::new();
    visit_nodes(file, &mut |node| {
        if let Some(item) = select(node) {
            out.push(item);
        }
    });
    out
}

/// Collect every expression node that `select` projects to a `T`.
pub fn collect_exprs<'a, T: ?Sized>(
    file: &'a TemplateFile,
    select: impl Fn(&'a ExprNode) -> Option<&'a T>,
) -> Vec<&'a T> {
    let mut out = Vec::new();
    visit_exprs(file, &mut |expr| {
        if let Some(item) = select(expr) {
            out.push(item);
        }
    });
    out
}

/// Mutably visit every statement node, pre-order.
///
/// The callback runs on a node before its child blocks are visited, so
/// children it installs are visited too.
pub fn for_each_node_mut(file: &mut TemplateFile, f: &mut dyn FnMut(&mut Node)) {
    for template in &mut file.templates {
        for_each_in_block_mut(&mut template.children, f);
    }
}

fn for_each_in_block_mut(nodes: &mut [Node], f: &mut dyn FnMut(&mut Node)) {
    for node in nodes {
        f(node);
        for block in node.child_blocks_mut() {
            for_each_in_block_mut(block, f);
        }
    }
}

/// Maximum nesting depth of statements and expressions in the file.
///
/// A template body counts as depth 1; each nested block or sub-expression
/// adds one.
pub fn tree_depth(file: &TemplateFile) -> usize {
    file.templates
        .iter()
        .map(|t| block_depth(&t.children))
        .max()
        .unwrap_or(0)
}

fn block_depth(nodes: &[Node]) -> usize {
    nodes.iter().map(node_depth).max().unwrap_or(0)
}

fn node_depth(node: &Node) -> usize {
    let blocks = node
        .child_blocks()
        .into_iter()
        .map(block_depth)
        .max()
        .unwrap_or(0);
    let exprs = node
        .expr_roots()
        .into_iter()
        .map(|r| expr_depth(r.root()))
        .max()
        .unwrap_or(0);
    1 + blocks.max(exprs)
}

fn expr_depth(expr: &ExprNode) -> usize {
    1 + expr
        .children()
        .into_iter()
        .map(expr_depth)
        .max()
        .unwrap_or(0)
}

/// Largest node id in the file, templates included.
pub fn max_node_id(file: &TemplateFile) -> Option<NodeId> {
    let mut max = file.templates.iter().map(|t| t.id).max();
    visit_nodes(file, &mut |node| {
        max = Some(max.map_or(node.id(), |m| m.max(node.id())));
    });
    max
}
