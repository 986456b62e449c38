//! Pass 0: Global Resolution
//!
//! The parser produces a `VarRef` for every name, with or without the `$`
//! sigil. This pass walks each template with a lexical scope and rewrites
//! every `VarRef` that
//! 1. does not resolve to an in-scope local (template param, earlier `let`,
//!    enclosing loop or comprehension variable), and
//! 2. does not start with `$`
//!
//! into a `Global` carrying the same identifier and location. Unresolved
//! `$` names are left alone. No diagnostics are reported.

use crate::ast::{
    CallData, CallParamValue, ExprNode, GlobalNode, IdGenerator, LetValue, ListComprehensionNode,
    LocalVarDefn, Node, TemplateFile, SIGIL,
};
use crate::diagnostics::ErrorReporter;
use crate::passes::FilePass;
use crate::source::Identifier;

pub const NAME: &str = "resolve-globals";

/// Classifies bare names that no local binding claims as globals.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveGlobalsPass;

impl FilePass for ResolveGlobalsPass {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run(
        &self,
        file: &mut TemplateFile,
        _id_gen: &mut IdGenerator,
        _reporter: &mut dyn ErrorReporter,
    ) {
        let count = resolve_globals(file);
        tracing::debug!(file = %file.file_path, globals = count, "resolved globals");
    }
}

/// Rewrite unresolved bare names in `file`; returns how many were rewritten.
pub fn resolve_globals(file: &mut TemplateFile) -> usize {
    let mut resolver = Resolver::default();
    for template in &mut file.templates {
        let mark = resolver.scope.len();
        for param in &template.params {
            resolver.scope.push(param_binding(&param.name.identifier));
        }
        resolver.block(&mut template.children);
        resolver.scope.truncate(mark);
    }
    resolver.rewritten
}

/// The in-body name of a template param, which may be declared with or
/// without the sigil.
fn param_binding(name: &str) -> String {
    if name.starts_with(SIGIL) {
        name.to_string()
    } else {
        format!("{SIGIL}{name}")
    }
}

// ---------------------------------------------------------------------------
// Scoped walker
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Resolver {
    /// Names in scope, innermost last. Blocks truncate back to a mark on exit.
    scope: Vec<String>,
    rewritten: usize,
}

impl Resolver {
    fn is_local(&self, name: &str) -> bool {
        self.scope.iter().rev().any(|n| n == name)
    }

    fn declare(&mut self, var: &LocalVarDefn) {
        self.scope.push(var.original_name.clone());
    }

    /// A `let` is visible to the siblings that follow it, until the block ends.
    fn block(&mut self, nodes: &mut [Node]) {
        let mark = self.scope.len();
        for node in nodes {
            self.node(node);
        }
        self.scope.truncate(mark);
    }

    fn node(&mut self, node: &mut Node) {
        match node {
            Node::RawText(_) => {}
            Node::Print(print) => self.expr(print.expr.root_mut()),
            Node::Let(let_node) => {
                match &mut let_node.value {
                    LetValue::Expr(value) => self.expr(value.root_mut()),
                    LetValue::Content(children) => self.block(children),
                }
                self.declare(&let_node.var);
            }
            Node::If(if_node) => {
                for branch in &mut if_node.branches {
                    if let Some(condition) = &mut branch.condition {
                        self.expr(condition.root_mut());
                    }
                    self.block(&mut branch.children);
                }
            }
            Node::For(for_node) => {
                self.expr(for_node.iterable.root_mut());

                let mark = self.scope.len();
                self.declare(&for_node.nonempty.var);
                if let Some(index) = &for_node.nonempty.index_var {
                    self.declare(index);
                }
                self.block(&mut for_node.nonempty.children);
                self.scope.truncate(mark);

                if let Some(ifempty) = &mut for_node.ifempty {
                    self.block(ifempty);
                }
            }
            Node::Call(call) => {
                self.expr(call.callee.root_mut());
                if let Some(CallData::Expr(data)) = &mut call.data {
                    self.expr(data.root_mut());
                }
                for param in &mut call.params {
                    match &mut param.value {
                        CallParamValue::Expr(value) => self.expr(value.root_mut()),
                        CallParamValue::Content(children) => self.block(children),
                    }
                }
            }
        }
    }

    fn expr(&mut self, expr: &mut ExprNode) {
        match expr {
            ExprNode::VarRef(var) if !var.name.starts_with(SIGIL) && !self.is_local(&var.name) => {
                let identifier = Identifier::new(var.name.clone(), var.location.clone());
                tracing::trace!(name = %identifier.identifier, "var ref resolved to global");
                *expr = ExprNode::Global(GlobalNode { identifier });
                self.rewritten += 1;
            }
            ExprNode::ListComprehension(comprehension) => self.comprehension(comprehension),
            other => {
                for child in other.children_mut() {
                    self.expr(child);
                }
            }
        }
    }

    /// The iteration variables are visible in the item map and filter only.
    fn comprehension(&mut self, node: &mut ListComprehensionNode) {
        self.expr(&mut node.list_expr);

        let mark = self.scope.len();
        self.declare(&node.list_iter_var);
        if let Some(index) = &node.index_var {
            self.declare(index);
        }
        self.expr(&mut node.item_map);
        if let Some(filter) = &mut node.filter {
            self.expr(filter);
        }
        self.scope.truncate(mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        CallNode, ExprRoot, ForNode, ForNonemptyNode, LetNode, PrintNode, TemplateNode,
        TemplateParam, VarRefNode,
    };
    use crate::source::SourceLocation;
    use pretty_assertions::assert_eq;

    fn loc(col: u32) -> SourceLocation {
        SourceLocation::on_line("resolve.tmpl", 1, col, 1)
    }

    fn var_ref(name: &str, col: u32) -> ExprNode {
        ExprNode::VarRef(VarRefNode {
            name: name.to_string(),
            location: loc(col),
        })
    }

    fn print(id: u32, expr: ExprNode) -> Node {
        Node::Print(PrintNode {
            id,
            expr: ExprRoot::new(expr),
        })
    }

    fn file_with(params: Vec<&str>, children: Vec<Node>) -> TemplateFile {
        TemplateFile {
            file_path: "resolve.tmpl".to_string(),
            namespace: "ns".to_string(),
            templates: vec![TemplateNode {
                id: 0,
                name: Identifier::new("main", loc(1)),
                params: params
                    .into_iter()
                    .map(|p| TemplateParam {
                        name: Identifier::new(p, loc(1)),
                    })
                    .collect(),
                children,
            }],
        }
    }

    fn printed(file: &TemplateFile, index: usize) -> &ExprNode {
        match &file.templates[0].children[index] {
            Node::Print(p) => p.expr.root(),
            other => panic!("expected print, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_unbound_name_becomes_global() {
        let mut file = file_with(vec![], vec![print(1, var_ref("FOO", 4))]);
        assert_eq!(resolve_globals(&mut file), 1);
        assert_eq!(
            printed(&file, 0),
            &ExprNode::Global(GlobalNode {
                identifier: Identifier::new("FOO", loc(4)),
            })
        );
    }

    #[test]
    fn test_sigil_names_are_never_globals() {
        let mut file = file_with(vec![], vec![print(1, var_ref("$undefined", 4))]);
        assert_eq!(resolve_globals(&mut file), 0);
        assert!(matches!(printed(&file, 0), ExprNode::VarRef(_)));
    }

    #[test]
    fn test_let_without_sigil_shadows_global() {
        let let_node = Node::Let(LetNode {
            id: 1,
            var: LocalVarDefn::new("x", loc(2)),
            value: LetValue::Expr(ExprRoot::new(var_ref("$p", 3))),
        });
        let mut file = file_with(vec!["p"], vec![let_node, print(2, var_ref("x", 5))]);
        assert_eq!(resolve_globals(&mut file), 0);
        assert!(matches!(printed(&file, 1), ExprNode::VarRef(_)));
    }

    #[test]
    fn test_let_is_not_visible_before_its_definition() {
        let let_node = Node::Let(LetNode {
            id: 2,
            var: LocalVarDefn::new("x", loc(2)),
            value: LetValue::Expr(ExprRoot::new(var_ref("x", 3))),
        });
        let mut file = file_with(vec![], vec![print(1, var_ref("x", 1)), let_node]);
        // both the earlier print and the let's own initializer see a global
        assert_eq!(resolve_globals(&mut file), 2);
    }

    #[test]
    fn test_loop_var_scope_ends_with_loop_body() {
        let for_node = Node::For(ForNode {
            id: 1,
            iterable: ExprRoot::new(var_ref("$items", 1)),
            nonempty: ForNonemptyNode {
                var: LocalVarDefn::new("item", loc(2)),
                index_var: Some(LocalVarDefn::new("i", loc(3))),
                children: vec![print(2, var_ref("item", 4)), print(3, var_ref("i", 5))],
            },
            ifempty: Some(vec![print(4, var_ref("item", 6))]),
        });
        let mut file = file_with(vec!["items"], vec![for_node, print(5, var_ref("i", 7))]);
        // `item` in ifempty and `i` after the loop are unbound
        assert_eq!(resolve_globals(&mut file), 2);
    }

    #[test]
    fn test_comprehension_var_scoped_to_item_map_and_filter() {
        let comprehension = ExprNode::ListComprehension(ListComprehensionNode {
            list_iter_var: LocalVarDefn::new("x", loc(2)),
            index_var: None,
            list_expr: Box::new(var_ref("x", 3)),
            item_map: Box::new(var_ref("x", 4)),
            filter: Some(Box::new(var_ref("x", 5))),
            location: loc(1),
        });
        let mut file = file_with(vec![], vec![print(1, comprehension)]);
        assert_eq!(resolve_globals(&mut file), 1);
        match printed(&file, 0) {
            ExprNode::ListComprehension(c) => {
                assert!(matches!(c.list_expr.as_ref(), ExprNode::Global(_)));
                assert!(matches!(c.item_map.as_ref(), ExprNode::VarRef(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_param_binding_adds_sigil_only_when_missing() {
        assert_eq!(param_binding("p"), "$p");
        assert_eq!(param_binding("$p"), "$p");
    }

    #[test]
    fn test_call_callee_becomes_global() {
        let call = Node::Call(CallNode {
            id: 1,
            open_tag_location: loc(1),
            callee: ExprRoot::new(var_ref("other.template", 7)),
            data: None,
            params: vec![],
        });
        let mut file = file_with(vec![], vec![call]);
        resolve_globals(&mut file);
        match &file.templates[0].children[0] {
            Node::Call(call) => assert!(matches!(call.callee.root(), ExprNode::Global(_))),
            other => panic!("unexpected {other:?}"),
        }
    }
}
