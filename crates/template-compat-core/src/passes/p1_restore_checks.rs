//! Pass 1: Restore Compiler Checks
//!
//! The grammar no longer separates `$`-prefixed variable references from bare
//! global names, so several checks the parser used to make now happen here,
//! after global resolution:
//! 1. Call targets that resolved to a `Global` become synthetic template
//!    literals (silent rewrite).
//! 2. `data=` is reported on calls whose target is not static.
//! 3. Every local binding name (`let`, loop var/index, comprehension
//!    var/index) must start with `$`.
//! 4. A `ve(...)` name must not start with `$`.
//!
//! Problems are reported through the [`ErrorReporter`] and the scan always
//! covers the whole file.

use crate::ast::{
    collect_exprs, collect_nodes, for_each_node_mut, ExprNode, ExprRoot, IdGenerator,
    LocalVarDefn, Node, TemplateFile, TemplateLiteralNode, SIGIL,
};
use crate::diagnostics::{DiagnosticKind, ErrorReporter};
use crate::passes::{p0_resolve_globals, FilePass};

pub const NAME: &str = "restore-compiler-checks";

#[derive(Debug, Default, Clone, Copy)]
pub struct RestoreCompilerChecksPass;

impl FilePass for RestoreCompilerChecksPass {
    fn name(&self) -> &'static str {
        NAME
    }

    fn run_after(&self) -> &'static [&'static str] {
        &[p0_resolve_globals::NAME]
    }

    fn run(
        &self,
        file: &mut TemplateFile,
        _id_gen: &mut IdGenerator,
        reporter: &mut dyn ErrorReporter,
    ) {
        // Order matters only between these two: rewritten callees must count
        // as static before `data=` is validated.
        let rewritten = rewrite_global_callees(file);
        validate_data_attributes(file, reporter);

        check_local_var_names(file, reporter);
        check_ve_literal_names(file, reporter);

        tracing::debug!(file = %file.file_path, rewritten, "restored compiler checks");
    }
}

/// Replace every `Global` call target with a synthetic template literal.
///
/// Returns the number of callees replaced.
pub fn rewrite_global_callees(file: &mut TemplateFile) -> usize {
    let mut rewritten = 0;
    for_each_node_mut(file, &mut |node| {
        let Node::Call(call) = node else {
            return;
        };
        if let ExprNode::Global(global) = call.callee_expr().root() {
            let literal = TemplateLiteralNode::synthetic(global.identifier.clone());
            tracing::trace!(callee = %literal.identifier.identifier, "global callee rewritten");
            call.set_callee_expr(ExprRoot::new(ExprNode::TemplateLiteral(literal)));
            rewritten += 1;
        }
    });
    rewritten
}

/// `data=` is only meaningful when the callee is a fixed template.
pub fn validate_data_attributes(file: &TemplateFile, reporter: &mut dyn ErrorReporter) {
    let calls = collect_nodes(file, |node| match node {
        Node::Call(call) => Some(call),
        _ => None,
    });
    for call in calls {
        if call.is_passing_data() && !call.is_static_call() {
            reporter.report(
                &call.open_tag_location,
                DiagnosticKind::DataAttributeOnlyAllowedOnStaticCalls,
            );
        }
    }
}

/// Every local binding must be spelled with the sigil.
pub fn check_local_var_names(file: &TemplateFile, reporter: &mut dyn ErrorReporter) {
    let lets = collect_nodes(file, |node| match node {
        Node::Let(let_node) => Some(&let_node.var),
        _ => None,
    });
    for var in lets {
        check_dollar_ident(var, reporter);
    }

    let loops = collect_nodes(file, |node| match node {
        Node::For(for_node) => Some(&for_node.nonempty),
        _ => None,
    });
    for nonempty in loops {
        check_dollar_ident(&nonempty.var, reporter);
        if let Some(index) = &nonempty.index_var {
            check_dollar_ident(index, reporter);
        }
    }

    let comprehensions = collect_exprs(file, |expr| match expr {
        ExprNode::ListComprehension(node) => Some(node),
        _ => None,
    });
    for comprehension in comprehensions {
        check_dollar_ident(&comprehension.list_iter_var, reporter);
        if let Some(index) = &comprehension.index_var {
            check_dollar_ident(index, reporter);
        }
    }
}

fn check_dollar_ident(var: &LocalVarDefn, reporter: &mut dyn ErrorReporter) {
    if !var.has_sigil() {
        reporter.report(&var.name_location, DiagnosticKind::MustBeDollarIdent);
    }
}

/// `ve($x)` parses now, but a visual element name must be a constant.
pub fn check_ve_literal_names(file: &TemplateFile, reporter: &mut dyn ErrorReporter) {
    let ve_literals = collect_exprs(file, |expr| match expr {
        ExprNode::VeLiteral(node) => Some(node),
        _ => None,
    });
    for ve in ve_literals {
        if ve.name.identifier.starts_with(SIGIL) {
            reporter.report(&ve.name.location, DiagnosticKind::MustBeConstant);
        }
    }
}
