//! Tree model for one parsed template file.
//!
//! Statement nodes ([`Node`]) and expression nodes ([`ExprNode`]) are tagged
//! unions. Parents own their children; expression trees hang off statements
//! through replaceable [`ExprRoot`] slots.

pub mod expr;
pub mod node;
pub mod var;
pub mod walk;

pub use expr::{
    BoolLiteralNode, ExprNode, ExprRoot, FieldAccessNode, FunctionCallNode, GlobalNode,
    IntLiteralNode, ListComprehensionNode, ListLiteralNode, NullNode, Operator, OperatorNode,
    RecordEntry, RecordLiteralNode, StringLiteralNode, TemplateLiteralNode, VarRefNode,
    VeLiteralNode,
};
pub use node::{
    CallData, CallNode, CallParamNode, CallParamValue, ForNode, ForNonemptyNode, IdGenerator,
    IfBranch, IfNode, LetNode, LetValue, Node, NodeId, PrintNode, RawTextNode, TemplateFile,
    TemplateNode, TemplateParam,
};
pub use var::{LocalVarDefn, SIGIL};
pub use walk::{
    collect_exprs, collect_nodes, for_each_node_mut, max_node_id, tree_depth, visit_exprs,
    visit_nodes,
};
