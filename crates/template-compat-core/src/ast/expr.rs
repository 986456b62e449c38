//! Expression trees.
//!
//! Every expression-bearing statement owns its expression through an
//! [`ExprRoot`] slot, so replacing an expression is a plain move into that
//! slot. Sub-expressions are owned by their parent node.

use serde::{Deserialize, Serialize};

use super::var::LocalVarDefn;
use crate::source::{Identifier, SourceLocation};

/// Owning slot for a complete expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExprRoot {
    pub root: ExprNode,
}

impl ExprRoot {
    pub fn new(root: ExprNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ExprNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut ExprNode {
        &mut self.root
    }
}

impl From<ExprNode> for ExprRoot {
    fn from(root: ExprNode) -> Self {
        Self::new(root)
    }
}

/// Expression node variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprNode {
    /// An identifier that did not resolve to any local binding.
    Global(GlobalNode),
    VarRef(VarRefNode),
    TemplateLiteral(TemplateLiteralNode),
    VeLiteral(VeLiteralNode),
    StringLiteral(StringLiteralNode),
    IntLiteral(IntLiteralNode),
    BoolLiteral(BoolLiteralNode),
    Null(NullNode),
    ListLiteral(ListLiteralNode),
    RecordLiteral(RecordLiteralNode),
    ListComprehension(ListComprehensionNode),
    FunctionCall(FunctionCallNode),
    FieldAccess(FieldAccessNode),
    Operator(OperatorNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalNode {
    pub identifier: Identifier,
}

/// A reference by name. Names with and without the sigil both parse to this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarRefNode {
    pub name: String,
    pub location: SourceLocation,
}

/// A statically known template name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLiteralNode {
    pub identifier: Identifier,
    /// Set when a compiler pass created the literal rather than the author.
    #[serde(default)]
    pub is_synthetic: bool,
}

impl TemplateLiteralNode {
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            is_synthetic: false,
        }
    }

    pub fn synthetic(identifier: Identifier) -> Self {
        Self {
            identifier,
            is_synthetic: true,
        }
    }
}

/// `ve(Name)`: a reference to a compile-time constant visual element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VeLiteralNode {
    pub name: Identifier,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringLiteralNode {
    pub value: String,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntLiteralNode {
    pub value: i64,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoolLiteralNode {
    pub value: bool,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NullNode {
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListLiteralNode {
    pub items: Vec<ExprNode>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub key: Identifier,
    pub value: ExprNode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordLiteralNode {
    pub entries: Vec<RecordEntry>,
    pub location: SourceLocation,
}

/// `[item_map for $var, $index in list_expr if filter]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListComprehensionNode {
    pub list_iter_var: LocalVarDefn,
    #[serde(default)]
    pub index_var: Option<LocalVarDefn>,
    pub list_expr: Box<ExprNode>,
    pub item_map: Box<ExprNode>,
    #[serde(default)]
    pub filter: Option<Box<ExprNode>>,
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCallNode {
    pub name: Identifier,
    pub args: Vec<ExprNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAccessNode {
    pub base: Box<ExprNode>,
    pub field: Identifier,
    #[serde(default)]
    pub null_safe: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Not,
    Negative,
    Plus,
    Minus,
    Times,
    Divide,
    Mod,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    And,
    Or,
    NullCoalescing,
    Conditional,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorNode {
    pub op: Operator,
    pub operands: Vec<ExprNode>,
    pub location: SourceLocation,
}

impl ExprNode {
    /// Location of the whole expression.
    pub fn location(&self) -> &SourceLocation {
        match self {
            ExprNode::Global(n) => &n.identifier.location,
            ExprNode::VarRef(n) => &n.location,
            ExprNode::TemplateLiteral(n) => &n.identifier.location,
            ExprNode::VeLiteral(n) => &n.location,
            ExprNode::StringLiteral(n) => &n.location,
            ExprNode::IntLiteral(n) => &n.location,
            ExprNode::BoolLiteral(n) => &n.location,
            ExprNode::Null(n) => &n.location,
            ExprNode::ListLiteral(n) => &n.location,
            ExprNode::RecordLiteral(n) => &n.location,
            ExprNode::ListComprehension(n) => &n.location,
            ExprNode::FunctionCall(n) => &n.name.location,
            ExprNode::FieldAccess(n) => &n.field.location,
            ExprNode::Operator(n) => &n.location,
        }
    }

    /// Direct sub-expressions in source order.
    pub fn children(&self) -> Vec<&ExprNode> {
        match self {
            ExprNode::Global(_)
            | ExprNode::VarRef(_)
            | ExprNode::TemplateLiteral(_)
            | ExprNode::VeLiteral(_)
            | ExprNode::StringLiteral(_)
            | ExprNode::IntLiteral(_)
            | ExprNode::BoolLiteral(_)
            | ExprNode::Null(_) => Vec::new(),
            ExprNode::ListLiteral(n) => n.items.iter().collect(),
            ExprNode::RecordLiteral(n) => n.entries.iter().map(|e| &e.value).collect(),
            ExprNode::ListComprehension(n) => {
                let mut out = vec![n.list_expr.as_ref(), n.item_map.as_ref()];
                out.extend(n.filter.as_deref());
                out
            }
            ExprNode::FunctionCall(n) => n.args.iter().collect(),
            ExprNode::FieldAccess(n) => vec![n.base.as_ref()],
            ExprNode::Operator(n) => n.operands.iter().collect(),
        }
    }

    /// Mutable counterpart of [`ExprNode::children`].
    pub fn children_mut(&mut self) -> Vec<&mut ExprNode> {
        match self {
            ExprNode::Global(_)
            | ExprNode::VarRef(_)
            | ExprNode::TemplateLiteral(_)
            | ExprNode::VeLiteral(_)
            | ExprNode::StringLiteral(_)
            | ExprNode::IntLiteral(_)
            | ExprNode::BoolLiteral(_)
            | ExprNode::Null(_) => Vec::new(),
            ExprNode::ListLiteral(n) => n.items.iter_mut().collect(),
            ExprNode::RecordLiteral(n) => n.entries.iter_mut().map(|e| &mut e.value).collect(),
            ExprNode::ListComprehension(n) => {
                let mut out = vec![n.list_expr.as_mut(), n.item_map.as_mut()];
                out.extend(n.filter.as_deref_mut());
                out
            }
            ExprNode::FunctionCall(n) => n.args.iter_mut().collect(),
            ExprNode::FieldAccess(n) => vec![n.base.as_mut()],
            ExprNode::Operator(n) => n.operands.iter_mut().collect(),
        }
    }
}
