//! Statement-level nodes and the per-file root.

use serde::{Deserialize, Serialize};

use super::expr::{ExprNode, ExprRoot};
use super::var::LocalVarDefn;
use crate::error::CompileError;
use crate::source::{Identifier, SourceLocation};

pub type NodeId = u32;

/// Root of one source file's tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateFile {
    pub file_path: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub templates: Vec<TemplateNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateNode {
    pub id: NodeId,
    pub name: Identifier,
    #[serde(default)]
    pub params: Vec<TemplateParam>,
    #[serde(default)]
    pub children: Vec<Node>,
}

/// A declared template parameter. Referenced in the body as `$name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParam {
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    RawText(RawTextNode),
    Print(PrintNode),
    Let(LetNode),
    If(IfNode),
    For(ForNode),
    Call(CallNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTextNode {
    pub id: NodeId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintNode {
    pub id: NodeId,
    pub expr: ExprRoot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetNode {
    pub id: NodeId,
    pub var: LocalVarDefn,
    pub value: LetValue,
}

/// `{let $x: expr /}` or `{let $x}...{/let}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LetValue {
    Expr(ExprRoot),
    Content(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfNode {
    pub id: NodeId,
    pub branches: Vec<IfBranch>,
}

/// An `if`/`elseif` branch, or the trailing `else` when `condition` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfBranch {
    #[serde(default)]
    pub condition: Option<ExprRoot>,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForNode {
    pub id: NodeId,
    pub iterable: ExprRoot,
    pub nonempty: ForNonemptyNode,
    #[serde(default)]
    pub ifempty: Option<Vec<Node>>,
}

/// The per-item body of a loop and the variables it binds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForNonemptyNode {
    pub var: LocalVarDefn,
    #[serde(default)]
    pub index_var: Option<LocalVarDefn>,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallNode {
    pub id: NodeId,
    pub open_tag_location: SourceLocation,
    pub callee: ExprRoot,
    #[serde(default)]
    pub data: Option<CallData>,
    #[serde(default)]
    pub params: Vec<CallParamNode>,
}

/// The `data` attribute of a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallData {
    /// `data="all"`
    All,
    Expr(ExprRoot),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallParamNode {
    pub key: Identifier,
    pub value: CallParamValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallParamValue {
    Expr(ExprRoot),
    Content(Vec<Node>),
}

impl CallNode {
    pub fn callee_expr(&self) -> &ExprRoot {
        &self.callee
    }

    /// Replaces the callee, dropping the previous expression.
    pub fn set_callee_expr(&mut self, callee: ExprRoot) {
        self.callee = callee;
    }

    pub fn is_passing_data(&self) -> bool {
        self.data.is_some()
    }

    /// True when the callee is a fixed template name.
    pub fn is_static_call(&self) -> bool {
        matches!(self.callee.root(), ExprNode::TemplateLiteral(_))
    }
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::RawText(n) => n.id,
            Node::Print(n) => n.id,
            Node::Let(n) => n.id,
            Node::If(n) => n.id,
            Node::For(n) => n.id,
            Node::Call(n) => n.id,
        }
    }

    /// Expression roots owned directly by this node, in source order.
    pub fn expr_roots(&self) -> Vec<&ExprRoot> {
        match self {
            Node::RawText(_) => Vec::new(),
            Node::Print(n) => vec![&n.expr],
            Node::Let(n) => match &n.value {
                LetValue::Expr(e) => vec![e],
                LetValue::Content(_) => Vec::new(),
            },
            Node::If(n) => n
                .branches
                .iter()
                .filter_map(|b| b.condition.as_ref())
                .collect(),
            Node::For(n) => vec![&n.iterable],
            Node::Call(n) => {
                let mut out = vec![&n.callee];
                if let Some(CallData::Expr(e)) = &n.data {
                    out.push(e);
                }
                out.extend(n.params.iter().filter_map(|p| match &p.value {
                    CallParamValue::Expr(e) => Some(e),
                    CallParamValue::Content(_) => None,
                }));
                out
            }
        }
    }

    /// Child statement blocks owned by this node, in source order.
    pub fn child_blocks(&self) -> Vec<&[Node]> {
        match self {
            Node::RawText(_) | Node::Print(_) => Vec::new(),
            Node::Let(n) => match &n.value {
                LetValue::Expr(_) => Vec::new(),
                LetValue::Content(children) => vec![children.as_slice()],
            },
            Node::If(n) => n.branches.iter().map(|b| b.children.as_slice()).collect(),
            Node::For(n) => {
                let mut out = vec![n.nonempty.children.as_slice()];
                out.extend(n.ifempty.as_deref());
                out
            }
            Node::Call(n) => n
                .params
                .iter()
                .filter_map(|p| match &p.value {
                    CallParamValue::Content(children) => Some(children.as_slice()),
                    CallParamValue::Expr(_) => None,
                })
                .collect(),
        }
    }

    /// Mutable counterpart of [`Node::child_blocks`].
    pub fn child_blocks_mut(&mut self) -> Vec<&mut Vec<Node>> {
        match self {
            Node::RawText(_) | Node::Print(_) => Vec::new(),
            Node::Let(n) => match &mut n.value {
                LetValue::Expr(_) => Vec::new(),
                LetValue::Content(children) => vec![children],
            },
            Node::If(n) => n.branches.iter_mut().map(|b| &mut b.children).collect(),
            Node::For(n) => {
                let mut out = vec![&mut n.nonempty.children];
                out.extend(n.ifempty.as_mut());
                out
            }
            Node::Call(n) => n
                .params
                .iter_mut()
                .filter_map(|p| match &mut p.value {
                    CallParamValue::Content(children) => Some(children),
                    CallParamValue::Expr(_) => None,
                })
                .collect(),
        }
    }
}

/// Hands out fresh node ids for synthesized statement nodes.
///
/// `next` is `None` once every id up to `NodeId::MAX` has been used.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next: Option<NodeId>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: Some(0) }
    }

    /// A generator whose ids do not collide with any id already in `file`.
    pub fn after(file: &TemplateFile) -> Self {
        let max = super::walk::max_node_id(file);
        Self {
            next: max.map_or(Some(0), |id| id.checked_add(1)),
        }
    }

    pub fn next_id(&mut self) -> Result<NodeId, CompileError> {
        let id = self.next.ok_or(CompileError::NodeIdsExhausted)?;
        self.next = id.checked_add(1);
        Ok(id)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
