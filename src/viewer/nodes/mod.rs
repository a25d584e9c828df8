/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 节点模型：公共基础记录 + 封闭的节点种类（变量/算子/模块）
 *                 所有关系均以 NodeId 存储，实际节点由 NodeGraph 这个 arena 持有
 */

mod module;
mod operation;
mod variable;

pub use module::{LayerKind, LayerRef, ModuleNode};
pub use operation::{OperationKind, OperationNode};
pub use variable::{TensorRef, VariableNode};

use std::fmt;
use std::hash::{Hash, Hasher};

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};

use super::format_node_display;

/// 节点在整条轨迹内的全局唯一标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// 布局状态，只由布局引擎写入（x、y留给渲染端）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PosData {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 渲染用颜色提示，由外部（渲染端）设置，默认黑色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// 节点种类标签，供渲染端和调度使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeTag {
    Variable,
    Operation,
    Module,
}

/// 渲染端的特殊绘制提示（图标/注意力矩阵等），只按种类标签决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderHint {
    /// 普通矩形框
    Plain,
    /// 全连接层图标
    FullyConnectedIcon,
    /// 转置图标
    TransposeIcon,
    /// 注意力分数矩阵（query @ key^T）
    AttentionMatrix,
}

#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum NodeKind {
    Variable(VariableNode),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Operation(OperationNode),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    Module(ModuleNode),
}

#[enum_dispatch(NodeKind)]
pub trait TraitNodeKind {
    fn tag(&self) -> NodeTag;

    /// 本节点自身持有的可学习参数个数（模块的汇总值见`ModuleNode::nb_parameters`）
    fn parameter_count(&self) -> usize {
        0
    }

    fn render_hint(&self) -> RenderHint {
        RenderHint::Plain
    }
}

/// 节点的公共基础记录
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    parents: Vec<NodeId>,
    children: Vec<NodeId>,
    flying_parents: Vec<NodeId>,
    flying_children: Vec<NodeId>,
    // 弱引用：目标节点可能尚未登记，查找时才解析
    next_ids: Vec<NodeId>,
    previous_ids: Vec<NodeId>,
    // 由内向外的外层模块链，长度即嵌套深度
    up_modules: Vec<NodeId>,
    upper_module: Option<NodeId>,
    pos: PosData,
    color: Color,
    kind: NodeKind,
}

impl Node {
    pub fn new<K: Into<NodeKind>>(id: impl Into<NodeId>, name: &str, kind: K) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            parents: Vec::new(),
            children: Vec::new(),
            flying_parents: Vec::new(),
            flying_children: Vec::new(),
            next_ids: Vec::new(),
            previous_ids: Vec::new(),
            up_modules: Vec::new(),
            upper_module: None,
            pos: PosData::default(),
            color: Color::BLACK,
            kind: kind.into(),
        }
    }

    pub fn variable(id: impl Into<NodeId>, name: &str, tensor: TensorRef, learnable: bool) -> Self {
        Self::new(id, name, VariableNode::new(tensor, learnable))
    }

    pub fn operation(
        id: impl Into<NodeId>,
        name: &str,
        function: &str,
        op: OperationKind,
        output: TensorRef,
    ) -> Self {
        Self::new(id, name, OperationNode::new(function, op, output))
    }

    pub fn module(
        id: impl Into<NodeId>,
        name: &str,
        layer: LayerRef,
        inputs: Vec<TensorRef>,
        outputs: Vec<TensorRef>,
    ) -> Self {
        Self::new(id, name, ModuleNode::new(layer, inputs, outputs))
    }

    /// 设置发现该节点时的模块嵌套路径（由内向外），登记进图时才校验
    pub fn with_up_modules(mut self, up_modules: Vec<NodeId>) -> Self {
        self.up_modules = up_modules;
        self
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓访问器↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn flying_parents(&self) -> &[NodeId] {
        &self.flying_parents
    }

    pub fn flying_children(&self) -> &[NodeId] {
        &self.flying_children
    }

    pub fn next_ids(&self) -> &[NodeId] {
        &self.next_ids
    }

    pub fn previous_ids(&self) -> &[NodeId] {
        &self.previous_ids
    }

    pub fn up_modules(&self) -> &[NodeId] {
        &self.up_modules
    }

    pub fn upper_module(&self) -> Option<&NodeId> {
        self.upper_module.as_ref()
    }

    /// 嵌套深度，即外层模块链的长度
    pub fn depth(&self) -> usize {
        self.up_modules.len()
    }

    pub const fn pos(&self) -> &PosData {
        &self.pos
    }

    pub const fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    pub fn parameter_count(&self) -> usize {
        self.kind.parameter_count()
    }

    pub fn render_hint(&self) -> RenderHint {
        self.kind.render_hint()
    }

    pub fn is_module(&self) -> bool {
        matches!(self.kind, NodeKind::Module(_))
    }

    pub fn as_module(&self) -> Option<&ModuleNode> {
        match &self.kind {
            NodeKind::Module(module) => Some(module),
            _ => None,
        }
    }

    pub fn as_operation(&self) -> Option<&OperationNode> {
        match &self.kind {
            NodeKind::Operation(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&VariableNode> {
        match &self.kind {
            NodeKind::Variable(var) => Some(var),
            _ => None,
        }
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑访问器↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    /// 追加直接父节点（不去重，不检查环）
    pub fn add_parent(&mut self, parent: NodeId) {
        self.parents.push(parent);
    }

    /// 追加直接子节点（不去重，不检查环）
    pub fn add_children(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(in crate::viewer) fn add_flying_parent(&mut self, parent: NodeId) {
        self.flying_parents.push(parent);
    }

    pub(in crate::viewer) fn add_flying_child(&mut self, child: NodeId) {
        self.flying_children.push(child);
    }

    pub(in crate::viewer) fn push_next_id(&mut self, id: NodeId) {
        self.next_ids.push(id);
    }

    pub(in crate::viewer) fn push_previous_id(&mut self, id: NodeId) {
        self.previous_ids.push(id);
    }

    pub(in crate::viewer) fn set_upper_module(&mut self, upper: Option<NodeId>) {
        self.upper_module = upper;
    }

    pub(in crate::viewer) fn as_module_mut(&mut self) -> Option<&mut ModuleNode> {
        match &mut self.kind {
            NodeKind::Module(module) => Some(module),
            _ => None,
        }
    }

    pub(in crate::viewer) fn pos_mut(&mut self) -> &mut PosData {
        &mut self.pos
    }
}

// 节点的同一性只看id
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_name = match &self.kind {
            NodeKind::Variable(_) => "Variable",
            NodeKind::Operation(op) => op.op().catalog_name(),
            NodeKind::Module(module) => module.layer().type_name.as_str(),
        };
        write!(f, "{}", format_node_display(&self.id, &self.name, type_name, self.depth()))
    }
}
