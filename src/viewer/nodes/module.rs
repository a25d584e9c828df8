use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{NodeId, NodeTag, RenderHint, TensorRef, TraitNodeKind};

/// 已知的层类型，决定布局时是否使用专门的尺寸策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Linear,
    LayerNorm,
    Conv2d,
    Conv1d,
    Embedding,
    /// 未知层类型，走默认尺寸策略
    Generic,
}

impl LayerKind {
    /// 根据层类型名识别，允许带路径前缀（如"torch.nn.Linear"、"nn::Linear"）
    pub fn from_type_name(type_name: &str) -> Self {
        let short = type_name
            .rsplit(|c: char| c == '.' || c == ':')
            .next()
            .unwrap_or(type_name);
        match short {
            "Linear" | "LazyLinear" => Self::Linear,
            "LayerNorm" => Self::LayerNorm,
            "Conv2d" => Self::Conv2d,
            "Conv1d" => Self::Conv1d,
            "Embedding" => Self::Embedding,
            _ => Self::Generic,
        }
    }
}

/// 对底层层定义的引用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRef {
    pub type_name: String,
}

impl LayerRef {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
        }
    }
}

/// 结构性组件（层或复合块）
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleNode {
    layer: LayerRef,
    layer_kind: LayerKind,
    inputs: Vec<TensorRef>,
    outputs: Vec<TensorRef>,
    // 嵌套在内的所有节点（含间接嵌套）
    sub_nodes: HashSet<NodeId>,
    // 只跨过本模块这一层边界的直接成员
    all_root_sub_ids: Vec<NodeId>,
    all_sub_children: Vec<NodeId>,
    all_sub_parents: Vec<NodeId>,
    nb_parameters: usize,
    finalized: bool,
}

impl ModuleNode {
    pub fn new(layer: LayerRef, inputs: Vec<TensorRef>, outputs: Vec<TensorRef>) -> Self {
        let layer_kind = LayerKind::from_type_name(&layer.type_name);
        Self {
            layer,
            layer_kind,
            inputs,
            outputs,
            sub_nodes: HashSet::new(),
            all_root_sub_ids: Vec::new(),
            all_sub_children: Vec::new(),
            all_sub_parents: Vec::new(),
            nb_parameters: 0,
            finalized: false,
        }
    }

    pub const fn layer(&self) -> &LayerRef {
        &self.layer
    }

    pub const fn layer_kind(&self) -> LayerKind {
        self.layer_kind
    }

    pub fn inputs(&self) -> &[TensorRef] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TensorRef] {
        &self.outputs
    }

    pub const fn sub_nodes(&self) -> &HashSet<NodeId> {
        &self.sub_nodes
    }

    pub fn all_root_sub_ids(&self) -> &[NodeId] {
        &self.all_root_sub_ids
    }

    /// 从本模块内部流出、落在本模块外的飞线终点
    pub fn all_sub_children(&self) -> &[NodeId] {
        &self.all_sub_children
    }

    /// 从本模块外流入本模块内部的飞线起点（间接前驱）
    pub fn all_sub_parents(&self) -> &[NodeId] {
        &self.all_sub_parents
    }

    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// 汇总后的参数量；未汇总时返回None，图层面的访问见`NodeGraph::nb_parameters`
    pub const fn nb_parameters(&self) -> Option<usize> {
        if self.finalized {
            Some(self.nb_parameters)
        } else {
            None
        }
    }

    /// 返回是否为新成员
    pub(in crate::viewer) fn insert_sub_node(&mut self, id: NodeId) -> bool {
        self.sub_nodes.insert(id)
    }

    pub(in crate::viewer) fn push_root_sub_id(&mut self, id: NodeId) {
        if !self.all_root_sub_ids.contains(&id) {
            self.all_root_sub_ids.push(id);
        }
    }

    pub(in crate::viewer) fn push_sub_child(&mut self, id: NodeId) {
        if !self.all_sub_children.contains(&id) {
            self.all_sub_children.push(id);
        }
    }

    pub(in crate::viewer) fn push_sub_parent(&mut self, id: NodeId) {
        if !self.all_sub_parents.contains(&id) {
            self.all_sub_parents.push(id);
        }
    }

    pub(in crate::viewer) fn set_finalized(&mut self, nb_parameters: usize) {
        self.nb_parameters = nb_parameters;
        self.finalized = true;
    }

    pub(in crate::viewer) fn invalidate(&mut self) {
        self.finalized = false;
    }
}

impl TraitNodeKind for ModuleNode {
    fn tag(&self) -> NodeTag {
        NodeTag::Module
    }

    fn render_hint(&self) -> RenderHint {
        match self.layer_kind {
            LayerKind::Linear => RenderHint::FullyConnectedIcon,
            _ => RenderHint::Plain,
        }
    }
}
