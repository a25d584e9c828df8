/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 轨迹描述符（追踪器 → 内核）与布局描述符（内核 → 渲染端）
 *                 两者都是可序列化的中间表示，内核本身不拥有任何文件格式
 */

use serde::{Deserialize, Serialize};

use super::{
    Color, EdgeKind, LayerRef, Node, NodeId, NodeTag, OperationKind, PosData, RenderHint,
    TensorRef,
};

/// 追踪器发现的一条轨迹
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceDescriptor {
    /// 格式版本（用于向后兼容）
    #[serde(default)]
    pub version: String,
    pub name: String,
    /// 按发现顺序排列；外层模块须排在其成员之前
    pub nodes: Vec<NodeDescriptor>,
    #[serde(default)]
    pub edges: Vec<EdgeDescriptor>,
}

/// 单个被发现的实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: NodeId,
    pub name: String,
    /// 发现时的模块嵌套路径，由内向外
    #[serde(default)]
    pub up_modules: Vec<NodeId>,
    pub kind: NodeKindDescriptor,
}

/// 节点种类描述（包含种类特定字段）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKindDescriptor {
    Variable {
        tensor: TensorRef,
        #[serde(default)]
        learnable: bool,
    },
    Operation {
        function: String,
        operation: OperationKind,
        output: TensorRef,
    },
    Module {
        layer_type: String,
        #[serde(default)]
        inputs: Vec<TensorRef>,
        #[serde(default)]
        outputs: Vec<TensorRef>,
    },
}

/// producer → consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub from: NodeId,
    pub to: NodeId,
}

impl TraceDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: NodeDescriptor) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        self.edges.push(EdgeDescriptor {
            from: from.into(),
            to: to.into(),
        });
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl NodeDescriptor {
    pub fn new(id: &str, name: &str, up_modules: &[&str], kind: NodeKindDescriptor) -> Self {
        Self {
            id: id.into(),
            name: name.to_string(),
            up_modules: up_modules.iter().map(|&m| m.into()).collect(),
            kind,
        }
    }

    /// 转为尚未登记的节点（嵌套路径在登记进图时才校验）
    pub fn to_node(&self) -> Node {
        let node = match &self.kind {
            NodeKindDescriptor::Variable { tensor, learnable } => {
                Node::variable(self.id.clone(), &self.name, tensor.clone(), *learnable)
            }
            NodeKindDescriptor::Operation {
                function,
                operation,
                output,
            } => Node::operation(
                self.id.clone(),
                &self.name,
                function,
                operation.clone(),
                output.clone(),
            ),
            NodeKindDescriptor::Module {
                layer_type,
                inputs,
                outputs,
            } => Node::module(
                self.id.clone(),
                &self.name,
                LayerRef::new(layer_type),
                inputs.clone(),
                outputs.clone(),
            ),
        };
        node.with_up_modules(self.up_modules.clone())
    }
}

/// 渲染端读取的整图布局结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    pub version: String,
    pub name: String,
    pub nodes: Vec<LaidOutNode>,
}

/// 单个节点的布局结果与关系
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaidOutNode {
    pub id: NodeId,
    pub name: String,
    pub tag: NodeTag,
    pub render_hint: RenderHint,
    pub pos: PosData,
    pub color: Color,
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
    pub flying_parents: Vec<NodeId>,
    pub flying_children: Vec<NodeId>,
    pub up_modules: Vec<NodeId>,
    /// 直接成员（仅模块节点，用于绘制嵌套框）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_sub_ids: Vec<NodeId>,
    /// 汇总后的参数量（仅已汇总的模块节点）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nb_parameters: Option<usize>,
}

impl LaidOutNode {
    pub fn from_node(node: &Node) -> Self {
        let module = node.as_module();
        Self {
            id: node.id().clone(),
            name: node.name().to_string(),
            tag: node.tag(),
            render_hint: node.render_hint(),
            pos: *node.pos(),
            color: node.color(),
            parents: node.parents().to_vec(),
            children: node.children().to_vec(),
            flying_parents: node.flying_parents().to_vec(),
            flying_children: node.flying_children().to_vec(),
            up_modules: node.up_modules().to_vec(),
            root_sub_ids: module
                .map(|m| m.all_root_sub_ids().to_vec())
                .unwrap_or_default(),
            nb_parameters: module.and_then(|m| m.nb_parameters()),
        }
    }

    /// 某条边在渲染时应如何绘制
    pub fn edge_kind_to(&self, child: &NodeId) -> Option<EdgeKind> {
        if self.children.contains(child) {
            Some(EdgeKind::Direct)
        } else if self.flying_children.contains(child) {
            Some(EdgeKind::Flying)
        } else {
            None
        }
    }
}

impl LayoutDescriptor {
    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn node(&self, id: &str) -> Option<&LaidOutNode> {
        self.nodes.iter().find(|node| node.id.as_str() == id)
    }
}
