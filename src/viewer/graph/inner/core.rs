/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : NodeGraph 核心操作：创建、访问、节点登记
 */

use super::NodeGraph;
use crate::viewer::{Color, GraphError, Node, NodeId};
use std::collections::HashMap;
use tracing::debug;

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeGraph {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: HashMap::new(),
            order: Vec::new(),
            pending_edges: Vec::new(),
        }
    }

    /// 丢弃整张图（新轨迹替换旧轨迹时使用）
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.order.clear();
        self.pending_edges.clear();
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    /// 按登记顺序返回所有节点id
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// 按登记顺序遍历所有节点
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &NodeId) -> Result<&Node, GraphError> {
        self.nodes
            .get(id)
            .ok_or_else(|| GraphError::UnresolvedReference { id: id.clone() })
    }

    pub(in crate::viewer) fn node_mut(&mut self, id: &NodeId) -> Result<&mut Node, GraphError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| GraphError::UnresolvedReference { id: id.clone() })
    }

    /// 渲染端设置颜色提示
    pub fn set_color(&mut self, id: &NodeId, color: Color) -> Result<(), GraphError> {
        self.node_mut(id)?.set_color(color);
        Ok(())
    }

    // ========== 惰性解析 ==========

    /// 把`next_ids`解析为节点；任一id找不到时在此刻报错
    pub fn next_nodes(&self, id: &NodeId) -> Result<Vec<&Node>, GraphError> {
        self.node(id)?
            .next_ids()
            .iter()
            .map(|next| self.node(next))
            .collect()
    }

    /// 把`previous_ids`解析为节点；任一id找不到时在此刻报错
    pub fn previous_nodes(&self, id: &NodeId) -> Result<Vec<&Node>, GraphError> {
        self.node(id)?
            .previous_ids()
            .iter()
            .map(|previous| self.node(previous))
            .collect()
    }

    // ========== 节点登记 ==========

    /// 登记一个新节点
    ///
    /// 节点的外层模块链（由内向外）必须全部已登记，
    /// 登记后`upper_module`即为链的第一个元素，并自动登记为该模块的成员
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId, GraphError> {
        if self.contains(node.id()) {
            return Err(GraphError::DuplicateNodeId(node.id().clone()));
        }
        self.validate_nesting(&node)?;

        let id = node.id().clone();
        let upper = node.up_modules().first().cloned();
        node.set_upper_module(upper.clone());
        debug!(node = %id, depth = node.depth(), "登记节点");
        self.nodes.insert(id.clone(), node);
        self.order.push(id.clone());

        if let Some(upper) = upper {
            self.register_subnode(&upper, &id)?;
        }
        Ok(id)
    }

    /// 校验`up_modules[i+1]`就是`up_modules[i]`的外层模块
    fn validate_nesting(&self, node: &Node) -> Result<(), GraphError> {
        let up_modules = node.up_modules();
        for (i, module_id) in up_modules.iter().enumerate() {
            if module_id == node.id() {
                return Err(GraphError::InconsistentNesting {
                    id: node.id().clone(),
                    message: "节点不能嵌套在自身内部".to_string(),
                });
            }
            let module = self.node(module_id)?;
            if !module.is_module() {
                return Err(GraphError::NotAModule(module_id.clone()));
            }
            let expected = up_modules.get(i + 1);
            if module.upper_module() != expected {
                return Err(GraphError::InconsistentNesting {
                    id: node.id().clone(),
                    message: format!(
                        "模块{}的外层模块应为{:?}，实际为{:?}",
                        module_id,
                        expected.map(NodeId::as_str),
                        module.upper_module().map(NodeId::as_str)
                    ),
                });
            }
        }
        Ok(())
    }
}
