/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 模块层级索引：成员登记 + 自底向上的参数量汇总
 */

use super::NodeGraph;
use crate::viewer::{GraphError, ModuleNode, Node, NodeId};
use std::cmp::Reverse;
use tracing::info;

impl NodeGraph {
    pub fn module(&self, id: &NodeId) -> Result<&ModuleNode, GraphError> {
        self.node(id)?
            .as_module()
            .ok_or_else(|| GraphError::NotAModule(id.clone()))
    }

    pub(in crate::viewer) fn module_mut(&mut self, id: &NodeId) -> Result<&mut ModuleNode, GraphError> {
        self.node_mut(id)?
            .as_module_mut()
            .ok_or_else(|| GraphError::NotAModule(id.clone()))
    }

    /// 按登记顺序返回所有模块节点的id
    pub fn module_ids(&self) -> Vec<NodeId> {
        self.nodes()
            .filter(|node| node.is_module())
            .map(|node| node.id().clone())
            .collect()
    }

    pub fn depth(&self, id: &NodeId) -> Result<usize, GraphError> {
        Ok(self.node(id)?.depth())
    }

    /// 把`node`登记为`module`及其所有外层模块的成员（重复登记无副作用）
    ///
    /// 只有`node`的直接外层模块正是`module`时，才会记入`all_root_sub_ids`。
    /// 已汇总的模块收到新成员后会回到未汇总状态。
    /// `module`必须在`node`自己的外层模块链上，否则返回`InconsistentNesting`且不改动任何成员。
    pub fn register_subnode(&mut self, module_id: &NodeId, node_id: &NodeId) -> Result<(), GraphError> {
        let node = self.node(node_id)?;
        let is_direct = node.upper_module() == Some(module_id);
        let in_chain = node.up_modules().contains(module_id);
        let module = self.node(module_id)?;
        if !module.is_module() {
            return Err(GraphError::NotAModule(module_id.clone()));
        }
        if node_id == module_id {
            return Err(GraphError::InconsistentNesting {
                id: node_id.clone(),
                message: "模块不能登记为自身的成员".to_string(),
            });
        }
        if !in_chain {
            return Err(GraphError::InconsistentNesting {
                id: node_id.clone(),
                message: format!("{}不在该节点的外层模块链上", module_id),
            });
        }
        let mut chain = vec![module_id.clone()];
        chain.extend(module.up_modules().iter().cloned());

        for (i, ancestor) in chain.iter().enumerate() {
            let ancestor = self.module_mut(ancestor)?;
            let inserted = ancestor.insert_sub_node(node_id.clone());
            if i == 0 && is_direct {
                ancestor.push_root_sub_id(node_id.clone());
            }
            if inserted && ancestor.is_finalized() {
                ancestor.invalidate();
            }
        }
        Ok(())
    }

    /// 直接成员（不跨越更深的模块边界）
    pub fn direct_members(&self, module_id: &NodeId) -> Result<Vec<&Node>, GraphError> {
        self.module(module_id)?
            .all_root_sub_ids()
            .iter()
            .map(|id| self.node(id))
            .collect()
    }

    pub fn direct_submodules(&self, module_id: &NodeId) -> Result<Vec<&Node>, GraphError> {
        Ok(self
            .direct_members(module_id)?
            .into_iter()
            .filter(|node| node.is_module())
            .collect())
    }

    /// 直接成员中名为`weight`/`bias`的变量节点
    pub fn weight_ids(&self, module_id: &NodeId) -> Result<Vec<NodeId>, GraphError> {
        Ok(self
            .direct_members(module_id)?
            .into_iter()
            .filter(|node| node.as_variable().is_some())
            .filter(|node| matches!(node.name(), "weight" | "bias"))
            .map(|node| node.id().clone())
            .collect())
    }

    /// 模块汇总后的参数量
    pub fn nb_parameters(&self, module_id: &NodeId) -> Result<usize, GraphError> {
        self.module(module_id)?
            .nb_parameters()
            .ok_or_else(|| GraphError::PrematureFinalize {
                module: module_id.clone(),
            })
    }

    /// 所有模块中最大的参数量（没有模块时为0）
    pub fn max_parameters(&self) -> Result<usize, GraphError> {
        self.module_ids()
            .iter()
            .map(|id| self.nb_parameters(id))
            .try_fold(0, |max, count| count.map(|count| max.max(count)))
    }

    /// 自底向上（最深的模块先）汇总所有模块的参数量，返回最大参数量
    ///
    /// 这是汇总的唯一入口：遍历顺序保证每个模块汇总时其下层模块都已汇总完毕
    pub fn finalize_modules(&mut self) -> Result<usize, GraphError> {
        let mut modules: Vec<(usize, NodeId)> = self
            .nodes()
            .filter(|node| node.is_module())
            .map(|node| (node.depth(), node.id().clone()))
            .collect();
        // 同深度保持登记顺序
        modules.sort_by_key(|(depth, _)| Reverse(*depth));

        for (_, module_id) in &modules {
            self.finalize_module(module_id)?;
        }
        let max_parameters = self.max_parameters()?;
        info!(
            graph = %self.name,
            modules = modules.len(),
            max_parameters,
            "模块参数量汇总完成"
        );
        Ok(max_parameters)
    }

    fn finalize_module(&mut self, module_id: &NodeId) -> Result<usize, GraphError> {
        let mut total = 0;
        for member in self.direct_members(module_id)? {
            total += match member.as_module() {
                Some(sub) => sub.nb_parameters().ok_or_else(|| GraphError::PrematureFinalize {
                    module: member.id().clone(),
                })?,
                None => member.parameter_count(),
            };
        }
        self.module_mut(module_id)?.set_finalized(total);
        Ok(total)
    }
}
