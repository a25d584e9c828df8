/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 边的登记与分类：直连边 vs 跨模块边界的飞线
 */

use super::NodeGraph;
use crate::viewer::{GraphError, NodeId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 边的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// 两端处于同一个直接外层模块，或一端正是另一端的直接外层模块
    Direct,
    /// 跨越模块边界，渲染时单独绘制
    Flying,
}

/// 延后分类的边，记录登记时哪一端已写入原始id
#[derive(Debug, Clone)]
pub(in crate::viewer::graph) struct PendingEdge {
    producer: NodeId,
    consumer: NodeId,
    next_recorded: bool,
    previous_recorded: bool,
}

impl NodeGraph {
    /// 登记一条 producer → consumer 的边
    ///
    /// 已登记的端点上总会记录原始id（`next_ids`/`previous_ids`）；
    /// 两端都已登记时立即分类并返回分类结果，否则延后到`resolve_pending_edges`
    pub fn add_edge(
        &mut self,
        producer: &NodeId,
        consumer: &NodeId,
    ) -> Result<Option<EdgeKind>, GraphError> {
        if producer == consumer {
            return Err(GraphError::SelfLoop(producer.clone()));
        }
        let next_recorded = match self.nodes.get_mut(producer) {
            Some(node) => {
                node.push_next_id(consumer.clone());
                true
            }
            None => false,
        };
        let previous_recorded = match self.nodes.get_mut(consumer) {
            Some(node) => {
                node.push_previous_id(producer.clone());
                true
            }
            None => false,
        };

        if next_recorded && previous_recorded {
            self.link(producer, consumer).map(Some)
        } else {
            debug!(%producer, %consumer, "边的端点尚未登记，延后分类");
            self.pending_edges.push(PendingEdge {
                producer: producer.clone(),
                consumer: consumer.clone(),
                next_recorded,
                previous_recorded,
            });
            Ok(None)
        }
    }

    pub fn pending_edges_count(&self) -> usize {
        self.pending_edges.len()
    }

    /// 分类所有延后的边
    ///
    /// 只要还有端点未登记，就返回`UnresolvedReference`且不改动任何延后的边
    pub fn resolve_pending_edges(&mut self) -> Result<usize, GraphError> {
        if let Some(missing) = self
            .pending_edges
            .iter()
            .flat_map(|edge| [&edge.producer, &edge.consumer])
            .find(|id| !self.contains(id))
        {
            return Err(GraphError::UnresolvedReference {
                id: missing.clone(),
            });
        }

        let pending = std::mem::take(&mut self.pending_edges);
        for edge in &pending {
            // 只给登记边时缺席的一端补上原始id，重复的边两端计数一致
            if !edge.next_recorded {
                self.node_mut(&edge.producer)?
                    .push_next_id(edge.consumer.clone());
            }
            if !edge.previous_recorded {
                self.node_mut(&edge.consumer)?
                    .push_previous_id(edge.producer.clone());
            }
            self.link(&edge.producer, &edge.consumer)?;
        }
        Ok(pending.len())
    }

    /// 判断一条边是直连还是飞线（两端都须已登记）
    pub fn classify_edge(&self, producer: &NodeId, consumer: &NodeId) -> Result<EdgeKind, GraphError> {
        let from = self.node(producer)?;
        let to = self.node(consumer)?;
        let same_upper = from.upper_module() == to.upper_module();
        let adjacent = from.upper_module() == Some(consumer) || to.upper_module() == Some(producer);
        if same_upper || adjacent {
            Ok(EdgeKind::Direct)
        } else {
            Ok(EdgeKind::Flying)
        }
    }

    fn link(&mut self, producer: &NodeId, consumer: &NodeId) -> Result<EdgeKind, GraphError> {
        let kind = self.classify_edge(producer, consumer)?;
        match kind {
            EdgeKind::Direct => {
                self.node_mut(producer)?.add_children(consumer.clone());
                self.node_mut(consumer)?.add_parent(producer.clone());
            }
            EdgeKind::Flying => {
                self.node_mut(producer)?.add_flying_child(consumer.clone());
                self.node_mut(consumer)?.add_flying_parent(producer.clone());

                let producer_chain = self.node(producer)?.up_modules().to_vec();
                let consumer_chain = self.node(consumer)?.up_modules().to_vec();
                // 只包住consumer的模块：producer是它们的间接前驱
                for module_id in consumer_chain
                    .iter()
                    .filter(|m| *m != producer && !producer_chain.contains(m))
                {
                    self.module_mut(module_id)?.push_sub_parent(producer.clone());
                }
                // 只包住producer的模块：consumer是它们的间接后继
                for module_id in producer_chain
                    .iter()
                    .filter(|m| *m != consumer && !consumer_chain.contains(m))
                {
                    self.module_mut(module_id)?.push_sub_child(consumer.clone());
                }
            }
        }
        debug!(%producer, %consumer, ?kind, "边已分类");
        Ok(kind)
    }
}
