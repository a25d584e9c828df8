/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : NodeGraph 的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、访问器、节点登记、惰性id解析
 * - relation.rs: 边的登记与直连/飞线分类
 * - hierarchy.rs: 模块成员登记 + 自底向上的参数量汇总
 * - ingest.rs: 从轨迹描述符构建整图、导出布局描述符
 */

mod core;
mod hierarchy;
mod ingest;
mod relation;

pub use relation::EdgeKind;
use relation::PendingEdge;

use crate::viewer::{Node, NodeId};
use std::collections::HashMap;

/// 一条轨迹的完整节点图
///
/// 节点只在这里持有一份，所有关系（父子、飞线、外层模块链）都是 id，
/// 需要时再回到本 arena 查找。新轨迹到来时整图丢弃重建，不做局部失效。
#[derive(Debug, Clone)]
pub struct NodeGraph {
    pub(in crate::viewer::graph) name: String,
    pub(in crate::viewer::graph) nodes: HashMap<NodeId, Node>,
    /// 登记顺序（即追踪器发现节点的顺序）
    pub(in crate::viewer::graph) order: Vec<NodeId>,
    /// 端点尚未登记、延后分类的边
    pub(in crate::viewer::graph) pending_edges: Vec<PendingEdge>,
}
