/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 摄入驱动：轨迹描述符 → 节点图；节点图 → 布局描述符
 */

use super::NodeGraph;
use crate::viewer::{GraphError, LaidOutNode, LayoutDescriptor, TraceDescriptor};
use tracing::info;

impl NodeGraph {
    /// 依次完成三个串行阶段中的前两个：登记节点与边、汇总模块参数量
    ///
    /// 任何一步出错都直接返回，由调用方决定中止还是跳过
    pub fn from_trace(trace: &TraceDescriptor) -> Result<Self, GraphError> {
        let mut graph = Self::with_name(&trace.name);
        for descriptor in &trace.nodes {
            graph.add_node(descriptor.to_node())?;
        }
        for edge in &trace.edges {
            graph.add_edge(&edge.from, &edge.to)?;
        }
        graph.resolve_pending_edges()?;
        info!(
            graph = %graph.name,
            nodes = graph.nodes_count(),
            edges = trace.edges.len(),
            "轨迹摄入完成"
        );

        graph.finalize_modules()?;
        Ok(graph)
    }

    pub fn from_trace_json(json: &str) -> Result<Self, GraphError> {
        let trace = TraceDescriptor::from_json(json)?;
        Self::from_trace(&trace)
    }

    /// 导出渲染端需要的全部信息（按登记顺序）
    pub fn to_layout_descriptor(&self) -> LayoutDescriptor {
        LayoutDescriptor {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: self.name.clone(),
            nodes: self.nodes().map(LaidOutNode::from_node).collect(),
        }
    }
}
