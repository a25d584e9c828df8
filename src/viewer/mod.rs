/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 神经网络执行轨迹的层级节点图与布局
 *
 * 三个串行阶段：
 * 1. 摄入：登记节点与边（关系存储 + 模块成员登记）
 * 2. 汇总：自底向上计算各模块参数量
 * 3. 布局：自顶向下计算各模块宽高
 */

mod config;
mod descriptor;
mod display;
mod graph;
mod layout;
mod nodes;

pub use config::LayoutConfig;
pub use descriptor::{
    EdgeDescriptor, LaidOutNode, LayoutDescriptor, NodeDescriptor, NodeKindDescriptor,
    TraceDescriptor,
};
pub(in crate::viewer) use display::format_node_display;
pub use graph::{EdgeKind, GraphError, NodeGraph};
pub use layout::{LayoutEngine, Size, SizingFn, SizingInput, default_size, linear_size};
pub use nodes::{
    Color, LayerKind, LayerRef, ModuleNode, Node, NodeId, NodeKind, NodeTag, OperationKind,
    OperationNode, PosData, RenderHint, TensorRef, TraitNodeKind, VariableNode,
};

#[cfg(test)]
mod tests;
