/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : NodeGraph 模块的错误类型
 */

use thiserror::Error;

use crate::viewer::NodeId;

/// 节点图构建、层级汇总与布局过程中的错误类型
///
/// 注意：`max_parameters == 0` 不属于错误，布局时按比例为0处理
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// `next_ids`/`previous_ids`、嵌套路径或边里的id在查找时没有对应节点
    #[error("未解析的引用：节点{id}不存在")]
    UnresolvedReference { id: NodeId },
    /// 在所有下层模块汇总完成前读取（或汇总、布局）了模块的参数量
    #[error("模块{module}的参数量尚未汇总完成")]
    PrematureFinalize { module: NodeId },
    #[error("节点{0}在图中重复")]
    DuplicateNodeId(NodeId),
    #[error("节点{0}不是模块节点")]
    NotAModule(NodeId),
    #[error("节点{id}的模块嵌套路径不一致：{message}")]
    InconsistentNesting { id: NodeId, message: String },
    #[error("节点{0}不能以自身为父节点")]
    SelfLoop(NodeId),
    #[error("描述符（反）序列化失败：{0}")]
    Descriptor(String),
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::Descriptor(err.to_string())
    }
}
