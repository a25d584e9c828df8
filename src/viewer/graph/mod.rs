/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : NodeGraph 模块：节点 arena + 关系存储 + 模块层级索引
 *
 * 公开 API：
 * - `NodeGraph`: 一条轨迹对应的整张节点图
 * - `EdgeKind`: 边的分类（直连/飞线）
 * - `GraphError`: 错误类型
 */

mod error;
mod inner;

pub use error::GraphError;
pub use inner::{EdgeKind, NodeGraph};
