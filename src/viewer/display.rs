/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-19
 * @Description  : 节点的显示格式化
 */

use super::NodeId;

/// 格式化节点的显示，附带嵌套深度便于对照嵌套框
///
/// # Arguments
/// * `id` - 节点ID
/// * `name` - 节点名称
/// * `type_name` - 算子名或层类型名（变量节点为"Variable"）
/// * `depth` - 外层模块链的长度
///
/// # Returns
/// 返回格式化后的字符串，格式为：`节点[id={}, name={}, type={}, depth={}]`，
/// 根层级节点（深度为0）省略`depth`
pub(in crate::viewer) fn format_node_display(
    id: &NodeId,
    name: &str,
    type_name: &str,
    depth: usize,
) -> String {
    if depth == 0 {
        format!("节点[id={}, name={}, type={}]", id, name, type_name)
    } else {
        format!("节点[id={}, name={}, type={}, depth={}]", id, name, type_name, depth)
    }
}
